//! Title/content role selection for crawled DOM elements.
//!
//! A batch of elements is normalized, filtered by a per-role tag blacklist,
//! aligned to the column set each classifier was trained on, imputed, scaled,
//! classified, and reduced to a role assignment by a selection policy.

pub mod align;
pub mod artifacts;
pub mod blacklist;
pub mod config;
pub mod error;
pub mod impute;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod scaler;
pub mod schema;
pub mod select;
pub mod types;

pub use artifacts::{ArtifactSet, DatasetInfo, RoleArtifacts};
pub use blacklist::Blacklist;
pub use config::PipelineConfig;
pub use error::{PipelineError, Result};
pub use impute::FrequencyTable;
pub use model::{Classifier, LogisticModel};
pub use pipeline::{Pipeline, PredictionReport, RoleOutcome};
pub use scaler::{Scaler, StandardScaler};
pub use schema::{ColumnKind, SchemaColumn, TrainedSchema};
pub use select::{ArgmaxScope, Selection, SelectionPolicy};
pub use types::{AttrValue, Element, ElementKey, InputColumns, Role};
