//! Trained artifacts for both roles, loaded once and shared read-only.

use crate::blacklist::Blacklist;
use crate::error::{PipelineError, Result};
use crate::impute::FrequencyTable;
use crate::model::{Classifier, LogisticModel};
use crate::scaler::{Scaler, StandardScaler};
use crate::schema::TrainedSchema;
use crate::types::Role;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

/// Shared dataset info file name; `<role>_datasetinfo.txt` overrides it.
pub const DATASET_INFO: &str = "datasetinfo.txt";
/// Shared scaler file name; `<role>_scaler.json` overrides it.
pub const SCALER: &str = "scaler.json";

/// Schema, fallbacks, and blacklist recorded when a classifier was trained.
///
/// On disk this is three lines: comma-separated schema columns, a JSON object
/// of column fallbacks, and an optional comma-separated tag blacklist.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetInfo {
    pub schema: TrainedSchema,
    pub frequencies: FrequencyTable,
    pub blacklist: Blacklist,
}

impl DatasetInfo {
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines();
        let columns = lines
            .next()
            .ok_or_else(|| PipelineError::artifact(DATASET_INFO, "missing schema line"))?;
        let freqs = lines
            .next()
            .ok_or_else(|| PipelineError::artifact(DATASET_INFO, "missing frequency line"))?;
        let blacklist = lines.next().unwrap_or("");

        Ok(Self {
            schema: TrainedSchema::parse(columns)?,
            frequencies: FrequencyTable::parse(freqs)?,
            blacklist: Blacklist::parse(blacklist),
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::parse(&read(path)?)
    }
}

/// Everything needed to score one role.
pub struct RoleArtifacts {
    pub schema: TrainedSchema,
    pub frequencies: FrequencyTable,
    pub blacklist: Blacklist,
    pub scaler: Box<dyn Scaler>,
    pub classifier: Box<dyn Classifier>,
}

impl RoleArtifacts {
    /// Assemble a role, checking scaler and classifier widths against the schema.
    pub fn new(
        info: DatasetInfo,
        scaler: Box<dyn Scaler>,
        classifier: Box<dyn Classifier>,
    ) -> Result<Self> {
        let width = info.schema.len();
        if scaler.width() != width {
            return Err(PipelineError::artifact(
                "scaler",
                format!("fitted on {} columns, schema has {width}", scaler.width()),
            ));
        }
        if classifier.width() != width {
            return Err(PipelineError::artifact(
                "classifier",
                format!(
                    "trained on {} features, schema has {width}",
                    classifier.width()
                ),
            ));
        }
        Ok(Self {
            schema: info.schema,
            frequencies: info.frequencies,
            blacklist: info.blacklist,
            scaler,
            classifier,
        })
    }

    /// Load one role from an artifact directory, preferring role-specific files.
    pub fn load(dir: &Path, role: Role) -> Result<Self> {
        let info_path = role_file(dir, role, DATASET_INFO);
        let scaler_path = role_file(dir, role, SCALER);
        let classifier_path = dir.join(format!("{role}_classifier.json"));

        let info = DatasetInfo::load(&info_path)?;
        let scaler = StandardScaler::load(&scaler_path)?;
        let classifier = LogisticModel::load(&classifier_path)?;
        info!(
            %role,
            columns = info.schema.len(),
            blacklist = info.blacklist.len(),
            "loaded {} and {}",
            info_path.display(),
            classifier_path.display()
        );

        Self::new(info, Box::new(scaler), Box::new(classifier)).map_err(|err| match err {
            PipelineError::Artifact { name, reason } => PipelineError::Artifact {
                name: format!("{role} {name}"),
                reason,
            },
            other => other,
        })
    }
}

impl fmt::Debug for RoleArtifacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoleArtifacts")
            .field("schema", &self.schema)
            .field("frequencies", &self.frequencies)
            .field("blacklist", &self.blacklist)
            .finish_non_exhaustive()
    }
}

/// The complete, immutable artifact set for a run.
#[derive(Debug)]
pub struct ArtifactSet {
    pub title: RoleArtifacts,
    pub content: RoleArtifacts,
}

impl ArtifactSet {
    pub fn new(title: RoleArtifacts, content: RoleArtifacts) -> Self {
        Self { title, content }
    }

    pub fn load_dir(dir: &Path) -> Result<Self> {
        Ok(Self {
            title: RoleArtifacts::load(dir, Role::Title)?,
            content: RoleArtifacts::load(dir, Role::Content)?,
        })
    }

    pub fn role(&self, role: Role) -> &RoleArtifacts {
        match role {
            Role::Title => &self.title,
            Role::Content => &self.content,
        }
    }
}

fn role_file(dir: &Path, role: Role, shared: &str) -> PathBuf {
    let specific = dir.join(format!("{role}_{shared}"));
    if specific.exists() {
        specific
    } else {
        dir.join(shared)
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })
}
