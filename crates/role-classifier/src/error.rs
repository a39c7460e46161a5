//! Error type shared by every pipeline stage.

use std::path::PathBuf;
use thiserror::Error;

/// Failures raised while loading artifacts or running a batch.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A numeric column needed a fallback but the frequency table has none.
    #[error("no frequency fallback for column `{column}`")]
    MissingFrequency { column: String },

    /// An input row lacks an attribute alignment cannot do without.
    #[error("row {row}: missing required attribute `{attribute}`")]
    MissingAttribute { row: usize, attribute: String },

    #[error("invalid trained schema: {0}")]
    InvalidSchema(String),

    /// An artifact is unreadable or inconsistent with the schema it serves.
    #[error("artifact `{name}`: {reason}")]
    Artifact { name: String, reason: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    pub(crate) fn artifact(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Artifact {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// True when the artifact set itself is inconsistent. These abort a run;
    /// everything else is a problem with the submitted batch.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, Self::MissingAttribute { .. })
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_split() {
        let missing = PipelineError::MissingFrequency {
            column: "fontSize".into(),
        };
        assert!(missing.is_configuration());

        let row = PipelineError::MissingAttribute {
            row: 3,
            attribute: "tagName".into(),
        };
        assert!(!row.is_configuration());
        assert_eq!(row.to_string(), "row 3: missing required attribute `tagName`");
    }
}
