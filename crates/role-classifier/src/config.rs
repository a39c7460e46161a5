//! Pipeline settings, read from JSON with every field defaulted.

use crate::error::{PipelineError, Result};
use crate::select::{ArgmaxScope, SelectionPolicy};
use crate::types::InputColumns;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct PipelineConfig {
    pub policy: SelectionPolicy,
    pub argmax_scope: ArgmaxScope,
    /// Column holding the element identifier reported back to the caller.
    pub id_column: String,
    /// Column grouping elements into jobs. Absent column means one job.
    pub job_column: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let columns = InputColumns::default();
        Self {
            policy: SelectionPolicy::default(),
            argmax_scope: ArgmaxScope::default(),
            id_column: columns.id,
            job_column: columns.job,
        }
    }
}

impl PipelineConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn input_columns(&self) -> InputColumns {
        InputColumns {
            id: self.id_column.clone(),
            job: self.job_column.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::from_json("{}").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.policy, SelectionPolicy::Threshold);
        assert_eq!(config.argmax_scope, ArgmaxScope::PerJob);
        assert_eq!(config.id_column, "crawlerId");
    }

    #[test]
    fn test_partial_override() {
        let config =
            PipelineConfig::from_json(r#"{"policy":"argmax","argmax_scope":"per-batch","job_column":"url"}"#)
                .unwrap();
        assert_eq!(config.policy, SelectionPolicy::Argmax);
        assert_eq!(config.argmax_scope, ArgmaxScope::PerBatch);
        assert_eq!(config.input_columns().job, "url");
        assert_eq!(config.input_columns().id, "crawlerId");
    }

    #[test]
    fn test_unknown_policy_rejected() {
        assert!(PipelineConfig::from_json(r#"{"policy":"top-k"}"#).is_err());
    }
}
