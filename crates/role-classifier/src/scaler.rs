//! Feature scaling seam and the bundled standard scaler.

use crate::error::{PipelineError, Result};
use ndarray::{Array1, Array2};
use serde::Deserialize;
use std::path::Path;

/// Fitted transform applied to the aligned, imputed matrix.
pub trait Scaler: Send + Sync {
    /// Number of columns the scaler was fitted on.
    fn width(&self) -> usize;

    fn transform(&self, matrix: &Array2<f64>) -> Result<Array2<f64>>;
}

/// `(x - mean) / scale`, per column.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

#[derive(Debug, Deserialize)]
struct StandardScalerFile {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    /// Zero scales are treated as one, leaving constant columns centred only.
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self> {
        if mean.len() != scale.len() {
            return Err(PipelineError::artifact(
                "scaler",
                format!("mean has {} entries, scale has {}", mean.len(), scale.len()),
            ));
        }
        let scale = scale
            .into_iter()
            .map(|s| if s == 0.0 { 1.0 } else { s })
            .collect::<Vec<_>>();
        Ok(Self {
            mean: Array1::from(mean),
            scale: Array1::from(scale),
        })
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let file: StandardScalerFile = serde_json::from_str(raw)?;
        Self::new(file.mean, file.scale)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }
}

impl Scaler for StandardScaler {
    fn width(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, matrix: &Array2<f64>) -> Result<Array2<f64>> {
        if matrix.ncols() != self.width() {
            return Err(PipelineError::artifact(
                "scaler",
                format!(
                    "fitted on {} columns, got {}",
                    self.width(),
                    matrix.ncols()
                ),
            ));
        }
        Ok((matrix - &self.mean) / &self.scale)
    }
}
