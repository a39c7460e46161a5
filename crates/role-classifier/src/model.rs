//! Classifier seam and the bundled logistic model.

use crate::error::{PipelineError, Result};
use ndarray::{Array1, Array2};
use serde::Deserialize;
use std::path::Path;

/// Trained per-role classifier over scaled feature rows.
pub trait Classifier: Send + Sync {
    /// Number of features the classifier expects per row.
    fn width(&self) -> usize;

    /// Binary label per row.
    fn predict(&self, matrix: &Array2<f64>) -> Result<Vec<bool>>;

    /// Positive-class probability per row.
    fn predict_proba(&self, matrix: &Array2<f64>) -> Result<Vec<f64>>;
}

fn default_threshold() -> f64 {
    0.5
}

#[derive(Debug, Deserialize)]
struct LogisticFile {
    coef: Vec<f64>,
    intercept: f64,
    #[serde(default = "default_threshold")]
    threshold: f64,
}

/// Binary logistic regression: `sigmoid(x . coef + intercept)`.
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticModel {
    coef: Array1<f64>,
    intercept: f64,
    threshold: f64,
}

impl LogisticModel {
    pub fn new(coef: Vec<f64>, intercept: f64, threshold: f64) -> Result<Self> {
        if coef.is_empty() {
            return Err(PipelineError::artifact("classifier", "empty coefficient vector"));
        }
        if !(0.0..=1.0).contains(&threshold) {
            return Err(PipelineError::artifact(
                "classifier",
                format!("threshold {threshold} outside [0, 1]"),
            ));
        }
        Ok(Self {
            coef: Array1::from(coef),
            intercept,
            threshold,
        })
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let file: LogisticFile = serde_json::from_str(raw)?;
        Self::new(file.coef, file.intercept, file.threshold)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    fn check_width(&self, matrix: &Array2<f64>) -> Result<()> {
        if matrix.ncols() == self.coef.len() {
            Ok(())
        } else {
            Err(PipelineError::artifact(
                "classifier",
                format!(
                    "trained on {} features, got {}",
                    self.coef.len(),
                    matrix.ncols()
                ),
            ))
        }
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl Classifier for LogisticModel {
    fn width(&self) -> usize {
        self.coef.len()
    }

    fn predict(&self, matrix: &Array2<f64>) -> Result<Vec<bool>> {
        Ok(self
            .predict_proba(matrix)?
            .into_iter()
            .map(|p| p >= self.threshold)
            .collect())
    }

    fn predict_proba(&self, matrix: &Array2<f64>) -> Result<Vec<f64>> {
        self.check_width(matrix)?;
        Ok(matrix
            .dot(&self.coef)
            .iter()
            .map(|z| sigmoid(z + self.intercept))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_predict_proba() {
        let model = LogisticModel::new(vec![1.0, -1.0], 0.0, 0.5).unwrap();
        let probs = model.predict_proba(&array![[0.0, 0.0], [5.0, 0.0], [0.0, 5.0]]).unwrap();
        assert!((probs[0] - 0.5).abs() < 1e-12);
        assert!(probs[1] > 0.99);
        assert!(probs[2] < 0.01);
    }

    #[test]
    fn test_predict_uses_threshold() {
        let model = LogisticModel::from_json(r#"{"coef":[1.0],"intercept":0.0,"threshold":0.9}"#)
            .unwrap();
        let labels = model.predict(&array![[1.0], [4.0]]).unwrap();
        assert_eq!(labels, vec![false, true]);
    }

    #[test]
    fn test_default_threshold() {
        let model = LogisticModel::from_json(r#"{"coef":[2.0],"intercept":-1.0}"#).unwrap();
        assert_eq!(model.predict(&array![[0.0], [1.0]]).unwrap(), vec![false, true]);
    }

    #[test]
    fn test_rejects_bad_artifacts() {
        assert!(LogisticModel::from_json(r#"{"coef":[],"intercept":0}"#).is_err());
        assert!(LogisticModel::from_json(r#"{"coef":[1],"intercept":0,"threshold":2}"#).is_err());
        let model = LogisticModel::new(vec![1.0], 0.0, 0.5).unwrap();
        assert!(model.predict(&array![[1.0, 2.0]]).is_err());
    }
}
