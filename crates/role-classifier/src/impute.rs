//! Frequency imputation for numeric cells that fail coercion.

use crate::align::AlignedBatch;
use crate::error::{PipelineError, Result};
use crate::schema::{ColumnKind, TrainedSchema};
use crate::types::{AttrValue, ElementKey};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Per-column fallback values recorded at training time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrequencyTable {
    values: BTreeMap<String, f64>,
}

impl FrequencyTable {
    pub fn new(values: BTreeMap<String, f64>) -> Self {
        Self { values }
    }

    /// Parse the JSON object line of a dataset info file.
    pub fn parse(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line.trim())?)
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.values.get(column).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Numeric schema columns with no fallback entry.
    pub fn uncovered<'s>(&self, schema: &'s TrainedSchema) -> Vec<&'s str> {
        schema
            .numeric_columns()
            .filter(|c| !self.values.contains_key(&c.name))
            .map(|c| c.name.as_str())
            .collect()
    }
}

/// Coerce one cell to a number. Unparseable text, missing cells, and NaN all fail.
pub fn coerce(value: &AttrValue) -> Option<f64> {
    let n = match value {
        AttrValue::Number(n) => *n,
        AttrValue::Bool(b) => f64::from(u8::from(*b)),
        AttrValue::Text(s) => s.trim().parse::<f64>().ok()?,
        AttrValue::Missing => return None,
    };
    (!n.is_nan()).then_some(n)
}

/// A fully numeric row ready for scaling.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub key: ElementKey,
    pub values: Vec<f64>,
}

/// Imputed batch: keys and numeric features travel together.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureBatch {
    pub width: usize,
    pub rows: Vec<FeatureRow>,
}

impl FeatureBatch {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &ElementKey> {
        self.rows.iter().map(|r| &r.key)
    }

    /// Dense row-major matrix for the scaler and classifier.
    pub fn to_array(&self) -> Array2<f64> {
        let mut matrix = Array2::zeros((self.rows.len(), self.width));
        for (mut target, row) in matrix.rows_mut().into_iter().zip(&self.rows) {
            for (cell, value) in target.iter_mut().zip(&row.values) {
                *cell = *value;
            }
        }
        matrix
    }
}

/// Replace every numeric cell that fails coercion with its frequency fallback.
///
/// Indicator columns are already numeric and are passed through; a
/// non-numeric indicator cell is rejected. A failing numeric cell in a column
/// without a fallback aborts with `MissingFrequency`.
pub fn impute(batch: &AlignedBatch<'_>, frequencies: &FrequencyTable) -> Result<FeatureBatch> {
    let columns = batch.schema.columns();
    let mut substituted = 0usize;
    let mut rows = Vec::with_capacity(batch.len());

    for row in &batch.rows {
        let mut values = Vec::with_capacity(columns.len());
        for (col, cell) in columns.iter().zip(&row.cells) {
            let value = match (&col.kind, coerce(cell)) {
                (_, Some(n)) => n,
                (ColumnKind::Numeric, None) => {
                    substituted += 1;
                    frequencies
                        .get(&col.name)
                        .ok_or_else(|| PipelineError::MissingFrequency {
                            column: col.name.clone(),
                        })?
                }
                (ColumnKind::Categorical { .. }, None) => {
                    return Err(PipelineError::InvalidSchema(format!(
                        "indicator column `{}` holds a non-numeric cell",
                        col.name
                    )));
                }
            };
            values.push(value);
        }
        rows.push(FeatureRow {
            key: row.key.clone(),
            values,
        });
    }

    debug!(rows = rows.len(), substituted, "imputed non-numeric cells");
    Ok(FeatureBatch {
        width: columns.len(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::AlignedRow;

    fn key(id: &str) -> ElementKey {
        ElementKey {
            id: id.to_string(),
            job: None,
        }
    }

    fn table(pairs: &[(&str, f64)]) -> FrequencyTable {
        FrequencyTable::new(pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect())
    }

    #[test]
    fn test_coerce() {
        assert_eq!(coerce(&AttrValue::Text(" 12.5 ".into())), Some(12.5));
        assert_eq!(coerce(&AttrValue::Text("1e3".into())), Some(1000.0));
        assert_eq!(coerce(&AttrValue::Text("16px".into())), None);
        assert_eq!(coerce(&AttrValue::Text("NaN".into())), None);
        assert_eq!(coerce(&AttrValue::Number(f64::NAN)), None);
        assert_eq!(coerce(&AttrValue::Bool(true)), Some(1.0));
        assert_eq!(coerce(&AttrValue::Missing), None);
    }

    #[test]
    fn test_parse_table() {
        let t = FrequencyTable::parse(r#"{"fontSize": 16, "backgroundAlpha": 0.0}"#).unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.get("fontSize"), Some(16.0));
        assert!(FrequencyTable::parse("not json").is_err());
    }

    #[test]
    fn test_impute_substitutes_fallback() {
        let schema = TrainedSchema::parse("fontSize,tagName_P").unwrap();
        let batch = AlignedBatch {
            schema: &schema,
            rows: vec![
                AlignedRow {
                    key: key("1"),
                    cells: vec![AttrValue::Text("NaN".into()), AttrValue::Number(1.0)],
                },
                AlignedRow {
                    key: key("2"),
                    cells: vec![AttrValue::Text("14".into()), AttrValue::Number(0.0)],
                },
            ],
        };
        let out = impute(&batch, &table(&[("fontSize", 16.0)])).unwrap();
        assert_eq!(out.rows[0].values, vec![16.0, 1.0]);
        assert_eq!(out.rows[1].values, vec![14.0, 0.0]);

        // Same input, same substitution.
        let again = impute(&batch, &table(&[("fontSize", 16.0)])).unwrap();
        assert_eq!(out, again);
    }

    #[test]
    fn test_missing_fallback_is_fatal() {
        let schema = TrainedSchema::parse("colorRed").unwrap();
        let batch = AlignedBatch {
            schema: &schema,
            rows: vec![AlignedRow {
                key: key("1"),
                cells: vec![AttrValue::Missing],
            }],
        };
        let err = impute(&batch, &FrequencyTable::default()).unwrap_err();
        assert!(err.is_configuration());
        assert!(matches!(err, PipelineError::MissingFrequency { ref column } if column == "colorRed"));
    }

    #[test]
    fn test_fallback_only_needed_on_failure() {
        let schema = TrainedSchema::parse("colorRed").unwrap();
        let batch = AlignedBatch {
            schema: &schema,
            rows: vec![AlignedRow {
                key: key("1"),
                cells: vec![AttrValue::Number(255.0)],
            }],
        };
        let out = impute(&batch, &FrequencyTable::default()).unwrap();
        assert_eq!(out.rows[0].values, vec![255.0]);
    }

    #[test]
    fn test_non_numeric_indicator_rejected() {
        let schema = TrainedSchema::parse("tagName_P").unwrap();
        let batch = AlignedBatch {
            schema: &schema,
            rows: vec![AlignedRow {
                key: key("1"),
                cells: vec![AttrValue::Text("P".into())],
            }],
        };
        let fallback = table(&[("tagName_P", 0.0)]);
        let err = impute(&batch, &fallback).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidSchema(ref msg) if msg.contains("tagName_P")));
    }

    #[test]
    fn test_to_array_shape() {
        let batch = FeatureBatch {
            width: 2,
            rows: vec![
                FeatureRow {
                    key: key("1"),
                    values: vec![1.0, 2.0],
                },
                FeatureRow {
                    key: key("2"),
                    values: vec![3.0, 4.0],
                },
            ],
        };
        let m = batch.to_array();
        assert_eq!(m.dim(), (2, 2));
        assert_eq!(m[[1, 0]], 3.0);
    }

    #[test]
    fn test_uncovered_columns() {
        let schema = TrainedSchema::parse("left,fontSize,tagName_H1").unwrap();
        let t = table(&[("fontSize", 16.0)]);
        assert_eq!(t.uncovered(&schema), vec!["left"]);
    }
}
