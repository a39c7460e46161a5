//! Frozen, ordered feature columns a classifier was trained on.

use crate::error::{PipelineError, Result};
use crate::types::CATEGORICAL_ATTRIBUTES;
use std::collections::HashSet;

/// How a schema column is populated. Fixed when the schema is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnKind {
    /// Copied from a raw attribute and coerced to a number.
    Numeric,
    /// Indicator for `attribute == value`.
    Categorical { attribute: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaColumn {
    pub name: String,
    pub kind: ColumnKind,
}

impl SchemaColumn {
    /// Classify a column by name: `<attr>_<value>` for a categorical
    /// attribute is an indicator, anything else is numeric.
    pub fn from_name(name: &str) -> Self {
        let kind = CATEGORICAL_ATTRIBUTES
            .iter()
            .find_map(|attr| {
                name.strip_prefix(attr)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|value| ColumnKind::Categorical {
                        attribute: attr.to_string(),
                        value: value.to_string(),
                    })
            })
            .unwrap_or(ColumnKind::Numeric);
        Self {
            name: name.to_string(),
            kind,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.kind == ColumnKind::Numeric
    }
}

/// Name of the indicator column for one categorical value.
pub fn indicator_name(attribute: &str, value: &str) -> String {
    format!("{attribute}_{value}")
}

/// Ordered column set one role's classifier expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainedSchema {
    columns: Vec<SchemaColumn>,
}

impl TrainedSchema {
    /// Build a schema. Empty or duplicate column names are rejected.
    pub fn new(columns: Vec<SchemaColumn>) -> Result<Self> {
        if columns.is_empty() {
            return Err(PipelineError::InvalidSchema("no columns".to_string()));
        }
        let mut seen = HashSet::with_capacity(columns.len());
        for col in &columns {
            if col.name.is_empty() {
                return Err(PipelineError::InvalidSchema(
                    "empty column name".to_string(),
                ));
            }
            if !seen.insert(col.name.as_str()) {
                return Err(PipelineError::InvalidSchema(format!(
                    "duplicate column `{}`",
                    col.name
                )));
            }
        }
        Ok(Self { columns })
    }

    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(
            names
                .into_iter()
                .map(|n| SchemaColumn::from_name(n.as_ref().trim()))
                .collect(),
        )
    }

    /// Parse the comma-separated column line of a dataset info file.
    pub fn parse(line: &str) -> Result<Self> {
        Self::from_names(line.split(','))
    }

    pub fn columns(&self) -> &[SchemaColumn] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn numeric_columns(&self) -> impl Iterator<Item = &SchemaColumn> {
        self.columns.iter().filter(|c| c.is_numeric())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }
}
