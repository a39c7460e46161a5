//! Core data model: roles, raw attribute cells, and input elements.

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Attribute holding the element's tag name.
pub const TAG_NAME: &str = "tagName";
/// Attribute holding the computed CSS text alignment.
pub const TEXT_ALIGN: &str = "textAlign";
/// Attributes expanded into indicator columns during alignment.
pub const CATEGORICAL_ATTRIBUTES: &[&str] = &[TAG_NAME, TEXT_ALIGN];

/// Structural role an element can fill on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Title,
    Content,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Title, Role::Content];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Title => "title",
            Role::Content => "content",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw attribute cell as read from the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Number(f64),
    Bool(bool),
    Text(String),
    Missing,
}

impl AttrValue {
    /// Wrap a textual cell; an empty cell is `Missing`.
    pub fn from_text(raw: &str) -> Self {
        if raw.is_empty() {
            AttrValue::Missing
        } else {
            AttrValue::Text(raw.to_string())
        }
    }

    /// Render the cell as a category label, if it carries one.
    pub fn as_label(&self) -> Option<String> {
        match self {
            AttrValue::Number(n) => Some(n.to_string()),
            AttrValue::Bool(b) => Some(if *b { "True" } else { "False" }.to_string()),
            AttrValue::Text(s) if !s.is_empty() => Some(s.clone()),
            AttrValue::Text(_) | AttrValue::Missing => None,
        }
    }
}

impl From<serde_json::Value> for AttrValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => AttrValue::Missing,
            serde_json::Value::Bool(b) => AttrValue::Bool(b),
            // Integers stay textual so large ids keep every digit; coercion
            // still reads them as numbers.
            serde_json::Value::Number(n) if n.is_i64() || n.is_u64() => {
                AttrValue::Text(n.to_string())
            }
            serde_json::Value::Number(n) => n.as_f64().map_or(AttrValue::Missing, AttrValue::Number),
            serde_json::Value::String(s) => AttrValue::from_text(&s),
            other => AttrValue::Text(other.to_string()),
        }
    }
}

/// Identity of an element, carried alongside its features through every stage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementKey {
    pub id: String,
    pub job: Option<String>,
}

/// Names of the columns that identify an element and its job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputColumns {
    pub id: String,
    pub job: String,
}

impl Default for InputColumns {
    fn default() -> Self {
        Self {
            id: "crawlerId".to_string(),
            job: "jobId".to_string(),
        }
    }
}

/// One candidate DOM node from a crawled page.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub key: ElementKey,
    pub tag_name: String,
    pub text_align: Option<String>,
    /// Remaining attributes, excluding identity and categorical columns.
    pub attributes: BTreeMap<String, AttrValue>,
}

impl Element {
    /// Build an element from one row of named cells.
    ///
    /// The identifier, tag name, and text-alignment columns must all be
    /// present; identifier and tag name must also be non-empty.
    pub fn from_fields<I>(row: usize, fields: I, columns: &InputColumns) -> Result<Self>
    where
        I: IntoIterator<Item = (String, AttrValue)>,
    {
        let mut attributes: BTreeMap<String, AttrValue> = fields.into_iter().collect();

        let id = required_label(row, &mut attributes, &columns.id)?;
        let tag_name = required_label(row, &mut attributes, TAG_NAME)?;
        let text_align = attributes
            .remove(TEXT_ALIGN)
            .ok_or_else(|| missing(row, TEXT_ALIGN))?
            .as_label();
        let job = attributes.remove(&columns.job).and_then(|v| v.as_label());

        Ok(Self {
            key: ElementKey { id, job },
            tag_name,
            text_align,
            attributes,
        })
    }

    pub fn id(&self) -> &str {
        &self.key.id
    }

    pub fn job(&self) -> Option<&str> {
        self.key.job.as_deref()
    }

    /// Value of a categorical attribute, by attribute name.
    pub fn category(&self, attribute: &str) -> Option<&str> {
        match attribute {
            TAG_NAME => Some(self.tag_name.as_str()),
            TEXT_ALIGN => self.text_align.as_deref(),
            _ => None,
        }
    }
}

fn required_label(
    row: usize,
    attributes: &mut BTreeMap<String, AttrValue>,
    name: &str,
) -> Result<String> {
    attributes
        .remove(name)
        .and_then(|v| v.as_label())
        .ok_or_else(|| missing(row, name))
}

fn missing(row: usize, attribute: &str) -> PipelineError {
    PipelineError::MissingAttribute {
        row,
        attribute: attribute.to_string(),
    }
}
