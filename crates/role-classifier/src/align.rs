//! Reconcile a live batch with a role's trained schema.
//!
//! Categorical attributes are expanded into `<attribute>_<value>` indicator
//! columns. Every schema column is then filled from the batch when present or
//! synthesized as zero when absent; live columns the schema does not name are
//! dropped. Rows keep their element key so results map back without relying
//! on ordering.

use crate::schema::{indicator_name, ColumnKind, TrainedSchema};
use crate::types::{AttrValue, Element, ElementKey, CATEGORICAL_ATTRIBUTES};
use std::collections::BTreeSet;
use tracing::debug;

/// One element's cells in schema order, prior to numeric coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedRow {
    pub key: ElementKey,
    pub cells: Vec<AttrValue>,
}

/// Batch whose columns match a trained schema exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedBatch<'s> {
    pub schema: &'s TrainedSchema,
    pub rows: Vec<AlignedRow>,
}

impl AlignedBatch<'_> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &AttrValue> {
        self.rows.iter().map(move |row| &row.cells[index])
    }
}

/// Indicator and attribute columns observed in a batch.
#[derive(Debug, Default)]
struct LiveSchema {
    indicators: BTreeSet<String>,
    attributes: BTreeSet<String>,
}

impl LiveSchema {
    fn observe(elements: &[&Element]) -> Self {
        let mut live = Self::default();
        for el in elements {
            for attr in CATEGORICAL_ATTRIBUTES {
                if let Some(value) = el.category(attr) {
                    live.indicators.insert(indicator_name(attr, value));
                }
            }
            live.attributes.extend(el.attributes.keys().cloned());
        }
        live
    }

    fn has(&self, name: &str) -> bool {
        self.indicators.contains(name) || self.attributes.contains(name)
    }
}

/// Align filtered elements against `schema`.
///
/// The output has exactly `schema.len()` cells per row, in schema order, and
/// one row per input element in input order.
pub fn align<'s>(elements: &[&Element], schema: &'s TrainedSchema) -> AlignedBatch<'s> {
    let live = LiveSchema::observe(elements);

    let discarded = live
        .indicators
        .iter()
        .chain(live.attributes.iter())
        .filter(|name| !schema.contains(name))
        .count();
    let synthesized = schema.names().filter(|name| !live.has(name)).count();
    debug!(
        rows = elements.len(),
        columns = schema.len(),
        synthesized,
        discarded,
        "aligned batch to trained schema"
    );

    let rows = elements
        .iter()
        .map(|el| AlignedRow {
            key: el.key.clone(),
            cells: schema
                .columns()
                .iter()
                .map(|col| match &col.kind {
                    ColumnKind::Categorical { attribute, value } => {
                        let hit = el.category(attribute) == Some(value.as_str());
                        AttrValue::Number(if hit { 1.0 } else { 0.0 })
                    }
                    ColumnKind::Numeric if live.attributes.contains(&col.name) => el
                        .attributes
                        .get(&col.name)
                        .cloned()
                        .unwrap_or(AttrValue::Missing),
                    ColumnKind::Numeric => AttrValue::Number(0.0),
                })
                .collect(),
        })
        .collect();

    AlignedBatch { schema, rows }
}
