//! End-to-end batch transform: normalize, filter, align, impute, scale,
//! classify, select.

use crate::align::align;
use crate::artifacts::{ArtifactSet, RoleArtifacts};
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::impute::impute;
use crate::normalize::normalize_elements;
use crate::select::{select_argmax, select_threshold, ArgmaxScope, Selection, SelectionPolicy};
use crate::types::{Element, Role};
use serde::Serialize;
use tracing::{debug, info};

/// Selections for one role plus how many elements survived its blacklist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleOutcome {
    pub retained: usize,
    pub selections: Vec<Selection>,
}

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionReport {
    pub policy: SelectionPolicy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub argmax_scope: Option<ArgmaxScope>,
    pub elements: usize,
    pub title: RoleOutcome,
    pub content: RoleOutcome,
}

impl PredictionReport {
    pub fn titles(&self) -> &[Selection] {
        &self.title.selections
    }

    pub fn contents(&self) -> &[Selection] {
        &self.content.selections
    }
}

/// Borrowing view over an artifact set, configured for one selection policy.
pub struct Pipeline<'a> {
    artifacts: &'a ArtifactSet,
    config: PipelineConfig,
}

impl<'a> Pipeline<'a> {
    pub fn new(artifacts: &'a ArtifactSet, config: PipelineConfig) -> Self {
        Self { artifacts, config }
    }

    /// Score a batch. The input is never modified; identical input yields an
    /// identical report.
    pub fn run(&self, elements: &[Element]) -> Result<PredictionReport> {
        let normalized = normalize_elements(elements);

        let title = self.run_role(Role::Title, &normalized)?;
        let content = self.run_role(Role::Content, &normalized)?;

        info!(
            elements = elements.len(),
            titles = title.selections.len(),
            contents = content.selections.len(),
            policy = ?self.config.policy,
            "prediction complete"
        );

        Ok(PredictionReport {
            policy: self.config.policy,
            argmax_scope: (self.config.policy == SelectionPolicy::Argmax)
                .then_some(self.config.argmax_scope),
            elements: elements.len(),
            title,
            content,
        })
    }

    fn run_role(&self, role: Role, normalized: &[Element]) -> Result<RoleOutcome> {
        let artifacts: &RoleArtifacts = self.artifacts.role(role);

        let retained = artifacts.blacklist.filter(normalized);
        debug!(
            %role,
            kept = retained.len(),
            dropped = normalized.len() - retained.len(),
            "applied blacklist"
        );
        if retained.is_empty() {
            return Ok(RoleOutcome {
                retained: 0,
                selections: Vec::new(),
            });
        }

        let aligned = align(&retained, &artifacts.schema);
        let features = impute(&aligned, &artifacts.frequencies)?;
        let scaled = artifacts.scaler.transform(&features.to_array())?;

        let selections = match self.config.policy {
            SelectionPolicy::Threshold => {
                let labels = artifacts.classifier.predict(&scaled)?;
                expect_rows(role, labels.len(), features.len())?;
                select_threshold(features.keys(), &labels)
            }
            SelectionPolicy::Argmax => {
                let probabilities = artifacts.classifier.predict_proba(&scaled)?;
                expect_rows(role, probabilities.len(), features.len())?;
                select_argmax(features.keys(), &probabilities, self.config.argmax_scope)
            }
        };
        debug!(%role, selected = selections.len(), "selected candidates");

        Ok(RoleOutcome {
            retained: features.len(),
            selections,
        })
    }
}

fn expect_rows(role: Role, got: usize, expected: usize) -> Result<()> {
    if got == expected {
        Ok(())
    } else {
        Err(PipelineError::artifact(
            format!("{role} classifier"),
            format!("returned {got} outputs for {expected} rows"),
        ))
    }
}
