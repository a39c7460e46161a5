//! Turn per-row classifier output into reported role assignments.

use crate::types::ElementKey;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// How a role's classifier output becomes a selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionPolicy {
    /// Every row the classifier labels positive.
    #[default]
    Threshold,
    /// The single most probable row.
    Argmax,
}

impl SelectionPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            SelectionPolicy::Threshold => "threshold",
            SelectionPolicy::Argmax => "argmax",
        }
    }
}

/// Grouping for the argmax policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArgmaxScope {
    /// One winner per job.
    #[default]
    PerJob,
    /// One winner over the whole batch, whatever jobs it holds.
    PerBatch,
}

/// An element reported for a role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<String>,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl Selection {
    fn from_key(key: &ElementKey, score: Option<f64>) -> Self {
        Self {
            job: key.job.clone(),
            id: key.id.clone(),
            score,
        }
    }
}

/// Rows labeled positive, in input order.
pub fn select_threshold<'a, K>(keys: K, labels: &[bool]) -> Vec<Selection>
where
    K: IntoIterator<Item = &'a ElementKey>,
{
    keys.into_iter()
        .zip(labels)
        .filter(|(_, positive)| **positive)
        .map(|(key, _)| Selection::from_key(key, None))
        .collect()
}

/// Highest-probability row per scope. Ties go to the earliest row; NaN never wins
/// over a real probability.
pub fn select_argmax<'a, K>(keys: K, probabilities: &[f64], scope: ArgmaxScope) -> Vec<Selection>
where
    K: IntoIterator<Item = &'a ElementKey>,
{
    let mut order: Vec<Option<&str>> = Vec::new();
    let mut leaders: HashMap<Option<&str>, (&ElementKey, f64)> = HashMap::new();
    let mut first_job: Option<Option<&str>> = None;
    let mut mixed_jobs = false;

    for (key, &p) in keys.into_iter().zip(probabilities) {
        let job = key.job.as_deref();
        match first_job {
            None => first_job = Some(job),
            Some(first) => mixed_jobs |= first != job,
        }
        let group = match scope {
            ArgmaxScope::PerJob => job,
            ArgmaxScope::PerBatch => None,
        };
        match leaders.get_mut(&group) {
            None => {
                order.push(group);
                leaders.insert(group, (key, p));
            }
            Some(leader) => {
                if beats(p, leader.1) {
                    *leader = (key, p);
                }
            }
        }
    }

    if mixed_jobs && scope == ArgmaxScope::PerBatch {
        warn!("per-batch argmax over a batch holding several jobs picks one winner for all of them");
    }

    order
        .into_iter()
        .filter_map(|group| leaders.get(&group))
        .map(|(key, p)| Selection::from_key(key, Some(*p)))
        .collect()
}

fn beats(candidate: f64, leader: f64) -> bool {
    if leader.is_nan() {
        !candidate.is_nan()
    } else {
        candidate > leader
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(specs: &[(&str, Option<&str>)]) -> Vec<ElementKey> {
        specs
            .iter()
            .map(|(id, job)| ElementKey {
                id: id.to_string(),
                job: job.map(String::from),
            })
            .collect()
    }

    fn ids(selections: &[Selection]) -> Vec<&str> {
        selections.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_threshold_keeps_positive_rows() {
        let k = keys(&[("1", None), ("2", None), ("3", None)]);
        let out = select_threshold(&k, &[true, false, true]);
        assert_eq!(ids(&out), vec!["1", "3"]);
        assert!(out.iter().all(|s| s.score.is_none()));
    }

    #[test]
    fn test_threshold_empty() {
        let k = keys(&[("1", None)]);
        assert!(select_threshold(&k, &[false]).is_empty());
    }

    #[test]
    fn test_argmax_single_job() {
        let k = keys(&[("1", None), ("2", None)]);
        let out = select_argmax(&k, &[0.9, 0.4], ArgmaxScope::PerJob);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "1");
        assert_eq!(out[0].score, Some(0.9));
    }

    #[test]
    fn test_argmax_ties_prefer_first() {
        let k = keys(&[("a", None), ("b", None), ("c", None)]);
        let out = select_argmax(&k, &[0.2, 0.7, 0.7], ArgmaxScope::PerBatch);
        assert_eq!(ids(&out), vec!["b"]);
    }

    #[test]
    fn test_argmax_nan_never_wins() {
        let k = keys(&[("a", None), ("b", None)]);
        let out = select_argmax(&k, &[f64::NAN, 0.1], ArgmaxScope::PerBatch);
        assert_eq!(ids(&out), vec!["b"]);
    }

    #[test]
    fn test_argmax_per_job() {
        let k = keys(&[
            ("1", Some("x")),
            ("2", Some("y")),
            ("3", Some("x")),
            ("4", Some("y")),
        ]);
        let probs = [0.3, 0.8, 0.6, 0.1];
        let per_job = select_argmax(&k, &probs, ArgmaxScope::PerJob);
        assert_eq!(ids(&per_job), vec!["3", "2"]);
        assert_eq!(per_job[0].job.as_deref(), Some("x"));

        let per_batch = select_argmax(&k, &probs, ArgmaxScope::PerBatch);
        assert_eq!(ids(&per_batch), vec!["2"]);
    }

    #[test]
    fn test_argmax_empty() {
        let none: Vec<ElementKey> = Vec::new();
        assert!(select_argmax(&none, &[], ArgmaxScope::PerJob).is_empty());
    }

    #[test]
    fn test_policy_names() {
        assert_eq!(
            serde_json::from_str::<ArgmaxScope>("\"per-batch\"").unwrap(),
            ArgmaxScope::PerBatch
        );
        assert_eq!(
            serde_json::to_string(&SelectionPolicy::Argmax).unwrap(),
            "\"argmax\""
        );
    }
}
