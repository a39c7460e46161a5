//! `role-classifier inspect`: summarize a loaded artifact set.

use crate::cli::output::{self, Styled};
use anyhow::{Context, Result};
use clap::Args;
use role_classifier::{ArtifactSet, Role};
use std::path::PathBuf;

#[derive(Debug, Clone, Args)]
pub struct InspectArgs {
    /// Directory holding datasetinfo, scaler, and classifier artifacts.
    #[arg(long, short = 'a')]
    pub artifacts: PathBuf,
}

/// Per-role summary of an artifact set.
pub fn summarize(artifacts: &ArtifactSet) -> serde_json::Value {
    let roles: serde_json::Map<String, serde_json::Value> = Role::ALL
        .iter()
        .map(|&role| {
            let a = artifacts.role(role);
            let numeric = a.schema.numeric_columns().count();
            (
                role.to_string(),
                serde_json::json!({
                    "columns": a.schema.len(),
                    "numeric": numeric,
                    "categorical": a.schema.len() - numeric,
                    "blacklist": a.blacklist.iter().collect::<Vec<_>>(),
                    "fallbacks": a.frequencies.len(),
                    "uncovered": a.frequencies.uncovered(&a.schema),
                }),
            )
        })
        .collect();
    serde_json::Value::Object(roles)
}

/// Run the inspect command.
pub fn run(args: &InspectArgs) -> Result<()> {
    let artifacts = ArtifactSet::load_dir(&args.artifacts)
        .with_context(|| format!("loading artifacts from {}", args.artifacts.display()))?;

    if output::is_json() {
        output::print_json(&summarize(&artifacts));
        return Ok(());
    }

    let s = Styled::new();
    output::print_header(&s);
    for role in Role::ALL {
        let a = artifacts.role(role);
        let numeric = a.schema.numeric_columns().count();
        let uncovered = a.frequencies.uncovered(&a.schema);

        output::print_section(&s, role.as_str());
        output::print_check(
            s.ok_sym(),
            "schema",
            &format!(
                "{} columns ({numeric} numeric, {} indicator)",
                a.schema.len(),
                a.schema.len() - numeric
            ),
        );
        let blacklist: Vec<&str> = a.blacklist.iter().collect();
        output::print_check(
            s.ok_sym(),
            "blacklist",
            &if blacklist.is_empty() {
                s.dim("none")
            } else {
                blacklist.join(", ")
            },
        );
        if uncovered.is_empty() {
            output::print_check(
                s.ok_sym(),
                "fallbacks",
                &format!("{} columns", a.frequencies.len()),
            );
        } else {
            output::print_check(
                s.warn_sym(),
                "fallbacks",
                &s.yellow(&format!("{} numeric columns without one", uncovered.len())),
            );
            output::print_detail(&uncovered.join(", "));
        }
        eprintln!();
    }
    Ok(())
}
