//! Render a prediction report for the result sink.

use clap::ValueEnum;
use role_classifier::{PredictionReport, Selection};
use std::io::Write;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// `titles: [..]` and `contents: [..]` lines.
    #[default]
    Text,
    /// The full report as pretty-printed JSON.
    Json,
}

fn label(selection: &Selection) -> String {
    match &selection.job {
        Some(job) => format!("{job}:{}", selection.id),
        None => selection.id.clone(),
    }
}

fn id_list(selections: &[Selection]) -> String {
    let ids: Vec<String> = selections.iter().map(label).collect();
    format!("[{}]", ids.join(","))
}

/// Two lines, one per role, listing selected element ids.
pub fn render_text(report: &PredictionReport) -> String {
    format!(
        "titles: {}\ncontents: {}\n",
        id_list(report.titles()),
        id_list(report.contents())
    )
}

pub fn render_json(report: &PredictionReport) -> serde_json::Result<String> {
    let mut out = serde_json::to_string_pretty(report)?;
    out.push('\n');
    Ok(out)
}

pub fn write_report<W: Write>(
    mut sink: W,
    report: &PredictionReport,
    format: ReportFormat,
) -> anyhow::Result<()> {
    let body = match format {
        ReportFormat::Text => render_text(report),
        ReportFormat::Json => render_json(report)?,
    };
    sink.write_all(body.as_bytes())?;
    sink.flush()?;
    Ok(())
}
