//! `role-classifier predict`: score a batch and report title/content candidates.

use crate::audit::{AuditEvent, AuditLogger};
use crate::cli::output::{self, Styled};
use crate::input::{read_batch, InputFormat};
use crate::report::{write_report, ReportFormat};
use anyhow::{Context, Result};
use clap::Args;
use role_classifier::{
    ArgmaxScope, ArtifactSet, Pipeline, PipelineConfig, PredictionReport, SelectionPolicy,
};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

#[derive(Debug, Clone, Args)]
pub struct PredictArgs {
    /// Directory holding datasetinfo, scaler, and classifier artifacts.
    #[arg(long, short = 'a')]
    pub artifacts: PathBuf,

    /// File of elements to score (stdin when omitted).
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,

    /// Where the report is written (stdout when omitted).
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Input format; inferred from the input extension when omitted.
    #[arg(long, value_enum)]
    pub format: Option<InputFormat>,

    /// Pipeline settings file (JSON). Flags below override it.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub policy: Option<Policy>,

    #[arg(long, value_enum)]
    pub argmax_scope: Option<Scope>,

    /// Column holding the element identifier.
    #[arg(long)]
    pub id_column: Option<String>,

    /// Column grouping elements into jobs.
    #[arg(long)]
    pub job_column: Option<String>,

    #[arg(long, value_enum, default_value_t)]
    pub report: ReportFormat,

    /// Append a JSONL record of this run to the given file.
    #[arg(long)]
    pub audit_log: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Policy {
    Threshold,
    Argmax,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Scope {
    PerJob,
    PerBatch,
}

impl PredictArgs {
    /// Settings file (or defaults) with command-line overrides applied.
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => PipelineConfig::default(),
        };
        if let Some(policy) = self.policy {
            config.policy = match policy {
                Policy::Threshold => SelectionPolicy::Threshold,
                Policy::Argmax => SelectionPolicy::Argmax,
            };
        }
        if let Some(scope) = self.argmax_scope {
            config.argmax_scope = match scope {
                Scope::PerJob => ArgmaxScope::PerJob,
                Scope::PerBatch => ArgmaxScope::PerBatch,
            };
        }
        if let Some(id) = &self.id_column {
            config.id_column = id.clone();
        }
        if let Some(job) = &self.job_column {
            config.job_column = job.clone();
        }
        Ok(config)
    }

    fn input_label(&self) -> String {
        self.input
            .as_ref()
            .map_or_else(|| "-".to_string(), |p| p.display().to_string())
    }
}

/// Run the predict command.
pub fn run(args: &PredictArgs) -> Result<PredictionReport> {
    let start = Instant::now();
    let config = args.pipeline_config()?;
    let mut event = AuditEvent::begin(
        &args.input_label(),
        &args.artifacts,
        config.policy.as_str(),
    );

    let result = execute(args, config);

    if let Some(path) = &args.audit_log {
        event.duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(report) => {
                event.elements = Some(report.elements);
                event.titles = Some(report.titles().len());
                event.contents = Some(report.contents().len());
            }
            Err(err) => event.status = format!("error: {err:#}"),
        }
        let logged = AuditLogger::open(path).and_then(|mut logger| logger.log(&event));
        match (logged, &result) {
            (Err(err), Ok(_)) => return Err(err),
            (Err(err), Err(_)) => {
                warn!(audit_log = %path.display(), "audit write failed: {err:#}")
            }
            (Ok(()), _) => {}
        }
    }

    let report = result?;
    if !output::is_quiet() {
        let s = Styled::new();
        eprintln!(
            "  {} {} elements, {} title and {} content candidates in {:.1}s",
            s.ok_sym(),
            report.elements,
            s.green(&report.titles().len().to_string()),
            s.green(&report.contents().len().to_string()),
            start.elapsed().as_secs_f64()
        );
    }
    Ok(report)
}

fn execute(args: &PredictArgs, config: PipelineConfig) -> Result<PredictionReport> {
    let artifacts = ArtifactSet::load_dir(&args.artifacts)
        .with_context(|| format!("loading artifacts from {}", args.artifacts.display()))?;

    let columns = config.input_columns();
    let elements = match &args.input {
        Some(path) => {
            let format = args.format.unwrap_or_else(|| InputFormat::from_path(path));
            let file =
                File::open(path).with_context(|| format!("opening {}", path.display()))?;
            read_batch(file, format, &columns)
        }
        None => read_batch(
            io::stdin().lock(),
            args.format.unwrap_or(InputFormat::Csv),
            &columns,
        ),
    }
    .with_context(|| format!("reading elements from {}", args.input_label()))?;
    info!(elements = elements.len(), input = %args.input_label(), "read batch");

    let report = Pipeline::new(&artifacts, config).run(&elements)?;

    match &args.output {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("creating {}", path.display()))?;
            write_report(BufWriter::new(file), &report, args.report)?;
        }
        None => write_report(io::stdout().lock(), &report, args.report)?,
    }
    Ok(report)
}
