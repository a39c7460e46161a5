use anyhow::Result;
use clap::{Parser, Subcommand};
use role_classifier_cli::cli::inspect_cmd::{self, InspectArgs};
use role_classifier_cli::cli::predict_cmd::{self, PredictArgs};
use role_classifier_cli::report::ReportFormat;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "role-classifier",
    version,
    about = "Pick title and content elements from crawled pages with trained classifiers"
)]
struct Cli {
    /// Machine-readable JSON output.
    #[arg(long, global = true)]
    json: bool,

    /// Only print errors and the report.
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Debug-level logging.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score a batch of elements.
    Predict(PredictArgs),
    /// Summarize an artifact directory.
    Inspect(InspectArgs),
}

fn init_tracing(quiet: bool, verbose: bool) -> Result<()> {
    let level = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("role_classifier={level}").parse::<Directive>()?),
        )
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.json {
        std::env::set_var("ROLE_CLASSIFIER_JSON", "1");
    }
    if cli.quiet {
        std::env::set_var("ROLE_CLASSIFIER_QUIET", "1");
    }
    if cli.no_color {
        std::env::set_var("ROLE_CLASSIFIER_NO_COLOR", "1");
    }
    init_tracing(cli.quiet, cli.verbose)?;

    match cli.command {
        Command::Predict(mut args) => {
            if cli.json {
                args.report = ReportFormat::Json;
            }
            predict_cmd::run(&args)?;
        }
        Command::Inspect(args) => inspect_cmd::run(&args)?,
    }
    Ok(())
}
