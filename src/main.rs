//! Command-line entry point.
//!
//! Thin wrapper around the `seo_pulse` library: argument parsing, logging
//! setup and JSON output. The HTML is read from disk; fetching is out of scope
//! for the binary.

use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use seo_pulse::domain::models::PerformanceMetrics;
use seo_pulse::lifecycle::init_logging;
use seo_pulse::service::{MetricsProvider, NoMetrics, StaticMetrics};
use seo_pulse::{AnalysisConfig, Orchestrator, PageInput, ProgressSummary, ResponseMeta};

#[derive(Debug, Parser)]
#[command(name = "seo-pulse", version, about = "Single-page SEO quality assessment")]
struct Cli {
    /// Debug-level logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze one saved HTML document
    Analyze(AnalyzeArgs),
}

#[derive(Debug, Args)]
struct AnalyzeArgs {
    /// HTML file to analyze
    html_file: PathBuf,

    /// URL the document was served from
    #[arg(long)]
    url: String,

    /// HTTP status code of the response
    #[arg(long, default_value_t = 200)]
    status: u16,

    /// Response header as "Name: value"; repeatable
    #[arg(long = "header", value_name = "NAME: VALUE")]
    headers: Vec<String>,

    /// JSON file with runtime performance metrics
    #[arg(long)]
    metrics: Option<PathBuf>,

    /// The HTML came from a browser render
    #[arg(long)]
    rendered: bool,

    /// JSON config overriding the built-in defaults
    #[arg(long, env = "SEO_PULSE_CONFIG")]
    config: Option<PathBuf>,

    /// Print the progress summary instead of the full result
    #[arg(long)]
    summary: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let outcome = match cli.command {
        Command::Analyze(args) => analyze(args).await,
    };

    if let Err(e) = outcome {
        eprintln!("seo-pulse error: {:#}", e);
        process::exit(1);
    }
}

async fn analyze(args: AnalyzeArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };

    let html = std::fs::read_to_string(&args.html_file)
        .with_context(|| format!("Failed to read {}", args.html_file.display()))?;

    let mut response = ResponseMeta {
        status_code: args.status,
        ..Default::default()
    };
    for raw in &args.headers {
        let (name, value) = parse_header(raw)?;
        response = response.with_header(name, value);
    }

    let metrics: Arc<dyn MetricsProvider> = match &args.metrics {
        Some(path) => Arc::new(StaticMetrics::new(load_metrics(path)?)),
        None => Arc::new(NoMetrics),
    };

    let orchestrator = Orchestrator::builder()
        .config(config)
        .metrics(metrics)
        .build()
        .context("Invalid analysis configuration")?;

    let input = PageInput::new(args.url, html)
        .with_response(response)
        .rendered(args.rendered);
    let result = orchestrator.analyze(input).await;

    let json = if args.summary {
        render(&ProgressSummary::from(&result), args.pretty)?
    } else {
        render(&result, args.pretty)?
    };
    println!("{}", json);
    Ok(())
}

fn parse_header(raw: &str) -> Result<(&str, &str)> {
    match raw.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value.trim())),
        _ => bail!("Header must look like \"Name: value\", got {:?}", raw),
    }
}

fn load_metrics(path: &Path) -> Result<PerformanceMetrics> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read metrics file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse metrics file {}", path.display()))
}

fn render<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
