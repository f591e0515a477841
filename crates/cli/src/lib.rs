//! CLI for aggbench.
//!
//! This crate provides the `aggbench` command: `run` benchmarks a pipeline
//! and records every run, `charts` renders the stored medians as an HTML
//! bar chart, and `report` writes them as JSON and markdown.

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod logging;
pub mod settings;

use aggbench_adapters::{AggregationTarget, ConnectionParams, MongoTarget, Pipeline, PipelineSource};
use aggbench_benchmarks::{chart, io as report_io, markdown, RunContext, RunCount, Runner};
use aggbench_storage::SampleStore;
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::logging::LogFormat;
use crate::settings::Settings;

/// Aggregation pipeline benchmark CLI.
#[derive(Parser, Debug)]
#[command(name = "aggbench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ./aggbench.toml if present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database holding the samples.
    #[arg(long, global = true)]
    pub database_path: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Benchmark an aggregation pipeline and store one sample per run.
    Run(RunArgs),

    /// Render stored median durations as an HTML bar chart.
    #[command(alias = "generateCharts")]
    Charts {
        /// Output file (defaults to the configured chart path).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write stored median durations as JSON and markdown.
    Report {
        /// Output directory (defaults to the configured report directory).
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
}

/// Arguments of the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// MongoDB connection string.
    #[arg(long, env = "AGGBENCH_URI")]
    pub uri: Option<String>,

    /// Database name.
    #[arg(long, env = "AGGBENCH_DATABASE")]
    pub database: Option<String>,

    /// Collection name.
    #[arg(long, env = "AGGBENCH_COLLECTION")]
    pub collection: Option<String>,

    /// Number of runs; values below 1 fall back to 1.
    #[arg(short = 'n', long = "runs", allow_hyphen_values = true)]
    pub runs: Option<String>,

    /// Read the pipeline from a file.
    #[arg(long, conflicts_with = "clipboard")]
    pub pipeline: Option<PathBuf>,

    /// Read the pipeline from the system clipboard.
    #[arg(long)]
    pub clipboard: bool,
}

impl RunArgs {
    /// Where the pipeline text comes from; stdin unless a flag says otherwise.
    pub fn pipeline_source(&self) -> PipelineSource {
        match (&self.pipeline, self.clipboard) {
            (Some(path), _) => PipelineSource::File(path.clone()),
            (None, true) => PipelineSource::Clipboard,
            (None, false) => PipelineSource::Stdin,
        }
    }
}

/// Parse arguments, set up logging and run the selected command.
pub async fn run() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_format);
    execute(cli).await
}

/// Run a parsed command line.
pub async fn execute(cli: Cli) -> anyhow::Result<()> {
    let mut settings = Settings::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(path) = cli.database_path {
        settings.database_path = path;
    }

    match cli.command {
        Commands::Run(args) => run_benchmark(args, &settings).await,
        Commands::Charts { output } => {
            let path = output.unwrap_or_else(|| settings.chart_path.clone());
            let rows = load_medians(&settings).await?;
            chart::write_chart(&rows, &path)
                .with_context(|| format!("failed to write chart to {}", path.display()))?;
            println!("{} {}", "Chart generated:".green().bold(), path.display());
            Ok(())
        }
        Commands::Report { output_dir } => {
            let dir = output_dir.unwrap_or_else(|| settings.report_dir.clone());
            let rows = load_medians(&settings).await?;
            let paths = report_io::write_report(&rows, &dir)
                .with_context(|| format!("failed to write report to {}", dir.display()))?;
            print!("{}", markdown::generate_summary(&rows));
            println!(
                "{} {} and {}",
                "Report written:".green().bold(),
                paths.medians.display(),
                paths.summary.display()
            );
            Ok(())
        }
    }
}

async fn open_store(settings: &Settings) -> anyhow::Result<SampleStore> {
    let store = SampleStore::open(&settings.database_path)
        .await
        .with_context(|| format!("failed to open {}", settings.database_path.display()))?;
    store.initialize().await.context("failed to initialize sample table")?;
    Ok(store)
}

async fn load_medians(settings: &Settings) -> anyhow::Result<Vec<aggbench_core::MedianResult>> {
    let store = open_store(settings).await?;
    let rows = store.query_median_durations().await;
    store.close().await;

    let rows = rows.context("failed to query median durations")?;
    if rows.is_empty() {
        warn!(path = %settings.database_path.display(), "No samples recorded yet");
    }
    Ok(rows)
}

async fn run_benchmark(args: RunArgs, settings: &Settings) -> anyhow::Result<()> {
    // Input problems must surface before anything is timed or stored.
    let params = ConnectionParams::new(
        args.uri.clone().unwrap_or_default(),
        args.database.clone().unwrap_or_default(),
        args.collection.clone().unwrap_or_default(),
    )?;
    let runs = match &args.runs {
        Some(text) => RunCount::parse_lenient(text),
        None => RunCount::from_requested(settings.runs),
    };

    let source = args.pipeline_source();
    if source == PipelineSource::Stdin && std::io::stdin().is_terminal() {
        eprintln!("Paste your aggregation pipeline, then press Ctrl-D:");
    }
    let text = source.read().await.context("failed to read pipeline")?;
    let pipeline = Pipeline::parse(&text).context("invalid pipeline input")?;
    println!("Processed pipeline:");
    println!("{}", pipeline.to_pretty());

    let target = MongoTarget::connect(params.clone())
        .await
        .context("invalid connection URI")?;

    let store = open_store(settings).await?;
    let outcome = benchmark(&store, &target, &params, runs, &pipeline).await;
    store.close().await;

    let summary = outcome?;
    println!();
    print!("{}", markdown::generate_run_report(&summary));
    println!(
        "{} All {} queries completed. Performance data saved to {}",
        "Done.".green().bold(),
        summary.runs(),
        settings.database_path.display()
    );
    Ok(())
}

async fn benchmark(
    store: &SampleStore,
    target: &dyn AggregationTarget,
    params: &ConnectionParams,
    runs: RunCount,
    pipeline: &Pipeline,
) -> anyhow::Result<aggbench_benchmarks::RunSummary> {
    let server_version = target
        .server_version()
        .await
        .context("failed to query server version")?;
    info!(uri = %params.uri, %server_version, "Connected");

    let progress = ProgressBar::new(u64::from(runs.get())).with_style(
        ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} runs ({elapsed})")?
            .progress_chars("=> "),
    );
    let context = RunContext::new(params.group_key(), server_version, runs);

    let summary = Runner::new(store, target)
        .with_progress(progress)
        .run(&context, pipeline)
        .await?;
    Ok(summary)
}
