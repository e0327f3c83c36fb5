//! Tearsheet CLI binary.
//!
//! Reads a NAV, price or return table and prints its performance report.

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process;
use tearsheet::ingest::market::Bar;
use tearsheet::metrics::Analysis;
use tearsheet::output::{ExportFormat, Exporter, Summary};
use tearsheet::{AnalysisConfig, Pipeline};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "tearsheet")]
#[command(about = "Performance and risk metrics for NAV and return series", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a CSV file with a date column and a value column
    Analyze {
        /// Input CSV file
        file: PathBuf,

        #[command(flatten)]
        options: ReportOptions,

        /// Also write the aligned daily returns to this CSV file
        #[arg(long)]
        returns: Option<PathBuf>,

        /// Minimum number of parsed rows
        #[arg(long, default_value = "2")]
        min_points: usize,
    },

    /// Analyze a JSON array of market bars (`[{"t": <epoch ms>, "c": <close>}]`)
    Bars {
        /// Input JSON file
        file: PathBuf,

        #[command(flatten)]
        options: ReportOptions,
    },
}

#[derive(clap::Args)]
struct ReportOptions {
    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Reference date for month- and year-to-date returns (YYYY-MM-DD)
    #[arg(long)]
    as_of: Option<NaiveDate>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Plain-text table
    Text,
    /// Markdown tables
    Markdown,
    /// JSON report with daily returns
    Json,
    /// `metric,value` rows
    Csv,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match cli.command {
        Commands::Analyze {
            file,
            options,
            returns,
            min_points,
        } => {
            let mut config = analysis_config(&options);
            config.min_points = min_points;
            let pipeline = Pipeline::new(&config)?;
            let output = pipeline.run_path(&file)?;

            if let Some(path) = returns {
                output
                    .analysis
                    .returns
                    .export_to_file(&path, ExportFormat::Csv)?;
                tracing::info!(path = %path.display(), "wrote daily returns");
            }

            let summary = Summary::new(
                display_name(&file),
                &output.analysis,
                output.series.skipped.len(),
            );
            print_report(&summary, &output.analysis, options.format)?;
        }
        Commands::Bars { file, options } => {
            let reader = BufReader::new(File::open(&file)?);
            let bars: Vec<Bar> = serde_json::from_reader(reader)?;
            let pipeline = Pipeline::new(&analysis_config(&options))?;
            let analysis = pipeline.run_bars(&bars)?;

            let summary = Summary::new(display_name(&file), &analysis, 0);
            print_report(&summary, &analysis, options.format)?;
        }
    }

    Ok(())
}

fn init_tracing(verbosity: u8) -> Result<(), Box<dyn std::error::Error>> {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn analysis_config(options: &ReportOptions) -> AnalysisConfig {
    let mut config = AnalysisConfig::default();
    config.metrics.as_of = options.as_of;
    config
}

fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

fn print_report(
    summary: &Summary,
    analysis: &Analysis,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Text => print!("{}", summary.to_ascii_table()),
        OutputFormat::Markdown => print!("{}", summary.to_markdown()),
        OutputFormat::Json => println!("{}", analysis.export_to_string(ExportFormat::PrettyJson)?),
        OutputFormat::Csv => print!("{}", analysis.export_to_string(ExportFormat::Csv)?),
    }
    Ok(())
}
