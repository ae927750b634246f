//! mixfreq CLI: batch and single-table feature preparation.
//!
//! Commands:
//! - `run`: process the daily, monthly and quarterly inputs of a config
//! - `process`: process one CSV table at a given frequency
//! - `config`: print the default configuration as TOML

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use mixfreq_core::data::{ParquetSink, TableSink};
use mixfreq_core::domain::{DateRange, Frequency};
use mixfreq_runner::{
    run_batch, run_one, write_manifest, BatchReport, CsvSink, CsvSource, OutcomeStatus,
    OutputFormat, PrepConfig,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "mixfreq",
    about = "mixfreq: mixed-frequency feature preparation for quarterly models"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process the daily, monthly and quarterly inputs into quarter-start tables.
    Run {
        /// Path to a TOML config file. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Start date (YYYY-MM-DD). Overrides the config.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Overrides the config.
        #[arg(long)]
        end: Option<String>,

        /// Directory holding {daily,monthly,quarterly}_data.csv.
        #[arg(long)]
        input_dir: Option<PathBuf>,

        /// Output directory for processed tables and manifest.json.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Output format: csv or parquet.
        #[arg(long)]
        format: Option<String>,

        /// Process the frequencies one after another.
        #[arg(long, default_value_t = false)]
        sequential: bool,
    },
    /// Process a single CSV table at the given frequency.
    Process {
        /// daily, monthly or quarterly.
        #[arg(long)]
        frequency: String,

        /// Input CSV file.
        #[arg(long)]
        input: PathBuf,

        /// Output file; a .parquet extension writes Parquet, anything else CSV.
        #[arg(long)]
        output: PathBuf,

        /// Start date (YYYY-MM-DD). Defaults to 1982-01-01.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to 2020-07-01.
        #[arg(long)]
        end: Option<String>,

        /// Name of the date column in the input.
        #[arg(long, default_value = "Date")]
        date_column: String,
    },
    /// Print the default configuration as TOML.
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            start,
            end,
            input_dir,
            output_dir,
            format,
            sequential,
        } => run_cmd(
            config, start, end, input_dir, output_dir, format, sequential,
        ),
        Commands::Process {
            frequency,
            input,
            output,
            start,
            end,
            date_column,
        } => process_cmd(&frequency, input, output, start, end, date_column),
        Commands::Config => {
            print!("{}", PrepConfig::default().to_toml()?);
            Ok(())
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn run_cmd(
    config_path: Option<PathBuf>,
    start: Option<String>,
    end: Option<String>,
    input_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    format: Option<String>,
    sequential: bool,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => PrepConfig::from_file(&path)?,
        None => PrepConfig::default(),
    };

    if let Some(start) = parse_date(start.as_deref())? {
        config.range.start = start;
    }
    if let Some(end) = parse_date(end.as_deref())? {
        config.range.end = end;
    }
    if let Some(dir) = input_dir {
        config = config.with_input_dir(&dir);
    }
    if let Some(dir) = output_dir {
        config.output.dir = dir;
    }
    if let Some(format) = format {
        config.output.format = format.parse::<OutputFormat>()?;
    }
    if sequential {
        config.parallel = false;
    }

    let report = run_batch(&config)?;
    let manifest = write_manifest(&config, &report)?;

    print_summary(&report);
    println!("Manifest saved to: {}", manifest.display());

    if !report.all_succeeded() {
        for outcome in report.failures() {
            if let OutcomeStatus::Failed { error } = &outcome.status {
                eprintln!("Error for {}: {error}", outcome.frequency);
            }
        }
        std::process::exit(1);
    }

    Ok(())
}

fn process_cmd(
    frequency: &str,
    input: PathBuf,
    output: PathBuf,
    start: Option<String>,
    end: Option<String>,
    date_column: String,
) -> Result<()> {
    let frequency: Frequency = frequency.parse()?;

    let mut range = DateRange::default();
    if let Some(start) = parse_date(start.as_deref())? {
        range.start = start;
    }
    if let Some(end) = parse_date(end.as_deref())? {
        range.end = end;
    }

    let source = CsvSource::new(&input, date_column.clone());
    let sink = sink_for(&output, date_column);

    let stats = run_one(frequency, &source, sink.as_ref(), range)
        .with_context(|| format!("failed to process {}", input.display()))?;

    println!(
        "{frequency}: {} rows x {} cols -> {} rows x {} cols",
        stats.rows_in, stats.columns_in, stats.rows_out, stats.columns_out
    );
    println!("Output saved to: {}", output.display());
    Ok(())
}

fn sink_for(path: &Path, date_column: String) -> Box<dyn TableSink> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("parquet") => Box::new(ParquetSink::new(path)),
        _ => Box::new(CsvSink::new(path, date_column)),
    }
}

fn parse_date(s: Option<&str>) -> Result<Option<NaiveDate>> {
    let Some(s) = s else {
        return Ok(None);
    };
    match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        Ok(date) => Ok(Some(date)),
        Err(e) => bail!("invalid date '{s}' (expected YYYY-MM-DD): {e}"),
    }
}

fn print_summary(report: &BatchReport) {
    println!();
    println!("Run {}", &report.run_id[..12.min(report.run_id.len())]);
    println!(
        "Range: {} to {} ({:.2}s)",
        report.range.start, report.range.end, report.duration_secs
    );
    println!();
    println!("{:<10} {:<8} {:>8} {:>8}  Output", "Frequency", "Status", "Rows", "Cols");
    println!("{}", "-".repeat(60));
    for outcome in &report.outcomes {
        match &outcome.status {
            OutcomeStatus::Written(stats) => println!(
                "{:<10} {:<8} {:>8} {:>8}  {}",
                outcome.frequency.as_str(),
                "ok",
                stats.rows_out,
                stats.columns_out,
                outcome.output
            ),
            OutcomeStatus::Failed { .. } => println!(
                "{:<10} {:<8} {:>8} {:>8}  {}",
                outcome.frequency.as_str(),
                "FAILED",
                "-",
                "-",
                outcome.output
            ),
        }
    }
}
