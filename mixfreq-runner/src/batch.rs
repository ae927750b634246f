//! Three-frequency batch runner.
//!
//! For each of daily, monthly and quarterly: load the input, run the
//! pipeline, write the output. Runs are isolated: one frequency failing is
//! recorded in its outcome and never aborts the others. With
//! `parallel = true` the three runs go through rayon.

use std::time::Instant;

use chrono::{DateTime, Utc};
use mixfreq_core::data::{ParquetSink, SinkError, SourceError, TableSink, TableSource};
use mixfreq_core::domain::{DateRange, DatedTable, Frequency};
use mixfreq_core::{process_frequency, PipelineError};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{ConfigError, OutputFormat, PrepConfig, RunId};
use crate::io::{CsvSink, CsvSource};

/// Errors from a single frequency run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("load failed: {0}")]
    Source(#[from] SourceError),

    #[error("pipeline failed: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("write failed: {0}")]
    Sink(#[from] SinkError),
}

/// Errors that abort the whole batch before or after the per-frequency runs.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to create output directory '{path}': {message}")]
    OutputDir { path: String, message: String },
}

/// One unit of work: a frequency wired to its collaborators.
pub struct Job {
    pub frequency: Frequency,
    pub source: Box<dyn TableSource>,
    pub sink: Box<dyn TableSink>,
}

/// Shape and content hash of the tables a successful run read and wrote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub rows_in: usize,
    pub columns_in: usize,
    pub rows_out: usize,
    pub columns_out: usize,
    pub input_hash: String,
    pub output_hash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    Written(RunStats),
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyOutcome {
    pub frequency: Frequency,
    pub input: String,
    pub output: String,
    pub status: OutcomeStatus,
}

impl FrequencyOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self.status, OutcomeStatus::Written(_))
    }
}

/// Result of a batch: one outcome per frequency, in daily/monthly/quarterly order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub run_id: RunId,
    pub started_at: DateTime<Utc>,
    pub duration_secs: f64,
    pub range: DateRange,
    pub outcomes: Vec<FrequencyOutcome>,
}

impl BatchReport {
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(FrequencyOutcome::succeeded)
    }

    pub fn failures(&self) -> impl Iterator<Item = &FrequencyOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded())
    }

    pub fn outcome(&self, frequency: Frequency) -> Option<&FrequencyOutcome> {
        self.outcomes.iter().find(|o| o.frequency == frequency)
    }
}

/// Build the standard three jobs from a config.
pub fn jobs_from_config(config: &PrepConfig) -> Vec<Job> {
    Frequency::ALL
        .iter()
        .map(|&frequency| {
            let source = Box::new(CsvSource::new(
                config.input_path(frequency),
                config.inputs.date_column.clone(),
            ));
            let output = config.output_path(frequency);
            let sink: Box<dyn TableSink> = match config.output.format {
                OutputFormat::Csv => Box::new(CsvSink::new(output, config.inputs.date_column.clone())),
                OutputFormat::Parquet => Box::new(ParquetSink::new(output)),
            };
            Job {
                frequency,
                source,
                sink,
            }
        })
        .collect()
}

/// Run the configured batch: create the output directory, then process every frequency.
pub fn run_batch(config: &PrepConfig) -> Result<BatchReport, BatchError> {
    std::fs::create_dir_all(&config.output.dir).map_err(|e| BatchError::OutputDir {
        path: config.output.dir.display().to_string(),
        message: e.to_string(),
    })?;

    let run_id = config.run_id()?;
    Ok(run_jobs(run_id, jobs_from_config(config), config.range, config.parallel))
}

/// Run arbitrary jobs over `range`. Never fails as a whole; see each outcome.
pub fn run_jobs(run_id: RunId, jobs: Vec<Job>, range: DateRange, parallel: bool) -> BatchReport {
    let started_at = Utc::now();
    let timer = Instant::now();

    let outcomes: Vec<FrequencyOutcome> = if parallel {
        jobs.par_iter().map(|job| run_job(job, range)).collect()
    } else {
        jobs.iter().map(|job| run_job(job, range)).collect()
    };

    BatchReport {
        run_id,
        started_at,
        duration_secs: timer.elapsed().as_secs_f64(),
        range,
        outcomes,
    }
}

fn run_job(job: &Job, range: DateRange) -> FrequencyOutcome {
    let status = match run_one(job.frequency, job.source.as_ref(), job.sink.as_ref(), range) {
        Ok(stats) => {
            info!(
                frequency = %job.frequency,
                rows = stats.rows_out,
                columns = stats.columns_out,
                output = %job.sink.describe(),
                "frequency written"
            );
            OutcomeStatus::Written(stats)
        }
        Err(e) => {
            warn!(frequency = %job.frequency, error = %e, "frequency failed");
            OutcomeStatus::Failed {
                error: e.to_string(),
            }
        }
    };

    FrequencyOutcome {
        frequency: job.frequency,
        input: job.source.describe(),
        output: job.sink.describe(),
        status,
    }
}

/// Load, process and write one table.
pub fn run_one(
    frequency: Frequency,
    source: &dyn TableSource,
    sink: &dyn TableSink,
    range: DateRange,
) -> Result<RunStats, RunError> {
    let input = source.load()?;
    let output = process_frequency(&input, frequency, range)?;
    sink.write(&output)?;

    Ok(RunStats {
        rows_in: input.height(),
        columns_in: input.width(),
        rows_out: output.height(),
        columns_out: output.width(),
        input_hash: table_hash(&input),
        output_hash: table_hash(&output),
    })
}

/// Deterministic BLAKE3 hash over dates, column names and values.
pub fn table_hash(table: &DatedTable) -> String {
    let mut hasher = blake3::Hasher::new();
    for date in table.dates() {
        hasher.update(date.to_string().as_bytes());
    }
    for column in table.columns() {
        hasher.update(column.name.as_bytes());
        for v in &column.values {
            hasher.update(&v.to_le_bytes());
        }
    }
    hasher.finalize().to_hex().to_string()
}
