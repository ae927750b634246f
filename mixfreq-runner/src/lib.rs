//! mixfreq runner: batch orchestration on top of `mixfreq-core`.
//!
//! This crate provides:
//! - TOML configuration with defaults for the standard three-input run
//! - CSV input/output collaborators
//! - The batch runner (isolated per-frequency runs, optionally parallel)
//! - JSON run manifests with input/output content hashes

pub mod batch;
pub mod config;
pub mod io;
pub mod manifest;

pub use batch::{
    jobs_from_config, run_batch, run_jobs, run_one, table_hash, BatchError, BatchReport,
    FrequencyOutcome, Job, OutcomeStatus, RunError, RunStats,
};
pub use config::{ConfigError, InputConfig, OutputConfig, OutputFormat, PrepConfig};
pub use io::{read_csv, write_csv, CsvSink, CsvSource};
pub use manifest::{read_manifest, write_manifest, RunManifest};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn jobs_are_send_sync() {
        assert_send::<Job>();
        assert_sync::<Job>();
        assert_send::<BatchReport>();
        assert_sync::<BatchReport>();
    }
}
