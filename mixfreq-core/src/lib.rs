//! mixfreq core: frequency alignment and lag-feature construction.
//!
//! Turns daily, monthly and quarterly series into quarter-start-indexed
//! feature tables for a mixed-frequency (MIDAS) regression:
//! - Domain types (`DatedTable`, `Frequency`, `DateRange`)
//! - Pure transforms: calendar completion, percent change, lag matrices,
//!   quarterly resampling with the one-day anchor shift
//! - The per-frequency pipeline (`process`)
//! - Input/output collaborator traits plus Parquet and in-memory implementations

pub mod data;
pub mod domain;
pub mod pipeline;
pub mod transform;

pub use domain::{Column, DateRange, DatedTable, Frequency, TableError};
pub use pipeline::{process, process_frequency, PipelineError};
