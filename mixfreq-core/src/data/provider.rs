//! Input/output collaborator traits and structured error types.
//!
//! The pipeline never touches the filesystem. A `TableSource` supplies a
//! dated table and a `TableSink` accepts one, so CSV, Parquet and in-memory
//! implementations can be swapped freely (and mocked in tests).

use std::sync::Mutex;

use thiserror::Error;

use crate::domain::{DatedTable, TableError};

/// Errors raised while loading an input table.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read '{path}': {message}")]
    Io { path: String, message: String },

    #[error("date column '{0}' not found in header")]
    MissingDateColumn(String),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("parquet I/O error: {0}")]
    Parquet(String),

    #[error("invalid table: {0}")]
    Table(#[from] TableError),
}

/// Errors raised while persisting an output table.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to write '{path}': {message}")]
    Io { path: String, message: String },

    #[error("parquet I/O error: {0}")]
    Parquet(String),
}

/// Supplies one date-indexed numeric table.
pub trait TableSource: Send + Sync {
    /// Human-readable description (usually a path).
    fn describe(&self) -> String;

    fn load(&self) -> Result<DatedTable, SourceError>;
}

/// Accepts one date-indexed numeric table.
pub trait TableSink: Send + Sync {
    fn describe(&self) -> String;

    fn write(&self, table: &DatedTable) -> Result<(), SinkError>;
}

/// A source that hands out clones of a table held in memory.
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    table: DatedTable,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, table: DatedTable) -> Self {
        Self {
            name: name.into(),
            table,
        }
    }
}

impl TableSource for MemorySource {
    fn describe(&self) -> String {
        format!("memory:{}", self.name)
    }

    fn load(&self) -> Result<DatedTable, SourceError> {
        Ok(self.table.clone())
    }
}

/// A sink that keeps the last table written to it.
#[derive(Debug, Default)]
pub struct MemorySink {
    last: Mutex<Option<DatedTable>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently written table, if any.
    pub fn take(&self) -> Option<DatedTable> {
        self.last.lock().ok().and_then(|mut guard| guard.take())
    }
}

impl TableSink for MemorySink {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    fn write(&self, table: &DatedTable) -> Result<(), SinkError> {
        let mut guard = self.last.lock().map_err(|e| SinkError::Io {
            path: self.describe(),
            message: format!("poisoned lock: {e}"),
        })?;
        *guard = Some(table.clone());
        Ok(())
    }
}
