//! Input/output collaborators.

pub mod parquet;
pub mod provider;

pub use parquet::{read_parquet, write_parquet, ParquetSink, ParquetSource};
pub use provider::{MemorySink, MemorySource, SinkError, SourceError, TableSink, TableSource};
