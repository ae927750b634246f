//! Parquet persistence for dated tables.
//!
//! Layout: a `date` column of Polars `Date` type followed by one `f64`
//! column per feature, in table order. `NaN` values are stored as nulls.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use polars::prelude::*;

use super::provider::{SinkError, SourceError, TableSink, TableSource};
use crate::domain::{self, DatedTable};

/// Name of the index column in Parquet files.
pub const DATE_COLUMN: &str = "date";

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).expect("valid epoch")
}

/// Convert a dated table to a Polars DataFrame.
pub fn table_to_dataframe(table: &DatedTable) -> Result<DataFrame, PolarsError> {
    let days: Vec<i32> = table
        .dates()
        .iter()
        .map(|d| (*d - epoch()).num_days() as i32)
        .collect();

    let mut columns = Vec::with_capacity(table.width() + 1);
    columns.push(Column::new(DATE_COLUMN.into(), days).cast(&DataType::Date)?);
    for c in table.columns() {
        let values: Vec<Option<f64>> = c
            .values
            .iter()
            .map(|v| if v.is_nan() { None } else { Some(*v) })
            .collect();
        columns.push(Column::new(c.name.as_str().into(), values));
    }

    DataFrame::new(columns)
}

/// Convert a DataFrame with a `date` column back to a dated table.
///
/// Every other column is cast to `f64`; nulls become `NaN`.
pub fn dataframe_to_table(df: &DataFrame) -> Result<DatedTable, SourceError> {
    let map_err = |e: PolarsError| SourceError::Parquet(format!("column read: {e}"));

    let date_ca = df
        .column(DATE_COLUMN)
        .map_err(map_err)?
        .date()
        .map_err(|e| SourceError::Parquet(format!("date column type: {e}")))?;

    let mut dates = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let days = date_ca
            .get(i)
            .ok_or_else(|| SourceError::Parquet(format!("null date at row {i}")))?;
        dates.push(epoch() + chrono::Duration::days(days as i64));
    }

    let mut columns = Vec::new();
    for column in df.get_columns() {
        let name = column.name().as_str();
        if name == DATE_COLUMN {
            continue;
        }
        let casted = column.cast(&DataType::Float64).map_err(map_err)?;
        let values = casted
            .f64()
            .map_err(|e| SourceError::Parquet(format!("{name} column type: {e}")))?
            .iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect();
        columns.push(domain::Column::new(name, values));
    }

    Ok(DatedTable::new(dates, columns)?)
}

/// Write a table to a Parquet file (atomic: write to `.tmp`, then rename).
pub fn write_parquet(table: &DatedTable, path: &Path) -> Result<(), SinkError> {
    let mut df = table_to_dataframe(table)
        .map_err(|e| SinkError::Parquet(format!("dataframe creation: {e}")))?;

    let tmp_path = path.with_extension("parquet.tmp");
    let file = fs::File::create(&tmp_path).map_err(|e| SinkError::Io {
        path: tmp_path.display().to_string(),
        message: e.to_string(),
    })?;
    ParquetWriter::new(file)
        .finish(&mut df)
        .map_err(|e| SinkError::Parquet(format!("write parquet: {e}")))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        SinkError::Io {
            path: path.display().to_string(),
            message: format!("atomic rename failed: {e}"),
        }
    })
}

/// Read a table written by [`write_parquet`].
pub fn read_parquet(path: &Path) -> Result<DatedTable, SourceError> {
    let file = fs::File::open(path).map_err(|e| SourceError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let df = ParquetReader::new(file)
        .finish()
        .map_err(|e| SourceError::Parquet(format!("read: {e}")))?;
    dataframe_to_table(&df)
}

/// Parquet file as an output collaborator.
#[derive(Debug, Clone)]
pub struct ParquetSink {
    path: PathBuf,
}

impl ParquetSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TableSink for ParquetSink {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn write(&self, table: &DatedTable) -> Result<(), SinkError> {
        write_parquet(table, &self.path)
    }
}

/// Parquet file as an input collaborator.
#[derive(Debug, Clone)]
pub struct ParquetSource {
    path: PathBuf,
}

impl ParquetSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TableSource for ParquetSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<DatedTable, SourceError> {
        read_parquet(&self.path)
    }
}
