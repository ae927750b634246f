//! CSV collaborators.
//!
//! Input files are row-per-date with a named date column; every other
//! column is numeric. Output files write the date index first, then one
//! column per feature. Missing values are empty cells in both directions.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use mixfreq_core::data::{SinkError, SourceError, TableSink, TableSource};
use mixfreq_core::domain::{Column, DatedTable};

/// A row-per-date CSV file as an input collaborator.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    date_column: String,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>, date_column: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            date_column: date_column.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TableSource for CsvSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<DatedTable, SourceError> {
        let file = std::fs::File::open(&self.path).map_err(|e| SourceError::Io {
            path: self.describe(),
            message: e.to_string(),
        })?;
        read_csv(file, &self.date_column)
    }
}

/// Parse a dated table from any CSV reader.
///
/// Rows may arrive in any order; they are sorted by date. Duplicate dates
/// are rejected.
pub fn read_csv<R: std::io::Read>(reader: R, date_column: &str) -> Result<DatedTable, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| SourceError::Parse {
            line: 1,
            message: format!("failed to read CSV headers: {e}"),
        })?
        .clone();

    let date_idx = headers
        .iter()
        .position(|h| normalize_header_name(h) == date_column)
        .ok_or_else(|| SourceError::MissingDateColumn(date_column.to_string()))?;

    let value_cols: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != date_idx)
        .map(|(i, h)| (i, normalize_header_name(h).to_string()))
        .collect();

    let mut rows: Vec<(NaiveDate, Vec<f64>)> = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: header is line 1, records are 1-based after it
        let line = idx + 2;
        let record = result.map_err(|e| SourceError::Parse {
            line,
            message: format!("CSV parse error: {e}"),
        })?;
        rows.push(parse_row(&record, date_idx, &value_cols, line)?);
    }

    rows.sort_by_key(|(date, _)| *date);

    let dates = rows.iter().map(|(d, _)| *d).collect();
    let columns = value_cols
        .iter()
        .enumerate()
        .map(|(j, (_, name))| Column::new(name.clone(), rows.iter().map(|(_, v)| v[j]).collect()))
        .collect();

    Ok(DatedTable::new(dates, columns)?)
}

fn parse_row(
    record: &StringRecord,
    date_idx: usize,
    value_cols: &[(usize, String)],
    line: usize,
) -> Result<(NaiveDate, Vec<f64>), SourceError> {
    let raw_date = record.get(date_idx).unwrap_or("");
    let date = parse_date(raw_date).ok_or_else(|| SourceError::Parse {
        line,
        message: format!("invalid date '{raw_date}'"),
    })?;

    let values = value_cols
        .iter()
        .map(|(i, name)| {
            parse_value(record.get(*i).unwrap_or("")).ok_or_else(|| SourceError::Parse {
                line,
                message: format!("invalid number in column '{name}'"),
            })
        })
        .collect::<Result<Vec<f64>, _>>()?;

    Ok((date, values))
}

/// `YYYY-MM-DD`, optionally followed by a time of day (which is dropped).
fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Empty cells and the usual NA spellings are `NaN`.
fn parse_value(s: &str) -> Option<f64> {
    match s {
        "" | "." | "NA" | "N/A" | "NaN" | "nan" | "null" => Some(f64::NAN),
        _ => s.parse::<f64>().ok(),
    }
}

fn normalize_header_name(name: &str) -> &str {
    // Excel sometimes emits a BOM before the first header.
    name.trim().trim_start_matches('\u{feff}')
}

/// A CSV file as an output collaborator.
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
    date_column: String,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>, date_column: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            date_column: date_column.into(),
        }
    }
}

impl TableSink for CsvSink {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn write(&self, table: &DatedTable) -> Result<(), SinkError> {
        let text = write_csv(table, &self.date_column).map_err(|e| SinkError::Io {
            path: self.describe(),
            message: e.to_string(),
        })?;
        std::fs::write(&self.path, text).map_err(|e| SinkError::Io {
            path: self.describe(),
            message: e.to_string(),
        })
    }
}

/// Render a table as CSV text, date index first.
pub fn write_csv(table: &DatedTable, date_column: &str) -> Result<String, csv::Error> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = vec![date_column];
    header.extend(table.column_names());
    wtr.write_record(&header)?;

    for (i, date) in table.dates().iter().enumerate() {
        let mut record = Vec::with_capacity(table.width() + 1);
        record.push(date.to_string());
        for column in table.columns() {
            let v = column.values[i];
            record.push(if v.is_nan() { String::new() } else { v.to_string() });
        }
        wtr.write_record(&record)?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn reads_unsorted_rows_with_gaps() {
        let text = "\u{feff}Date,oil,gas\n2020-01-03,3.5,\n2020-01-01,1.5,10\n2020-01-02 00:00:00,NA,11\n";
        let table = read_csv(text.as_bytes(), "Date").unwrap();

        assert_eq!(table.dates(), &[d("2020-01-01"), d("2020-01-02"), d("2020-01-03")]);
        assert_eq!(table.column_names(), vec!["oil", "gas"]);
        assert_eq!(table.value("oil", 0), Some(1.5));
        assert!(table.value("oil", 1).unwrap().is_nan());
        assert!(table.value("gas", 2).unwrap().is_nan());
    }

    #[test]
    fn date_column_can_be_anywhere() {
        let text = "x,Date\n1,2020-02-01\n2,2020-03-01\n";
        let table = read_csv(text.as_bytes(), "Date").unwrap();
        assert_eq!(table.column_names(), vec!["x"]);
        assert_eq!(table.column("x").unwrap(), &[1.0, 2.0]);
    }

    #[test]
    fn missing_date_column_is_reported() {
        let err = read_csv("day,x\n2020-01-01,1\n".as_bytes(), "Date").unwrap_err();
        assert!(matches!(err, SourceError::MissingDateColumn(ref c) if c == "Date"));
    }

    #[test]
    fn bad_number_reports_line() {
        let err = read_csv("Date,x\n2020-01-01,1\n2020-01-02,abc\n".as_bytes(), "Date").unwrap_err();
        assert!(matches!(err, SourceError::Parse { line: 3, .. }));
    }

    #[test]
    fn duplicate_dates_are_rejected() {
        let err = read_csv("Date,x\n2020-01-01,1\n2020-01-01,2\n".as_bytes(), "Date").unwrap_err();
        assert!(matches!(err, SourceError::Table(_)));
    }

    #[test]
    fn writes_date_index_first_and_blank_nan() {
        let table = DatedTable::new(
            vec![d("2020-01-01"), d("2020-04-01")],
            vec![
                Column::new("oil", vec![0.25, f64::NAN]),
                Column::new("oil_1", vec![0.0, -0.5]),
            ],
        )
        .unwrap();
        let text = write_csv(&table, "Date").unwrap();
        assert_eq!(text, "Date,oil,oil_1\n2020-01-01,0.25,0\n2020-04-01,,-0.5\n");
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q.csv");
        let table = DatedTable::from_series("gdp", vec![(d("2020-01-01"), 0.02)]).unwrap();

        CsvSink::new(&path, "Date").write(&table).unwrap();
        let loaded = CsvSource::new(&path, "Date").load().unwrap();
        assert_eq!(loaded, table);
    }
}
