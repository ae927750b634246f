//! Date-indexed numeric table.
//!
//! `DatedTable` is the only data structure that flows between pipeline
//! stages. It is column-oriented: one `Vec<f64>` per named column, all of
//! the same length as the date index. Missing values are `NaN`.
//!
//! Invariants (checked on construction):
//! - dates are strictly increasing (sorted, no duplicates)
//! - column names are unique
//! - every column has exactly one value per date

use chrono::{Duration, NaiveDate};
use thiserror::Error;

/// Structural errors raised while building or reshaping a table.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("dates must be strictly increasing: {prev} is followed by {next}")]
    UnsortedDates { prev: NaiveDate, next: NaiveDate },

    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),

    #[error("column '{column}' has {found} values but the index has {expected} dates")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("column '{0}' not found")]
    MissingColumn(String),

    #[error("shifting {date} by {days} day(s) leaves the supported date range")]
    DateOverflow { date: NaiveDate, days: i64 },
}

/// A single named column of a [`DatedTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// An ordered mapping from date to one or more named numeric columns.
#[derive(Debug, Clone, PartialEq)]
pub struct DatedTable {
    dates: Vec<NaiveDate>,
    columns: Vec<Column>,
}

impl DatedTable {
    /// Build a table, validating the index and column shapes.
    pub fn new(dates: Vec<NaiveDate>, columns: Vec<Column>) -> Result<Self, TableError> {
        for pair in dates.windows(2) {
            if pair[1] <= pair[0] {
                return Err(TableError::UnsortedDates {
                    prev: pair[0],
                    next: pair[1],
                });
            }
        }

        for (i, column) in columns.iter().enumerate() {
            if column.values.len() != dates.len() {
                return Err(TableError::LengthMismatch {
                    column: column.name.clone(),
                    expected: dates.len(),
                    found: column.values.len(),
                });
            }
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(TableError::DuplicateColumn(column.name.clone()));
            }
        }

        Ok(Self { dates, columns })
    }

    /// Assemble a table whose invariants the caller already guarantees.
    pub(crate) fn from_parts(dates: Vec<NaiveDate>, columns: Vec<Column>) -> Self {
        debug_assert!(dates.windows(2).all(|w| w[0] < w[1]));
        debug_assert!(columns.iter().all(|c| c.values.len() == dates.len()));
        Self { dates, columns }
    }

    /// A table with the given columns and no rows.
    pub fn empty<S: AsRef<str>>(names: &[S]) -> Self {
        Self {
            dates: Vec::new(),
            columns: names
                .iter()
                .map(|n| Column::new(n.as_ref(), Vec::new()))
                .collect(),
        }
    }

    /// Build a single-column table from `(date, value)` pairs.
    ///
    /// Pairs are sorted by date before validation; duplicate dates are still
    /// rejected.
    pub fn from_series(
        name: impl Into<String>,
        mut points: Vec<(NaiveDate, f64)>,
    ) -> Result<Self, TableError> {
        points.sort_by_key(|(d, _)| *d);
        let (dates, values): (Vec<NaiveDate>, Vec<f64>) = points.into_iter().unzip();
        Self::new(dates, vec![Column::new(name, values)])
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Number of rows (dates).
    pub fn height(&self) -> usize {
        self.dates.len()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Value of `column` at row `row`, if both exist.
    pub fn value(&self, column: &str, row: usize) -> Option<f64> {
        self.column(column).and_then(|v| v.get(row).copied())
    }

    /// Row index of an exact date.
    pub fn position(&self, date: NaiveDate) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    /// All values of one row, in column order.
    pub fn row(&self, row: usize) -> Option<Vec<f64>> {
        if row >= self.height() {
            return None;
        }
        Some(self.columns.iter().map(|c| c.values[row]).collect())
    }

    /// Apply `f` to every value, keeping the index and column names.
    pub fn map_values(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            dates: self.dates.clone(),
            columns: self
                .columns
                .iter()
                .map(|c| Column::new(c.name.clone(), c.values.iter().map(|&v| f(v)).collect()))
                .collect(),
        }
    }

    /// Apply `f` to every column as a whole. `f` must preserve length.
    pub(crate) fn map_columns(&self, f: impl Fn(&[f64]) -> Vec<f64>) -> Self {
        Self {
            dates: self.dates.clone(),
            columns: self
                .columns
                .iter()
                .map(|c| Column::new(c.name.clone(), f(&c.values)))
                .collect(),
        }
    }

    /// New table with the named columns, in the given order.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Self, TableError> {
        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let values = self
                .column(name)
                .ok_or_else(|| TableError::MissingColumn(name.to_string()))?;
            columns.push(Column::new(name, values.to_vec()));
        }
        Self::new(self.dates.clone(), columns)
    }

    /// Rows whose date lies in `[start, end]` (inclusive on both ends).
    pub fn slice_dates(&self, start: NaiveDate, end: NaiveDate) -> Self {
        let lo = self.dates.partition_point(|d| *d < start);
        let hi = self.dates.partition_point(|d| *d <= end).max(lo);
        Self {
            dates: self.dates[lo..hi].to_vec(),
            columns: self
                .columns
                .iter()
                .map(|c| Column::new(c.name.clone(), c.values[lo..hi].to_vec()))
                .collect(),
        }
    }

    /// Move every date by `days`. Values are untouched.
    pub fn shift_days(&self, days: i64) -> Result<Self, TableError> {
        let delta = Duration::days(days);
        let dates = self
            .dates
            .iter()
            .map(|d| {
                d.checked_add_signed(delta)
                    .ok_or(TableError::DateOverflow { date: *d, days })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            dates,
            columns: self.columns.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample() -> DatedTable {
        DatedTable::new(
            vec![d("2024-01-01"), d("2024-01-02"), d("2024-01-05")],
            vec![
                Column::new("a", vec![1.0, 2.0, 3.0]),
                Column::new("b", vec![10.0, 20.0, 30.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn rejects_unsorted_dates() {
        let err = DatedTable::new(
            vec![d("2024-01-02"), d("2024-01-01")],
            vec![Column::new("a", vec![1.0, 2.0])],
        )
        .unwrap_err();
        assert!(matches!(err, TableError::UnsortedDates { .. }));
    }

    #[test]
    fn rejects_duplicate_dates() {
        let err = DatedTable::new(
            vec![d("2024-01-01"), d("2024-01-01")],
            vec![Column::new("a", vec![1.0, 2.0])],
        )
        .unwrap_err();
        assert!(matches!(err, TableError::UnsortedDates { .. }));
    }

    #[test]
    fn rejects_duplicate_columns_and_bad_lengths() {
        let dates = vec![d("2024-01-01")];
        assert_eq!(
            DatedTable::new(
                dates.clone(),
                vec![Column::new("a", vec![1.0]), Column::new("a", vec![2.0])]
            )
            .unwrap_err(),
            TableError::DuplicateColumn("a".into())
        );
        assert!(matches!(
            DatedTable::new(dates, vec![Column::new("a", vec![1.0, 2.0])]).unwrap_err(),
            TableError::LengthMismatch { expected: 1, found: 2, .. }
        ));
    }

    #[test]
    fn from_series_sorts_points() {
        let t = DatedTable::from_series(
            "x",
            vec![(d("2024-01-03"), 3.0), (d("2024-01-01"), 1.0)],
        )
        .unwrap();
        assert_eq!(t.dates(), &[d("2024-01-01"), d("2024-01-03")]);
        assert_eq!(t.column("x").unwrap(), &[1.0, 3.0]);
    }

    #[test]
    fn slice_is_inclusive() {
        let t = sample().slice_dates(d("2024-01-02"), d("2024-01-05"));
        assert_eq!(t.height(), 2);
        assert_eq!(t.column("a").unwrap(), &[2.0, 3.0]);

        let none = sample().slice_dates(d("2024-02-01"), d("2024-01-01"));
        assert!(none.is_empty());
        assert_eq!(none.width(), 2);
    }

    #[test]
    fn select_reorders_and_reports_missing() {
        let t = sample().select(&["b", "a"]).unwrap();
        assert_eq!(t.column_names(), vec!["b", "a"]);
        assert_eq!(
            sample().select(&["c"]).unwrap_err(),
            TableError::MissingColumn("c".into())
        );
    }

    #[test]
    fn shift_days_moves_index_only() {
        let t = sample().shift_days(-1).unwrap();
        assert_eq!(t.dates()[0], d("2023-12-31"));
        assert_eq!(t.column("a").unwrap(), sample().column("a").unwrap());
        assert!(DatedTable::from_series("x", vec![(NaiveDate::MAX, 1.0)])
            .unwrap()
            .shift_days(1)
            .is_err());
    }

    #[test]
    fn row_and_value_lookup() {
        let t = sample();
        assert_eq!(t.row(1), Some(vec![2.0, 20.0]));
        assert_eq!(t.row(3), None);
        assert_eq!(t.value("b", 2), Some(30.0));
        assert_eq!(t.position(d("2024-01-05")), Some(2));
        assert_eq!(t.position(d("2024-01-04")), None);
    }
}
