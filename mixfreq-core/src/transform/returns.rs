//! Level to percent-change transform.

use super::fill::zero_if_missing;
use crate::domain::DatedTable;

/// Row-over-row percent change of every column.
///
/// `out[i] = (v[i] - v[i-1]) / v[i-1]`. The first row is `0`, and any
/// division by zero or missing operand yields `0`. Missing inputs are
/// carried forward from the last known value before differencing, so a
/// gap produces a single `0` rather than two.
pub fn pct_change(table: &DatedTable) -> DatedTable {
    table.map_columns(pct_change_values)
}

fn pct_change_values(values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;
    let mut last_known = f64::NAN;

    for &raw in values {
        let current = if raw.is_nan() { last_known } else { raw };
        let change = match prev {
            None => 0.0,
            Some(p) => zero_if_missing((current - p) / p),
        };
        out.push(change);
        if !current.is_nan() {
            last_known = current;
        }
        prev = Some(current);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Column, DatedTable};
    use chrono::NaiveDate;

    fn table(values: Vec<f64>) -> DatedTable {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let dates = (0..values.len())
            .map(|i| start + chrono::Duration::days(i as i64))
            .collect();
        DatedTable::new(dates, vec![Column::new("x", values)]).unwrap()
    }

    #[test]
    fn first_row_is_zero() {
        let out = pct_change(&table(vec![50.0, 100.0, 50.0]));
        assert_eq!(out.column("x").unwrap(), &[0.0, 1.0, -0.5]);
    }

    #[test]
    fn zero_denominator_is_zero() {
        let out = pct_change(&table(vec![0.0, 5.0, 0.0, 0.0]));
        assert_eq!(out.column("x").unwrap(), &[0.0, 0.0, -1.0, 0.0]);
    }

    #[test]
    fn gaps_are_carried_forward() {
        let out = pct_change(&table(vec![10.0, f64::NAN, 20.0]));
        assert_eq!(out.column("x").unwrap(), &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn leading_gaps_are_zero() {
        let out = pct_change(&table(vec![f64::NAN, f64::NAN, 4.0, 5.0]));
        assert_eq!(out.column("x").unwrap(), &[0.0, 0.0, 0.0, 0.25]);
    }

    #[test]
    fn empty_table_stays_empty() {
        let out = pct_change(&DatedTable::empty(&["x"]));
        assert!(out.is_empty());
        assert_eq!(out.column_names(), vec!["x"]);
    }
}
