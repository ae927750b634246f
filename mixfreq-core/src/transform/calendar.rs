//! Daily calendar completion.
//!
//! Reindexes a sparse daily series onto every calendar day of a range,
//! interpolates interior gaps linearly and zero-fills the edges.

use super::fill::zero_if_missing;
use crate::domain::{Column, DateRange, DatedTable};

/// Densify `series` onto every day of `range`.
///
/// Interpolation is by position on the dense calendar: a gap of `n` missing
/// days between two known points is filled with `n` evenly spaced values.
/// Days before the first known point or after the last one are `0`, as is
/// the whole calendar when the input has no known values. Input dates
/// outside `range` are dropped.
pub fn complete(series: &DatedTable, range: DateRange) -> DatedTable {
    let calendar = range.days();

    let columns = series
        .columns()
        .iter()
        .map(|column| {
            let mut values = vec![f64::NAN; calendar.len()];
            for (date, &value) in series.dates().iter().zip(&column.values) {
                if range.contains(*date) {
                    let offset = (*date - range.start).num_days() as usize;
                    values[offset] = value;
                }
            }
            interpolate_linear(&mut values);
            Column::new(
                column.name.clone(),
                values.into_iter().map(zero_if_missing).collect(),
            )
        })
        .collect();

    DatedTable::from_parts(calendar, columns)
}

/// Fill `NaN` runs that sit between two known values. Edge runs are left as `NaN`.
fn interpolate_linear(values: &mut [f64]) {
    let known: Vec<usize> = values
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .map(|(i, _)| i)
        .collect();

    for pair in known.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if hi - lo < 2 {
            continue;
        }
        let (v0, v1) = (values[lo], values[hi]);
        let span = (hi - lo) as f64;
        for j in lo + 1..hi {
            values[j] = v0 + (v1 - v0) * (j - lo) as f64 / span;
        }
    }
}
