//! Lag matrix construction.
//!
//! For every lagged column `c` and lag `k in 1..=n`, the builder adds a
//! column `c_k` holding `c` shifted down `k` rows. Shifting is positional on
//! the existing index, not calendar arithmetic.

use std::collections::BTreeMap;

use super::fill::zero_if_missing;
use crate::domain::{Column, DatedTable, TableError};

/// Name of the `lag`-th lag column of `base`.
pub fn lag_column_name(base: &str, lag: usize) -> String {
    format!("{base}_{lag}")
}

/// Build a lag matrix over `lag_columns`.
///
/// - each lag column is kept under its own name and joined by `n_lags`
///   shifted copies; values with no predecessor (and any `NaN`) are `0`
/// - all other columns pass through unchanged
/// - output columns are sorted lexicographically, so `x_10` precedes `x_2`;
///   see [`numeric_lag_order`] for the numeric order
pub fn build_lags<S: AsRef<str>>(
    table: &DatedTable,
    n_lags: usize,
    lag_columns: &[S],
) -> Result<DatedTable, TableError> {
    let mut out: BTreeMap<String, Vec<f64>> = BTreeMap::new();

    for name in lag_columns {
        let name = name.as_ref();
        let values = table
            .column(name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))?;

        out.insert(
            name.to_string(),
            values.iter().copied().map(zero_if_missing).collect(),
        );
        for lag in 1..=n_lags {
            out.insert(lag_column_name(name, lag), shift_down(values, lag));
        }
    }

    // Passthrough columns are inserted last and win any name collision.
    for column in table.columns() {
        if !lag_columns.iter().any(|c| c.as_ref() == column.name) {
            out.insert(column.name.clone(), column.values.clone());
        }
    }

    let columns = out
        .into_iter()
        .map(|(name, values)| Column::new(name, values))
        .collect();
    Ok(DatedTable::from_parts(table.dates().to_vec(), columns))
}

/// `[base, base_1, ..., base_n]` for each base, in the given base order.
pub fn numeric_lag_order<S: AsRef<str>>(bases: &[S], n_lags: usize) -> Vec<String> {
    bases
        .iter()
        .flat_map(|base| {
            let base = base.as_ref();
            std::iter::once(base.to_string()).chain((1..=n_lags).map(move |k| lag_column_name(base, k)))
        })
        .collect()
}

fn shift_down(values: &[f64], lag: usize) -> Vec<f64> {
    (0..values.len())
        .map(|i| {
            if i >= lag {
                zero_if_missing(values[i - lag])
            } else {
                0.0
            }
        })
        .collect()
}
