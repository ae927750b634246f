//! Property tests for transform invariants.
//!
//! Uses proptest to verify:
//! 1. Percent change: first row is zero, zero denominators give zero
//! 2. Lag correctness: `x_k[i] == x[i-k]` for `i >= k`, else zero
//! 3. Calendar completeness: every day of the range, once
//! 4. Interpolation boundedness: filled values stay between their brackets
//! 5. Shift round-trip: back one day then forward one day is the identity

use chrono::{Duration, NaiveDate};
use mixfreq_core::domain::{Column, DateRange, DatedTable};
use mixfreq_core::transform::{build_lags, complete, lag_column_name, pct_change};
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()
}

fn arb_level() -> impl Strategy<Value = f64> {
    prop_oneof![
        8 => (-500.0..500.0_f64).prop_map(|v| (v * 100.0).round() / 100.0),
        1 => Just(0.0),
    ]
}

fn arb_levels(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(arb_level(), 1..max_len)
}

fn consecutive_table(values: Vec<f64>) -> DatedTable {
    let dates = (0..values.len())
        .map(|i| base_date() + Duration::days(i as i64))
        .collect();
    DatedTable::new(dates, vec![Column::new("x", values)]).unwrap()
}

/// Sparse observations: (day offset, value) with unique offsets.
fn arb_sparse_points() -> impl Strategy<Value = Vec<(i64, f64)>> {
    prop::collection::btree_map(0..120_i64, 1.0..200.0_f64, 0..20)
        .prop_map(|m| m.into_iter().collect())
}

// ── 1. Percent change ────────────────────────────────────────────────

proptest! {
    #[test]
    fn pct_change_first_row_is_zero(values in arb_levels(60)) {
        let out = pct_change(&consecutive_table(values));
        let x = out.column("x").unwrap();
        prop_assert_eq!(x[0], 0.0);
        prop_assert!(x.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn pct_change_zero_denominator_is_zero(
        mut values in arb_levels(60),
        pos in 0usize..59,
    ) {
        prop_assume!(values.len() >= 2);
        let pos = pos % (values.len() - 1);
        values[pos] = 0.0;
        let out = pct_change(&consecutive_table(values));
        prop_assert_eq!(out.column("x").unwrap()[pos + 1], 0.0);
    }
}

// ── 2. Lag correctness ───────────────────────────────────────────────

proptest! {
    #[test]
    fn lag_k_is_positional_shift(values in arb_levels(40), n_lags in 1usize..6) {
        let table = consecutive_table(values.clone());
        let out = build_lags(&table, n_lags, &["x"]).unwrap();

        for k in 1..=n_lags {
            let lagged = out.column(&lag_column_name("x", k)).unwrap();
            for i in 0..values.len() {
                let expected = if i >= k { values[i - k] } else { 0.0 };
                prop_assert_eq!(lagged[i], expected);
            }
        }
        prop_assert_eq!(out.width(), n_lags + 1);
    }
}

// ── 3 & 4. Calendar completion ───────────────────────────────────────

proptest! {
    #[test]
    fn calendar_has_every_day_once(
        points in arb_sparse_points(),
        start_offset in 0i64..30,
        len in 0i64..150,
    ) {
        let start = base_date() + Duration::days(start_offset);
        let range = DateRange::new(start, start + Duration::days(len));
        let series = DatedTable::from_series(
            "x",
            points.iter().map(|(o, v)| (base_date() + Duration::days(*o), *v)).collect(),
        ).unwrap();

        let out = complete(&series, range);
        prop_assert_eq!(out.height() as i64, len + 1);
        for (i, day) in out.dates().iter().enumerate() {
            prop_assert_eq!(*day, start + Duration::days(i as i64));
        }
    }

    #[test]
    fn interpolation_is_bounded_and_edges_are_zero(points in arb_sparse_points()) {
        let range = DateRange::new(base_date(), base_date() + Duration::days(119));
        let series = DatedTable::from_series(
            "x",
            points.iter().map(|(o, v)| (base_date() + Duration::days(*o), *v)).collect(),
        ).unwrap();
        let out = complete(&series, range);
        let x = out.column("x").unwrap();

        let known: Vec<(usize, f64)> = points.iter().map(|(o, v)| (*o as usize, *v)).collect();
        for (i, value) in x.iter().enumerate() {
            let before = known.iter().rev().find(|(o, _)| *o <= i);
            let after = known.iter().find(|(o, _)| *o >= i);
            match (before, after) {
                (Some((_, lo)), Some((_, hi))) => {
                    let (min, max) = if lo <= hi { (*lo, *hi) } else { (*hi, *lo) };
                    prop_assert!(*value >= min - 1e-9 && *value <= max + 1e-9);
                }
                _ => prop_assert_eq!(*value, 0.0),
            }
        }
    }
}

// ── 5. Shift round-trip ──────────────────────────────────────────────

proptest! {
    #[test]
    fn shift_back_then_forward_restores_dates(values in arb_levels(40), step in 1i64..40) {
        let dates: Vec<NaiveDate> = (0..values.len())
            .map(|i| base_date() + Duration::days(i as i64 * step))
            .collect();
        let table = DatedTable::new(dates, vec![Column::new("x", values)]).unwrap();
        let restored = table.shift_days(-1).unwrap().shift_days(1).unwrap();
        prop_assert_eq!(restored, table);
    }
}
