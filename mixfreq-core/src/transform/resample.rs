//! Quarterly resampling with the one-day anchor shift.
//!
//! The index is moved back one day, sampled at quarter-end anchors and moved
//! forward one day again. The result is indexed by quarter-start dates and
//! each row carries the observation stamped exactly on that quarter start,
//! i.e. what was known one day after the previous quarter closed.

use chrono::{Datelike, Months, NaiveDate};

use crate::domain::{Column, DatedTable, TableError};

/// Last day of the quarter containing `date`.
pub fn quarter_end(date: NaiveDate) -> Option<NaiveDate> {
    let first_month = date.month0() / 3 * 3 + 1;
    NaiveDate::from_ymd_opt(date.year(), first_month, 1)?
        .checked_add_months(Months::new(3))?
        .pred_opt()
}

/// First day of the quarter containing `date`.
pub fn quarter_start(date: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month0() / 3 * 3 + 1, 1)
}

/// Resample onto quarter-start dates via the back-one-day / forward-one-day shift.
///
/// Quarters spanned by the data but without an observation on the anchor
/// day produce a row of `NaN`. Missing quarters are never forward-filled.
pub fn to_quarter_start(table: &DatedTable) -> Result<DatedTable, TableError> {
    let shifted = table.shift_days(-1)?;
    let anchored = sample_at_quarter_ends(&shifted)?;
    anchored.shift_days(1)
}

/// Reindex onto every quarter end between the first and last date, exact matches only.
fn sample_at_quarter_ends(table: &DatedTable) -> Result<DatedTable, TableError> {
    let (Some(&first), Some(&last)) = (table.dates().first(), table.dates().last()) else {
        return Ok(DatedTable::empty(&table.column_names()));
    };

    let overflow = |date| TableError::DateOverflow { date, days: 1 };
    let last_anchor = quarter_end(last).ok_or(overflow(last))?;

    let mut anchors = Vec::new();
    let mut anchor = quarter_end(first).ok_or(overflow(first))?;
    loop {
        anchors.push(anchor);
        if anchor >= last_anchor {
            break;
        }
        let next = anchor.succ_opt().ok_or(overflow(anchor))?;
        anchor = quarter_end(next).ok_or(overflow(next))?;
    }

    let rows: Vec<Option<usize>> = anchors.iter().map(|a| table.position(*a)).collect();
    let columns = table
        .columns()
        .iter()
        .map(|c| {
            Column::new(
                c.name.clone(),
                rows.iter()
                    .map(|row| row.map_or(f64::NAN, |i| c.values[i]))
                    .collect(),
            )
        })
        .collect();

    Ok(DatedTable::from_parts(anchors, columns))
}
