//! Per-frequency feature pipeline.
//!
//! | frequency | calendar | pct change | lags | round | resample | reorder |
//! |-----------|----------|------------|------|-------|----------|---------|
//! | daily     | yes      | yes        | 89   | 2dp   | yes      | numeric |
//! | monthly   | no       | yes        | 2    | 2dp   | yes      | lexical |
//! | quarterly | no       | yes        | -    | -     | no       | -       |
//!
//! Every branch ends by truncating to the requested [`DateRange`].

use thiserror::Error;
use tracing::debug;

use crate::domain::{DateRange, DatedTable, Frequency, TableError, DAILY_LAGS, MONTHLY_LAGS};
use crate::transform::{
    build_lags, complete, numeric_lag_order, pct_change, round_half_even, to_quarter_start,
};

/// Decimal places kept in lagged feature tables.
pub const ROUND_DECIMALS: u32 = 2;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("unsupported frequency '{frequency}' (expected daily, monthly or quarterly)")]
    InvalidArgument { frequency: String },

    #[error(transparent)]
    Table(#[from] TableError),
}

/// Run the pipeline for a frequency given by name.
///
/// The name is validated before any work is done.
pub fn process(
    table: &DatedTable,
    frequency: &str,
    range: DateRange,
) -> Result<DatedTable, PipelineError> {
    let frequency: Frequency = frequency.parse()?;
    process_frequency(table, frequency, range)
}

/// Run the pipeline for a known frequency.
pub fn process_frequency(
    table: &DatedTable,
    frequency: Frequency,
    range: DateRange,
) -> Result<DatedTable, PipelineError> {
    debug!(
        %frequency,
        rows = table.height(),
        columns = table.width(),
        start = %range.start,
        end = %range.end,
        "processing table"
    );

    let out = match frequency {
        Frequency::Quarterly => pct_change(table),
        Frequency::Monthly => {
            let returns = pct_change(table);
            lagged_quarterly(&returns, MONTHLY_LAGS)?
        }
        Frequency::Daily => {
            let bases: Vec<String> = table
                .column_names()
                .into_iter()
                .map(String::from)
                .collect();
            let completed = complete(table, range);
            debug!(rows = completed.height(), "calendar completed");
            let returns = pct_change(&completed);
            let resampled = lagged_quarterly(&returns, DAILY_LAGS)?;
            resampled.select(&numeric_lag_order(&bases, DAILY_LAGS))?
        }
    };

    let out = out.slice_dates(range.start, range.end);
    debug!(%frequency, rows = out.height(), columns = out.width(), "table processed");
    Ok(out)
}

/// Lag every column, round, then resample onto quarter starts.
fn lagged_quarterly(returns: &DatedTable, n_lags: usize) -> Result<DatedTable, TableError> {
    let columns = returns.column_names();
    let lagged = build_lags(returns, n_lags, &columns)?;
    let rounded = lagged.map_values(|v| round_half_even(v, ROUND_DECIMALS));
    let resampled = to_quarter_start(&rounded)?;
    debug!(
        n_lags,
        columns = resampled.width(),
        quarters = resampled.height(),
        "lag matrix resampled"
    );
    Ok(resampled)
}
