//! Pure table transforms used by the frequency pipeline.
//!
//! Every transform borrows its input and returns a new table.

pub mod calendar;
pub mod fill;
pub mod lag;
pub mod resample;
pub mod returns;

pub use calendar::complete;
pub use fill::{round_half_even, zero_if_missing};
pub use lag::{build_lags, lag_column_name, numeric_lag_order};
pub use resample::{quarter_end, quarter_start, to_quarter_start};
pub use returns::pct_change;
