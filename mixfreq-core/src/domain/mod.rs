//! Domain types: dated tables, frequencies, date ranges.

pub mod frequency;
pub mod range;
pub mod table;

pub use frequency::{Frequency, DAILY_LAGS, MONTHLY_LAGS};
pub use range::DateRange;
pub use table::{Column, DatedTable, TableError};
