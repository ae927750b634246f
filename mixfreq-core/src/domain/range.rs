use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inclusive `[start, end]` date bounds.
///
/// Used both as the daily calendar to complete and as the final truncation
/// window of every pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every calendar day from `start` to `end`. Empty when `start > end`.
    pub fn days(&self) -> Vec<NaiveDate> {
        self.start
            .iter_days()
            .take_while(|d| *d <= self.end)
            .collect()
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(1982, 1, 1).expect("valid default start"),
            end: NaiveDate::from_ymd_opt(2020, 7, 1).expect("valid default end"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_range() {
        let r = DateRange::default();
        assert_eq!(r.start.to_string(), "1982-01-01");
        assert_eq!(r.end.to_string(), "2020-07-01");
    }

    #[test]
    fn days_are_inclusive() {
        let r = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 2, 27).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        );
        let days = r.days();
        assert_eq!(days.len(), 4); // leap year
        assert_eq!(days[2], NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert!(r.contains(r.end));
    }

    #[test]
    fn inverted_range_is_empty() {
        let r = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        );
        assert!(r.days().is_empty());
    }
}
