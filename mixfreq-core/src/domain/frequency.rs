//! Native sampling frequency of an input series.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::pipeline::PipelineError;

/// Lags built per column of a daily series (roughly one quarter of days).
pub const DAILY_LAGS: usize = 89;

/// Lags built per column of a monthly series.
pub const MONTHLY_LAGS: usize = 2;

/// The three supported native frequencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Monthly,
    Quarterly,
}

impl Frequency {
    /// All frequencies, in the order the batch runner processes them.
    pub const ALL: [Frequency; 3] = [Frequency::Daily, Frequency::Monthly, Frequency::Quarterly];

    /// Number of lag columns built per input column.
    ///
    /// Quarterly series are not lagged.
    #[must_use]
    pub const fn n_lags(&self) -> Option<usize> {
        match self {
            Self::Daily => Some(DAILY_LAGS),
            Self::Monthly => Some(MONTHLY_LAGS),
            Self::Quarterly => None,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            _ => Err(PipelineError::InvalidArgument {
                frequency: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Daily".parse::<Frequency>().unwrap(), Frequency::Daily);
        assert_eq!(" monthly ".parse::<Frequency>().unwrap(), Frequency::Monthly);
        assert_eq!("QUARTERLY".parse::<Frequency>().unwrap(), Frequency::Quarterly);
    }

    #[test]
    fn rejects_unknown_frequency() {
        let err = "weekly".parse::<Frequency>().unwrap_err();
        assert_eq!(
            err,
            PipelineError::InvalidArgument {
                frequency: "weekly".into()
            }
        );
    }

    #[test]
    fn lag_counts() {
        assert_eq!(Frequency::Daily.n_lags(), Some(89));
        assert_eq!(Frequency::Monthly.n_lags(), Some(2));
        assert_eq!(Frequency::Quarterly.n_lags(), None);
    }
}
