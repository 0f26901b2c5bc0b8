//! Time and calendar units

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Unit name that matched no known unit
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown unit '{0}'")]
pub struct UnknownUnit(pub String);

// ============================================================================
// Numeric resolution
// ============================================================================

/// Resolution of bare integer inputs
///
/// Fixed once per field. An unadorned integer such as `1609459200` is scaled
/// by this unit into milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum TimeUnit {
    #[default]
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    /// Milliseconds in one unit
    pub const fn factor(self) -> i64 {
        match self {
            Self::Milliseconds => 1,
            Self::Seconds => 1_000,
            Self::Minutes => 60_000,
            Self::Hours => 3_600_000,
            Self::Days => 86_400_000,
        }
    }

    /// Scale `value` into milliseconds, `None` on overflow
    pub const fn to_millis(self, value: i64) -> Option<i64> {
        value.checked_mul(self.factor())
    }

    /// Lowercase name used in field mappings
    pub const fn name(self) -> &'static str {
        match self {
            Self::Milliseconds => "milliseconds",
            Self::Seconds => "seconds",
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::Days => "days",
        }
    }
}

impl FromStr for TimeUnit {
    type Err = UnknownUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "milliseconds" => Ok(Self::Milliseconds),
            "seconds" => Ok(Self::Seconds),
            "minutes" => Ok(Self::Minutes),
            "hours" => Ok(Self::Hours),
            "days" => Ok(Self::Days),
            _ => Err(UnknownUnit(s.to_string())),
        }
    }
}

impl TryFrom<String> for TimeUnit {
    type Error = UnknownUnit;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Calendar units
// ============================================================================

/// Calendar unit for date math offsets and rounding
///
/// Ordered from coarsest to finest, so `Year < Millisecond`. Also used as the
/// precision of a parsed literal: the finest unit the text specified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarUnit {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
}

impl CalendarUnit {
    /// Parse a date math unit code
    ///
    /// Codes are case-insensitive and a trailing `S` is ignored, so `DAY`,
    /// `days` and `Days` are equivalent. `DATE` is accepted for `DAY` and
    /// both `MILLI` and `MILLISECOND` for `MILLISECOND`.
    pub fn from_code(code: &str) -> Option<Self> {
        let upper = code.to_ascii_uppercase();
        let singular = match upper.strip_suffix('S') {
            Some(stem) if !stem.is_empty() => stem,
            _ => upper.as_str(),
        };
        match singular {
            "YEAR" => Some(Self::Year),
            "MONTH" => Some(Self::Month),
            "DAY" | "DATE" => Some(Self::Day),
            "HOUR" => Some(Self::Hour),
            "MINUTE" => Some(Self::Minute),
            "SECOND" => Some(Self::Second),
            "MILLI" | "MILLISECOND" => Some(Self::Millisecond),
            _ => None,
        }
    }

    /// Canonical date math code
    pub const fn code(self) -> &'static str {
        match self {
            Self::Year => "YEAR",
            Self::Month => "MONTH",
            Self::Day => "DAY",
            Self::Hour => "HOUR",
            Self::Minute => "MINUTE",
            Self::Second => "SECOND",
            Self::Millisecond => "MILLI",
        }
    }

    /// Length in milliseconds for units with a fixed duration
    ///
    /// `None` for `Month` and `Year`, whose length depends on the calendar.
    pub const fn fixed_millis(self) -> Option<i64> {
        match self {
            Self::Year | Self::Month => None,
            Self::Day => Some(86_400_000),
            Self::Hour => Some(3_600_000),
            Self::Minute => Some(60_000),
            Self::Second => Some(1_000),
            Self::Millisecond => Some(1),
        }
    }
}

impl fmt::Display for CalendarUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Year => write!(f, "year"),
            Self::Month => write!(f, "month"),
            Self::Day => write!(f, "day"),
            Self::Hour => write!(f, "hour"),
            Self::Minute => write!(f, "minute"),
            Self::Second => write!(f, "second"),
            Self::Millisecond => write!(f, "millisecond"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("DAY", Some(CalendarUnit::Day))]
    #[case("days", Some(CalendarUnit::Day))]
    #[case("Date", Some(CalendarUnit::Day))]
    #[case("MONTHS", Some(CalendarUnit::Month))]
    #[case("MILLI", Some(CalendarUnit::Millisecond))]
    #[case("MILLIS", Some(CalendarUnit::Millisecond))]
    #[case("milliseconds", Some(CalendarUnit::Millisecond))]
    #[case("YEARS", Some(CalendarUnit::Year))]
    #[case("S", None)]
    #[case("DAX", None)]
    #[case("", None)]
    fn test_calendar_unit_codes(#[case] code: &str, #[case] expected: Option<CalendarUnit>) {
        assert_eq!(CalendarUnit::from_code(code), expected);
    }

    #[test]
    fn test_calendar_unit_order() {
        assert!(CalendarUnit::Year < CalendarUnit::Month);
        assert!(CalendarUnit::Second < CalendarUnit::Millisecond);
    }

    #[test]
    fn test_time_unit_scaling() {
        assert_eq!(TimeUnit::Seconds.to_millis(1_609_459_200), Some(1_609_459_200_000));
        assert_eq!(TimeUnit::Days.to_millis(-1), Some(-86_400_000));
        assert_eq!(TimeUnit::Seconds.to_millis(i64::MAX), None);
    }

    #[test]
    fn test_time_unit_case_insensitive() {
        assert_eq!("SECONDS".parse::<TimeUnit>(), Ok(TimeUnit::Seconds));
        assert!("fortnights".parse::<TimeUnit>().is_err());

        let unit: TimeUnit = serde_json::from_str("\"Hours\"").unwrap();
        assert_eq!(unit, TimeUnit::Hours);
        assert_eq!(serde_json::to_string(&TimeUnit::Hours).unwrap(), "\"hours\"");
    }
}
