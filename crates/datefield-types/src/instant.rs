//! The canonical instant

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Milliseconds since 1970-01-01T00:00:00Z
///
/// The only value that is stored or compared. Negative values are instants
/// before the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Instant(i64);

impl Instant {
    /// The epoch itself
    pub const EPOCH: Self = Self(0);

    /// Create an instant from epoch milliseconds
    #[inline]
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Epoch milliseconds
    #[inline]
    pub const fn millis(self) -> i64 {
        self.0
    }

    /// Millisecond within the second, normalized into `0..1000` for pre-epoch instants
    #[inline]
    pub const fn millis_of_second(self) -> u32 {
        self.0.rem_euclid(1000) as u32
    }

    /// Convert to a UTC date-time, `None` outside chrono's calendar range
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }

    /// Create from any zoned date-time
    pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        Self(dt.timestamp_millis())
    }

    /// Create from a naive date-time interpreted in UTC
    pub fn from_naive_utc(ndt: NaiveDateTime) -> Self {
        Self(ndt.and_utc().timestamp_millis())
    }

    /// Add milliseconds, `None` on overflow
    #[inline]
    pub const fn checked_add_millis(self, millis: i64) -> Option<Self> {
        match self.0.checked_add(millis) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Add milliseconds, clamping at the numeric bounds
    #[inline]
    pub const fn saturating_add_millis(self, millis: i64) -> Self {
        Self(self.0.saturating_add(millis))
    }

    /// Subtract milliseconds, clamping at the numeric bounds
    #[inline]
    pub const fn saturating_sub_millis(self, millis: i64) -> Self {
        Self(self.0.saturating_sub(millis))
    }
}

impl From<i64> for Instant {
    fn from(millis: i64) -> Self {
        Self(millis)
    }
}

impl From<Instant> for i64 {
    fn from(instant: Instant) -> Self {
        instant.0
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
