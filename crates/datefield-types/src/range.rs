//! Range bounds and the query handed to the numeric range index

use crate::Instant;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default trie precision step for 64-bit values
pub const DEFAULT_PRECISION_STEP: u32 = 16;

/// One side of a range
///
/// `value: None` is an open (unbounded) side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RangeBound {
    pub value: Option<Instant>,
    pub inclusive: bool,
}

impl RangeBound {
    /// An unbounded side
    pub const fn open(inclusive: bool) -> Self {
        Self { value: None, inclusive }
    }

    /// A bounded side
    pub const fn at(value: Instant, inclusive: bool) -> Self {
        Self {
            value: Some(value),
            inclusive,
        }
    }

    /// Whether the side is unbounded
    pub const fn is_open(&self) -> bool {
        self.value.is_none()
    }
}

/// Resolved range ready for the numeric range index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedRange {
    pub lower: RangeBound,
    pub upper: RangeBound,
    /// False when a bound depends on an unrounded "now"
    pub cacheable: bool,
}

impl ResolvedRange {
    /// Whether `instant` falls inside the range
    pub fn contains(&self, instant: Instant) -> bool {
        let above_lower = match self.lower.value {
            None => true,
            Some(low) if self.lower.inclusive => instant >= low,
            Some(low) => instant > low,
        };
        let below_upper = match self.upper.value {
            None => true,
            Some(high) if self.upper.inclusive => instant <= high,
            Some(high) => instant < high,
        };
        above_lower && below_upper
    }

    /// Build the index query for this range
    pub fn to_index_query(&self, precision_step: u32) -> RangeIndexQuery {
        RangeIndexQuery {
            min: self.lower.value.map(Instant::millis),
            max: self.upper.value.map(Instant::millis),
            include_min: self.lower.inclusive,
            include_max: self.upper.inclusive,
            precision_step,
        }
    }
}

impl fmt::Display for ResolvedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = if self.lower.inclusive { '[' } else { '(' };
        let close = if self.upper.inclusive { ']' } else { ')' };
        let low = self.lower.value.map_or_else(|| "*".to_string(), |v| v.to_string());
        let high = self.upper.value.map_or_else(|| "*".to_string(), |v| v.to_string());
        write!(f, "{open}{low}, {high}{close}")?;
        if !self.cacheable {
            write!(f, " (no cache)")?;
        }
        Ok(())
    }
}

/// The tuple accepted by the external numeric range index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RangeIndexQuery {
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub include_min: bool,
    pub include_max: bool,
    pub precision_step: u32,
}

impl RangeIndexQuery {
    /// Query matching exactly one value
    pub const fn exact(value: i64, precision_step: u32) -> Self {
        Self {
            min: Some(value),
            max: Some(value),
            include_min: true,
            include_max: true,
            precision_step,
        }
    }

    /// Whether `value` satisfies the query
    pub fn matches(&self, value: i64) -> bool {
        let above = match self.min {
            None => true,
            Some(min) if self.include_min => value >= min,
            Some(min) => value > min,
        };
        let below = match self.max {
            None => true,
            Some(max) if self.include_max => value <= max,
            Some(max) => value < max,
        };
        above && below
    }
}

/// Seam to the numeric range index that stores encoded instants
///
/// The trie encoding and document lookup live outside this workspace; the
/// date field only produces the query.
pub trait NumericRangeIndex {
    /// Document ids whose value matches `query`
    fn search(&self, query: &RangeIndexQuery) -> Vec<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(low: Option<i64>, li: bool, high: Option<i64>, hi: bool) -> ResolvedRange {
        ResolvedRange {
            lower: RangeBound {
                value: low.map(Instant::from_millis),
                inclusive: li,
            },
            upper: RangeBound {
                value: high.map(Instant::from_millis),
                inclusive: hi,
            },
            cacheable: true,
        }
    }

    #[test]
    fn test_contains_respects_inclusivity() {
        let r = range(Some(10), true, Some(20), false);
        assert!(r.contains(Instant::from_millis(10)));
        assert!(!r.contains(Instant::from_millis(20)));
        assert!(range(None, false, None, false).contains(Instant::from_millis(i64::MIN)));
    }

    #[test]
    fn test_index_query_matches_range() {
        let r = range(Some(-5), false, Some(5), true);
        let q = r.to_index_query(DEFAULT_PRECISION_STEP);
        for v in -7..=7 {
            assert_eq!(q.matches(v), r.contains(Instant::from_millis(v)), "value {v}");
        }
        assert_eq!(q.precision_step, 16);
    }

    #[test]
    fn test_display() {
        let mut r = range(None, false, Some(7), true);
        r.cacheable = false;
        assert_eq!(r.to_string(), "(*, 7] (no cache)");
    }
}
