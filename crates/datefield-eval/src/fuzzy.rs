//! Fuzzy similarity windows

use datefield_diagnostics::Result;
use datefield_parser::parse_tolerance;
use datefield_types::{Instant, RangeIndexQuery};
use serde::{Deserialize, Serialize};
use std::fmt;

/// `[center - tolerance, center + tolerance]`, both ends inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuzzyWindow {
    pub center: Instant,
    pub tolerance: i64,
    pub lower: Instant,
    pub upper: Instant,
}

impl FuzzyWindow {
    /// Window of `tolerance` milliseconds either side of `center`
    ///
    /// Ends saturate at the limits of the millisecond range.
    pub const fn new(center: Instant, tolerance: i64) -> Self {
        Self {
            center,
            tolerance,
            lower: center.saturating_sub_millis(tolerance),
            upper: center.saturating_add_millis(tolerance),
        }
    }

    /// Window around `center` with a tolerance given as text
    pub fn parse(center: Instant, tolerance: &str) -> Result<Self> {
        parse_tolerance(tolerance).map(|t| Self::new(center, t))
    }

    /// Index query covering the window
    pub const fn to_index_query(&self, precision_step: u32) -> RangeIndexQuery {
        RangeIndexQuery {
            min: Some(self.lower.millis()),
            max: Some(self.upper.millis()),
            include_min: true,
            include_max: true,
            precision_step,
        }
    }
}

impl fmt::Display for FuzzyWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}] ({} ± {}ms)", self.lower, self.upper, self.center, self.tolerance)
    }
}
