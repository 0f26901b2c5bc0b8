//! Parsed date math

use crate::{CalendarUnit, Instant};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// A single date math operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum MathOp {
    /// Add a signed number of units
    Offset { unit: CalendarUnit, amount: i64 },
    /// Truncate to the start of the unit in UTC
    Round { unit: CalendarUnit },
}

impl MathOp {
    /// Offset by `amount` units
    pub const fn offset(unit: CalendarUnit, amount: i64) -> Self {
        Self::Offset { unit, amount }
    }

    /// Round to `unit`
    pub const fn round(unit: CalendarUnit) -> Self {
        Self::Round { unit }
    }
}

impl fmt::Display for MathOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offset { unit, amount } if *amount < 0 => write!(f, "-{}{}", amount.unsigned_abs(), unit.code()),
            Self::Offset { unit, amount } => write!(f, "+{}{}", amount, unit.code()),
            Self::Round { unit } => write!(f, "/{}", unit.code()),
        }
    }
}

/// Ordered operation list; nearly every expression has four or fewer
pub type MathOps = SmallVec<[MathOp; 4]>;

/// Direction applied by `Round` operations
///
/// `Down` truncates to the start of the unit. `Up` moves to the last
/// millisecond of the unit and is only used for inclusive upper bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rounding {
    #[default]
    Down,
    Up,
}

/// Base instant of a date math expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnchorSpec {
    /// The request's "now"
    Now,
    /// An absolute canonical timestamp
    Literal(Instant),
}

impl AnchorSpec {
    /// Resolve the anchor against the request's "now"
    pub const fn instant(self, now: Instant) -> Instant {
        match self {
            Self::Now => now,
            Self::Literal(instant) => instant,
        }
    }
}

/// Anchor plus the operations applied to it, in order
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateExpression {
    pub anchor: AnchorSpec,
    pub ops: MathOps,
}

impl DateExpression {
    /// Create an expression with no operations
    pub fn new(anchor: AnchorSpec) -> Self {
        Self {
            anchor,
            ops: MathOps::new(),
        }
    }

    /// Create an expression with the given operations
    pub fn with_ops(anchor: AnchorSpec, ops: impl IntoIterator<Item = MathOp>) -> Self {
        Self {
            anchor,
            ops: ops.into_iter().collect(),
        }
    }

    /// Whether the expression depends on "now"
    pub const fn is_now_relative(&self) -> bool {
        matches!(self.anchor, AnchorSpec::Now)
    }
}
