//! Date field value types
//!
//! This crate defines the values every other date field component converges on:
//! - [`Instant`]: the canonical signed millisecond count since the UTC epoch
//! - [`TimeUnit`] and [`CalendarUnit`]: numeric resolution and calendar units
//! - [`MathOp`] and [`DateExpression`]: parsed date math
//! - [`RangeBound`], [`ResolvedRange`] and [`RangeIndexQuery`]: range query bounds

pub mod instant;
pub mod math;
pub mod range;
pub mod unit;

pub use instant::*;
pub use math::*;
pub use range::*;
pub use unit::*;
