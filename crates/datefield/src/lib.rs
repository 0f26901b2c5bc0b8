//! Date fields for numeric range indexes
//!
//! This crate bundles the date field engine:
//! - Parsing canonical timestamps, display patterns and date math
//! - Resolving field values to millisecond instants
//! - Building range, term and fuzzy queries for a numeric range index
//! - Field mappings with validation and defaults
//!
//! # Example
//!
//! ```
//! use datefield::{DateFieldType, FieldInput, FixedClock, RequestContext};
//! use datefield::types::Instant;
//!
//! let field = DateFieldType::from_json(r#"{ "format": "yyyy/MM/dd" }"#).unwrap();
//! let ctx = RequestContext::capture(&FixedClock(Instant::from_millis(1_622_505_600_000)));
//!
//! let upper = FieldInput::from("2021/06/01");
//! let range = field.range(None, Some(&upper), true, true, &ctx).unwrap();
//! assert_eq!(range.upper.value, Some(Instant::from_millis(1_622_591_999_999)));
//! assert!(range.cacheable);
//! ```

// Re-export all public APIs from internal crates
pub use datefield_diagnostics as diagnostics;
pub use datefield_eval as eval;
pub use datefield_parser as parser;
pub use datefield_types as types;

// Convenience re-exports
pub use datefield_diagnostics::{DateFieldError, Result};
pub use datefield_eval::{
    DateFieldConfig, DateFieldType, FieldInput, FixedClock, FuzzyWindow, NowSource, RequestContext, SystemClock,
    is_cache_unsafe,
};
pub use datefield_types::{Instant, NumericRangeIndex, RangeIndexQuery, ResolvedRange};

// CLI module (only available with cli feature)
#[cfg(feature = "cli")]
pub mod cli;
