//! Date Field Evaluation
//!
//! This crate turns parsed date field text into instants and index queries:
//!
//! - **Date math**: calendar-aware offsets and UTC rounding ([`evaluator`])
//! - **Value resolution**: number, display format, date math, then numeric
//!   fallback ([`ValueResolver`])
//! - **Cache safety**: textual detection of bounds on an unrounded "now"
//!   ([`is_cache_unsafe`])
//! - **Range construction**: lower and upper bounds with upper-bound
//!   widening ([`RangeQueryBuilder`])
//! - **Field types**: validated mappings compiled into [`DateFieldType`]
//!
//! # Example
//!
//! ```
//! use datefield_eval::{DateFieldType, FieldInput, RequestContext};
//! use datefield_types::Instant;
//!
//! let field = DateFieldType::from_json(r#"{ "numeric_resolution": "seconds" }"#).unwrap();
//! let ctx = RequestContext::at(Instant::from_millis(1_622_505_600_000));
//!
//! let instant = field.resolve(&FieldInput::from("NOW-1DAY/DAY"), &ctx).unwrap();
//! assert_eq!(instant.millis(), 1_622_419_200_000);
//!
//! let range = field.range(None, Some(&FieldInput::from("NOW")), false, true, &ctx).unwrap();
//! assert!(!range.cacheable);
//! ```
//!
//! No component reads the wall clock on its own: "now" always comes from a
//! [`RequestContext`], captured once per request.

pub mod cache;
pub mod config;
pub mod context;
pub mod evaluator;
pub mod field;
pub mod fuzzy;
pub mod range;
pub mod resolver;

pub use cache::is_cache_unsafe;
pub use config::{DateFieldConfig, FIELD_TYPE};
pub use context::{FixedClock, NowSource, RequestContext, SystemClock};
pub use evaluator::{evaluate, evaluate_with};
pub use field::DateFieldType;
pub use fuzzy::FuzzyWindow;
pub use range::RangeQueryBuilder;
pub use resolver::{FieldInput, Resolution, Stage, ValueResolver};
