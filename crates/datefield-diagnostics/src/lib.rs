//! Date field diagnostics and error handling
//!
//! This crate provides the error handling infrastructure for the date field
//! engine, including error codes, source locations, and diagnostic reporting.

mod error;
mod error_code;
mod span;

pub use error::*;
pub use error_code::*;
pub use span::*;

/// Result type for date field operations
pub type Result<T> = std::result::Result<T, DateFieldError>;
