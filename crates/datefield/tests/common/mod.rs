//! Common test utilities for date field testing
//!
//! This module provides shared testing infrastructure including:
//! - An in-memory numeric range index
//! - Helpers for pinning "now"

pub mod mocks;

pub use mocks::*;

use datefield::parser::canonical;
use datefield::{FixedClock, Instant, RequestContext};

/// Parse a canonical timestamp
pub fn at(text: &str) -> Instant {
    canonical::parse(text).unwrap()
}

/// A request whose "now" is the given canonical timestamp
pub fn request_at(text: &str) -> RequestContext {
    RequestContext::capture(&FixedClock(at(text)))
}
