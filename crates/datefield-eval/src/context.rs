//! Request context for date field evaluation

use chrono::Utc;
use datefield_types::Instant;

/// Source of the current instant
pub trait NowSource {
    /// The current instant
    fn now(&self) -> Instant;
}

/// The system wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl NowSource for SystemClock {
    fn now(&self) -> Instant {
        Instant::from_datetime(&Utc::now())
    }
}

/// A clock pinned to one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub Instant);

impl NowSource for FixedClock {
    fn now(&self) -> Instant {
        self.0
    }
}

/// Per-request evaluation state
///
/// Every bound resolved for one request shares the "now" captured here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    now: Instant,
}

impl RequestContext {
    /// Sample `clock` once for a new request
    pub fn capture(clock: &dyn NowSource) -> Self {
        Self { now: clock.now() }
    }

    /// Create a context with a known "now"
    pub const fn at(now: Instant) -> Self {
        Self { now }
    }

    /// The request's "now"
    pub const fn now(&self) -> Instant {
        self.now
    }
}
