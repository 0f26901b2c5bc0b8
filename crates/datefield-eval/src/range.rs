//! Range query construction

use crate::cache::is_cache_unsafe;
use crate::resolver::{FieldInput, ValueResolver};
use datefield_diagnostics::Result;
use datefield_types::{Instant, RangeBound, ResolvedRange, Rounding};
use log::debug;

/// Builds resolved ranges from optional lower and upper inputs
#[derive(Debug, Clone, Copy)]
pub struct RangeQueryBuilder<'a> {
    resolver: &'a ValueResolver,
    round_upper_on_inclusive: bool,
}

impl<'a> RangeQueryBuilder<'a> {
    /// Create a builder that widens inclusive upper bounds
    pub const fn new(resolver: &'a ValueResolver) -> Self {
        Self {
            resolver,
            round_upper_on_inclusive: true,
        }
    }

    /// Set whether an inclusive text upper bound is widened to the end of
    /// the unit it names
    pub const fn round_upper_on_inclusive(mut self, enabled: bool) -> Self {
        self.round_upper_on_inclusive = enabled;
        self
    }

    /// Resolve both sides of a range against one "now"
    ///
    /// The range is cacheable only if neither text side depends on an
    /// unrounded "now".
    pub fn build(
        &self,
        lower: Option<&FieldInput>,
        upper: Option<&FieldInput>,
        include_lower: bool,
        include_upper: bool,
        now: Instant,
    ) -> Result<ResolvedRange> {
        let upper_rounding = if include_upper && self.round_upper_on_inclusive {
            Rounding::Up
        } else {
            Rounding::Down
        };
        let (lower, lower_cacheable) = self.side("lower", lower, include_lower, now, Rounding::Down)?;
        let (upper, upper_cacheable) = self.side("upper", upper, include_upper, now, upper_rounding)?;
        Ok(ResolvedRange {
            lower,
            upper,
            cacheable: lower_cacheable && upper_cacheable,
        })
    }

    fn side(
        &self,
        name: &str,
        input: Option<&FieldInput>,
        inclusive: bool,
        now: Instant,
        rounding: Rounding,
    ) -> Result<(RangeBound, bool)> {
        let Some(input) = input else {
            return Ok((RangeBound::open(inclusive), true));
        };
        let resolution = self.resolver.resolve_with(input, now, rounding)?;
        let cacheable = match input.as_text() {
            Some(text) if is_cache_unsafe(&text) => {
                debug!("{name} bound [{text}] depends on an unrounded now; range is not cacheable");
                false
            }
            _ => true,
        };
        Ok((RangeBound::at(resolution.instant, inclusive), cacheable))
    }
}
