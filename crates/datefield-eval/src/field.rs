//! The date field type
//!
//! [`DateFieldType`] is the compiled, immutable form of a field mapping and
//! the entry point the mapping layer calls for indexing and querying. Every
//! query method takes a [`RequestContext`] so one request sees one "now".

use crate::config::{DateFieldConfig, FIELD_TYPE};
use crate::context::RequestContext;
use crate::fuzzy::FuzzyWindow;
use crate::range::RangeQueryBuilder;
use crate::resolver::{FieldInput, ValueResolver};
use datefield_diagnostics::Result;
use datefield_parser::{DisplayFormat, canonical};
use datefield_types::{DEFAULT_PRECISION_STEP, Instant, RangeIndexQuery, ResolvedRange, TimeUnit};
use serde_json::{Map, Value};

/// A configured date field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFieldType {
    resolver: ValueResolver,
    null_value: Option<String>,
    precision_step: u32,
    round_upper_inclusive: bool,
}

impl Default for DateFieldType {
    fn default() -> Self {
        Self::from_parts(ValueResolver::default(), None, DEFAULT_PRECISION_STEP, true)
    }
}

impl DateFieldType {
    pub(crate) fn from_parts(
        resolver: ValueResolver,
        null_value: Option<String>,
        precision_step: u32,
        round_upper_inclusive: bool,
    ) -> Self {
        Self {
            resolver,
            null_value,
            precision_step,
            round_upper_inclusive,
        }
    }

    /// Build a field from a JSON mapping
    pub fn from_json(json: &str) -> Result<Self> {
        DateFieldConfig::from_json(json)?.build()
    }

    pub fn resolver(&self) -> &ValueResolver {
        &self.resolver
    }

    pub fn format(&self) -> &DisplayFormat {
        self.resolver.format()
    }

    pub const fn time_unit(&self) -> TimeUnit {
        self.resolver.time_unit()
    }

    pub fn null_value(&self) -> Option<&str> {
        self.null_value.as_deref()
    }

    pub const fn precision_step(&self) -> u32 {
        self.precision_step
    }

    pub const fn round_upper_inclusive(&self) -> bool {
        self.round_upper_inclusive
    }

    /// Resolve a value for indexing
    pub fn resolve(&self, input: &FieldInput, ctx: &RequestContext) -> Result<Instant> {
        self.resolver.resolve(input, ctx.now())
    }

    /// Resolve a possibly missing value
    ///
    /// A missing value resolves the configured null value, or stays missing
    /// when there is none.
    pub fn resolve_optional(&self, input: Option<&FieldInput>, ctx: &RequestContext) -> Result<Option<Instant>> {
        match (input, &self.null_value) {
            (Some(input), _) => self.resolve(input, ctx).map(Some),
            (None, Some(null_value)) => self.resolve(&FieldInput::from(null_value.as_str()), ctx).map(Some),
            (None, None) => Ok(None),
        }
    }

    /// Print a stored instant with the field's display format
    pub fn display(&self, instant: Instant) -> Result<String> {
        self.format().print(instant)
    }

    /// Print a stored instant in canonical form
    pub fn canonical(&self, instant: Instant) -> Result<String> {
        canonical::format(instant)
    }

    /// Query matching exactly the resolved value
    pub fn term(&self, input: &FieldInput, ctx: &RequestContext) -> Result<RangeIndexQuery> {
        let value = self.resolve(input, ctx)?;
        Ok(RangeIndexQuery::exact(value.millis(), self.precision_step))
    }

    /// Resolve a range using the field's upper-bound rounding policy
    pub fn range(
        &self,
        lower: Option<&FieldInput>,
        upper: Option<&FieldInput>,
        include_lower: bool,
        include_upper: bool,
        ctx: &RequestContext,
    ) -> Result<ResolvedRange> {
        RangeQueryBuilder::new(&self.resolver)
            .round_upper_on_inclusive(self.round_upper_inclusive)
            .build(lower, upper, include_lower, include_upper, ctx.now())
    }

    /// Index query for a resolved range
    pub fn index_query(&self, range: &ResolvedRange) -> RangeIndexQuery {
        range.to_index_query(self.precision_step)
    }

    /// Similarity window around a value
    ///
    /// `tolerance` is a duration such as `1d` or a number of milliseconds.
    pub fn fuzzy(&self, input: &FieldInput, tolerance: &str, ctx: &RequestContext) -> Result<FuzzyWindow> {
        let center = self.resolve(input, ctx)?;
        FuzzyWindow::parse(center, tolerance)
    }

    /// Query for documents holding the null value, if one is configured
    pub fn null_value_query(&self, ctx: &RequestContext) -> Result<Option<RangeIndexQuery>> {
        self.null_value
            .as_deref()
            .map(|null_value| self.term(&FieldInput::from(null_value), ctx))
            .transpose()
    }

    /// The effective mapping as JSON
    ///
    /// Options left at their defaults are written only with `include_defaults`.
    pub fn to_mapping(&self, include_defaults: bool) -> Value {
        let mut mapping = Map::new();
        mapping.insert("type".into(), FIELD_TYPE.into());
        if include_defaults || !self.format().is_default() {
            mapping.insert("format".into(), self.format().spec().into());
        }
        if include_defaults || self.time_unit() != TimeUnit::default() {
            mapping.insert("numeric_resolution".into(), self.time_unit().name().into());
        }
        if let Some(null_value) = &self.null_value {
            mapping.insert("null_value".into(), null_value.as_str().into());
        } else if include_defaults {
            mapping.insert("null_value".into(), Value::Null);
        }
        if include_defaults || self.precision_step != DEFAULT_PRECISION_STEP {
            mapping.insert("precision_step".into(), self.precision_step.into());
        }
        if include_defaults || !self.round_upper_inclusive {
            mapping.insert("round_upper_inclusive".into(), self.round_upper_inclusive.into());
        }
        Value::Object(mapping)
    }
}
