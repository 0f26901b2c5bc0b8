//! Range command implementation

use super::field::FieldOptions;
use super::output::{self, OutputFormat};
use anyhow::{Context, Result};
use datefield_eval::{DateFieldType, FieldInput, RequestContext};
use datefield_types::{RangeIndexQuery, ResolvedRange};
use serde::Serialize;
use std::fmt;

/// One side of a range as given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundArg {
    pub value: String,
    pub inclusive: bool,
}

impl BoundArg {
    /// Pick the side from a strict and an inclusive flag; clap keeps them exclusive
    pub fn from_flags(strict: Option<String>, inclusive: Option<String>) -> Option<Self> {
        match (strict, inclusive) {
            (_, Some(value)) => Some(Self { value, inclusive: true }),
            (Some(value), None) => Some(Self { value, inclusive: false }),
            (None, None) => None,
        }
    }
}

/// Configuration for range command
pub struct RangeConfig {
    pub field: FieldOptions,
    pub lower: Option<BoundArg>,
    pub upper: Option<BoundArg>,
    pub output_format: OutputFormat,
}

/// A resolved range and the query the index receives
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeReport {
    pub range: ResolvedRange,
    pub query: RangeIndexQuery,
    pub lower: Option<String>,
    pub upper: Option<String>,
}

impl fmt::Display for RangeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", output::label("range"), self.range)?;
        writeln!(f, "{} {}", output::label("lower"), self.lower.as_deref().unwrap_or("*"))?;
        writeln!(f, "{} {}", output::label("upper"), self.upper.as_deref().unwrap_or("*"))?;
        writeln!(
            f,
            "{} {}",
            output::label("cache"),
            output::verdict(self.range.cacheable, "cacheable", "not cacheable")
        )?;
        write!(
            f,
            "{} min={} max={} include_min={} include_max={} precision_step={}",
            output::label("query"),
            self.query.min.map_or_else(|| "*".to_string(), |v| v.to_string()),
            self.query.max.map_or_else(|| "*".to_string(), |v| v.to_string()),
            self.query.include_min,
            self.query.include_max,
            self.query.precision_step
        )
    }
}

/// Resolve both sides and build the index query
pub fn build_range(
    field: &DateFieldType,
    ctx: &RequestContext,
    lower: Option<&BoundArg>,
    upper: Option<&BoundArg>,
) -> Result<RangeReport> {
    let lower_input = lower.map(|b| FieldInput::from(b.value.as_str()));
    let upper_input = upper.map(|b| FieldInput::from(b.value.as_str()));
    let range = field
        .range(
            lower_input.as_ref(),
            upper_input.as_ref(),
            lower.is_none_or(|b| b.inclusive),
            upper.is_none_or(|b| b.inclusive),
            ctx,
        )
        .context("Failed to build range")?;
    Ok(RangeReport {
        query: field.index_query(&range),
        lower: range.lower.value.map(|v| field.canonical(v)).transpose()?,
        upper: range.upper.value.map(|v| field.canonical(v)).transpose()?,
        range,
    })
}

pub fn run(config: RangeConfig) -> Result<()> {
    let (field, ctx) = config.field.load()?;
    let report = build_range(&field, &ctx, config.lower.as_ref(), config.upper.as_ref())?;
    output::print_reports(&[report], config.output_format)
}
