//! Fuzzy command implementation

use super::field::FieldOptions;
use super::output::{self, OutputFormat};
use anyhow::{Context, Result};
use datefield_eval::{DateFieldType, FieldInput, FuzzyWindow, RequestContext};
use datefield_types::RangeIndexQuery;
use serde::Serialize;
use std::fmt;

/// Configuration for fuzzy command
pub struct FuzzyConfig {
    pub field: FieldOptions,
    pub value: String,
    pub tolerance: String,
    pub output_format: OutputFormat,
}

/// A similarity window and its index query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FuzzyReport {
    pub window: FuzzyWindow,
    pub query: RangeIndexQuery,
    pub lower: String,
    pub upper: String,
}

impl fmt::Display for FuzzyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", output::label("window"), self.window)?;
        writeln!(f, "{} {}", output::label("lower"), self.lower)?;
        write!(f, "{} {}", output::label("upper"), self.upper)
    }
}

pub fn build_window(
    field: &DateFieldType,
    ctx: &RequestContext,
    value: &str,
    tolerance: &str,
) -> Result<FuzzyReport> {
    let window = field
        .fuzzy(&FieldInput::from(value), tolerance, ctx)
        .with_context(|| format!("Failed to build window around '{value}'"))?;
    Ok(FuzzyReport {
        query: window.to_index_query(field.precision_step()),
        lower: field.canonical(window.lower)?,
        upper: field.canonical(window.upper)?,
        window,
    })
}

pub fn run(config: FuzzyConfig) -> Result<()> {
    let (field, ctx) = config.field.load()?;
    let report = build_window(&field, &ctx, &config.value, &config.tolerance)?;
    output::print_reports(&[report], config.output_format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use datefield_types::Instant;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_window_around_date() {
        let ctx = RequestContext::at(Instant::EPOCH);
        let report = build_window(&DateFieldType::default(), &ctx, "2021-01-02", "1d").unwrap();
        assert_eq!(report.lower, "2021-01-01T00:00:00");
        assert_eq!(report.upper, "2021-01-03T00:00:00");
        assert!(report.query.include_min && report.query.include_max);
    }

    #[test]
    fn test_bad_tolerance() {
        let ctx = RequestContext::at(Instant::EPOCH);
        let err = build_window(&DateFieldType::default(), &ctx, "NOW", "-5s").unwrap_err();
        assert!(err.to_string().contains("Failed to build window around 'NOW'"));
    }
}
