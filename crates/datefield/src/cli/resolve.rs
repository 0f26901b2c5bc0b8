//! Resolve command implementation

use super::field::FieldOptions;
use super::output::{self, OutputFormat};
use anyhow::{Context, Result};
use datefield_eval::{DateFieldType, FieldInput, RequestContext};
use datefield_types::Rounding;
use serde::Serialize;
use std::fmt;

/// Configuration for resolve command
pub struct ResolveConfig {
    pub field: FieldOptions,
    pub values: Vec<String>,
    pub output_format: OutputFormat,
}

/// One resolved value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolveReport {
    pub input: String,
    pub stage: String,
    pub millis: i64,
    pub canonical: String,
    pub display: String,
}

impl fmt::Display for ResolveReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", output::label("input"), self.input)?;
        writeln!(f, "{} {}", output::label("stage"), self.stage)?;
        writeln!(f, "{} {}", output::label("millis"), self.millis)?;
        writeln!(f, "{} {}", output::label("canonical"), self.canonical)?;
        write!(f, "{} {}", output::label("display"), self.display)
    }
}

/// Resolve one value the way it would be indexed
pub fn resolve_value(field: &DateFieldType, ctx: &RequestContext, value: &str) -> Result<ResolveReport> {
    let resolution = field
        .resolver()
        .resolve_with(&FieldInput::from(value), ctx.now(), Rounding::Down)
        .with_context(|| format!("Failed to resolve '{value}'"))?;
    Ok(ResolveReport {
        input: value.to_string(),
        stage: resolution.stage.to_string(),
        millis: resolution.instant.millis(),
        canonical: field.canonical(resolution.instant)?,
        display: field.display(resolution.instant)?,
    })
}

/// Resolve every value against one request context
pub fn run(config: ResolveConfig) -> Result<()> {
    if config.values.is_empty() {
        anyhow::bail!("No values specified to resolve");
    }
    let (field, ctx) = config.field.load()?;
    let reports = config
        .values
        .iter()
        .map(|value| resolve_value(&field, &ctx, value))
        .collect::<Result<Vec<_>>>()?;
    output::print_reports(&reports, config.output_format)
}
