//! Format command implementation

use super::field::FieldOptions;
use super::output::{self, OutputFormat};
use anyhow::Result;
use datefield_eval::DateFieldType;
use datefield_types::Instant;
use serde::Serialize;
use std::fmt;

/// Configuration for format command
pub struct FormatConfig {
    pub field: FieldOptions,
    pub millis: Vec<i64>,
    pub output_format: OutputFormat,
}

/// A stored value printed both ways
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatReport {
    pub millis: i64,
    pub canonical: String,
    pub display: String,
}

impl fmt::Display for FormatReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", output::label("millis"), self.millis)?;
        writeln!(f, "{} {}", output::label("canonical"), self.canonical)?;
        write!(f, "{} {}", output::label("display"), self.display)
    }
}

pub fn format_value(field: &DateFieldType, millis: i64) -> Result<FormatReport> {
    let instant = Instant::from_millis(millis);
    Ok(FormatReport {
        millis,
        canonical: field.canonical(instant)?,
        display: field.display(instant)?,
    })
}

/// Print stored values
pub fn run(config: FormatConfig) -> Result<()> {
    if config.millis.is_empty() {
        anyhow::bail!("No values specified to format");
    }
    let field = config.field.field()?;
    let reports = config
        .millis
        .iter()
        .map(|&millis| format_value(&field, millis))
        .collect::<Result<Vec<_>>>()?;
    output::print_reports(&reports, config.output_format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use datefield_diagnostics::DateFieldError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pre_epoch_value() {
        let report = format_value(&DateFieldType::default(), -500).unwrap();
        assert_eq!(report.canonical, "1969-12-31T23:59:59.5");
        assert_eq!(report.display, "1969-12-31T23:59:59.500Z");
    }

    #[test]
    fn test_out_of_range_value() {
        let err = format_value(&DateFieldType::default(), i64::MAX).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DateFieldError>(),
            Some(DateFieldError::InstantOutOfRange { .. })
        ));
    }
}
