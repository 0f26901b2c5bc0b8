//! Output formatting utilities

use anyhow::{Context, Result};
use colored::Colorize;
use datefield_diagnostics::DateFieldError;
use serde::Serialize;
use std::fmt::Display;
use std::io::IsTerminal;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub const fn from_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }
}

/// Set up color output based on user preference
pub fn setup_colors(mode: &str) {
    match mode.to_lowercase().as_str() {
        "always" => colored::control::set_override(true),
        "never" => colored::control::set_override(false),
        _ => colored::control::set_override(std::io::stdout().is_terminal()),
    }
}

/// Format an error for display
///
/// Date field errors that point into a piece of text are followed by the
/// rendered diagnostic with a caret under the offending span.
pub fn format_error(error: &anyhow::Error) -> String {
    let mut out = format!("{} {:#}", "Error:".red().bold(), error);
    let located = error
        .chain()
        .filter_map(|e| e.downcast_ref::<DateFieldError>())
        .find(|e| e.location().is_some());
    if let Some(err) = located {
        if let Some(text) = err.text() {
            out.push('\n');
            out.push_str(&err.to_diagnostic().render(text));
        }
    }
    out
}

/// Format a label column for text output
pub fn label(name: &str) -> String {
    format!("{:<10}", name).cyan().to_string()
}

/// Format a yes/no answer for text output
pub fn verdict(ok: bool, yes: &str, no: &str) -> String {
    if ok { yes.green().to_string() } else { no.yellow().to_string() }
}

/// Serialize a report as pretty JSON
pub fn format_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize JSON")
}

/// Print reports in the specified format
///
/// JSON output is a single array so it can be piped into other tools.
pub fn print_reports<T: Serialize + Display>(reports: &[T], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", format_json(reports)?),
        OutputFormat::Text => {
            for (i, report) in reports.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                println!("{report}");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use datefield_diagnostics::Span;

    #[test]
    fn test_format_error_renders_caret() {
        colored::control::set_override(false);
        let err = anyhow::Error::new(DateFieldError::malformed_math(
            "NOW+1DAX",
            Span::new(5, 8),
            "unknown unit 'DAX'",
        ))
        .context("Failed to resolve 'NOW+1DAX'");
        let text = format_error(&err);
        assert!(text.starts_with("Error: Failed to resolve 'NOW+1DAX'"));
        assert!(text.contains("   | NOW+1DAX\n   |      ^^^"), "{text}");
    }

    #[test]
    fn test_format_error_without_location() {
        colored::control::set_override(false);
        let err = anyhow::Error::new(DateFieldError::invalid_config("bad"));
        assert_eq!(format_error(&err), "Error: invalid date field configuration: bad");
    }

    #[test]
    fn test_output_format_from_flag() {
        assert_eq!(OutputFormat::from_flag(true), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flag(false), OutputFormat::Text);
    }
}
