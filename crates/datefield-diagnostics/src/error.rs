//! Date field error types

use crate::{DF0001, DF0002, DF0003, DF0100, DF0101, DF0300, DF0301, ErrorCode, SourceLocation, Span};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// The value or query is rejected
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A diagnostic message with location and context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity level
    pub severity: Severity,
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Location inside the offending text
    pub location: Option<SourceLocation>,
    /// Additional context or help
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            location: None,
            help: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Set help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Render the diagnostic with a caret line pointing into `source`
    pub fn render(&self, source: &str) -> String {
        let mut out = format!("{}[{}]: {}", self.severity_label(), self.code, self.message);
        if let Some(loc) = &self.location {
            let pointer = " ".repeat(loc.column.saturating_sub(1));
            let carets = "^".repeat(loc.length.max(1));
            out.push_str(&format!("\n  --> {}\n   |\n   | {}\n   | {}{}", loc, source, pointer, carets));
        }
        if let Some(help) = &self.help {
            out.push_str(&format!("\n   = help: {}", help));
        }
        out
    }

    #[cfg(feature = "colored")]
    fn severity_label(&self) -> String {
        use colored::Colorize;
        match self.severity {
            Severity::Error => "error".red().bold().to_string(),
        }
    }

    #[cfg(not(feature = "colored"))]
    fn severity_label(&self) -> String {
        self.severity.to_string()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} - {}", self.severity, self.code, self.message)?;
        if let Some(loc) = &self.location {
            write!(f, " at {}", loc)?;
        }
        Ok(())
    }
}

/// Main date field error type
///
/// Every variant owns the text that failed so it can be reported verbatim
/// by the host without access to the original request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateFieldError {
    /// Canonical or display-format timestamp could not be parsed
    #[error("malformed timestamp '{text}' at offset {}: {message}", .span.start)]
    MalformedTimestamp {
        text: String,
        span: Span,
        message: String,
    },

    /// Date math suffix contains an unrecognized token or unit
    #[error("malformed date math token in '{text}' at offset {}: {message}", .span.start)]
    MalformedMathToken {
        text: String,
        span: Span,
        message: String,
    },

    /// Every resolution stage failed
    #[error("failed to parse date field [{text}], tried date format [{format}], date math, and timestamp number in {time_unit}")]
    UnresolvedValue {
        text: String,
        format: String,
        time_unit: String,
        #[source]
        cause: Option<Box<DateFieldError>>,
    },

    /// Fuzzy tolerance is neither a duration nor a number
    #[error("invalid tolerance value [{text}]: {message}")]
    InvalidToleranceValue { text: String, message: String },

    /// Instant lies outside the calendar range supported for formatting
    #[error("instant {instant} is outside the supported calendar range")]
    InstantOutOfRange { instant: i64 },

    /// Display pattern could not be compiled
    #[error("invalid date format pattern '{pattern}' at offset {}: {message}", .span.start)]
    InvalidPattern {
        pattern: String,
        span: Span,
        message: String,
    },

    /// Field mapping failed validation
    #[error("invalid date field configuration: {message}")]
    InvalidConfig { message: String },
}

impl DateFieldError {
    /// Create a malformed timestamp error
    pub fn malformed_timestamp(text: impl Into<String>, span: Span, message: impl Into<String>) -> Self {
        Self::MalformedTimestamp {
            text: text.into(),
            span,
            message: message.into(),
        }
    }

    /// Create a malformed math token error
    pub fn malformed_math(text: impl Into<String>, span: Span, message: impl Into<String>) -> Self {
        Self::MalformedMathToken {
            text: text.into(),
            span,
            message: message.into(),
        }
    }

    /// Create an invalid tolerance error
    pub fn invalid_tolerance(text: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidToleranceValue {
            text: text.into(),
            message: message.into(),
        }
    }

    /// Create an invalid pattern error
    pub fn invalid_pattern(pattern: impl Into<String>, span: Span, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            span,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Re-anchor a parse error produced on a slice of a larger text
    ///
    /// Spans are shifted by `offset` and the reported text becomes `whole`.
    pub fn within(self, whole: &str, offset: usize) -> Self {
        match self {
            Self::MalformedTimestamp { span, message, .. } => Self::MalformedTimestamp {
                text: whole.to_string(),
                span: span.shifted(offset),
                message,
            },
            Self::MalformedMathToken { span, message, .. } => Self::MalformedMathToken {
                text: whole.to_string(),
                span: span.shifted(offset),
                message,
            },
            other => other,
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MalformedTimestamp { .. } => DF0001,
            Self::MalformedMathToken { .. } => DF0002,
            Self::InvalidToleranceValue { .. } => DF0003,
            Self::UnresolvedValue { .. } => DF0100,
            Self::InstantOutOfRange { .. } => DF0101,
            Self::InvalidConfig { .. } => DF0300,
            Self::InvalidPattern { .. } => DF0301,
        }
    }

    /// The text the error refers to, if any
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::MalformedTimestamp { text, .. }
            | Self::MalformedMathToken { text, .. }
            | Self::UnresolvedValue { text, .. }
            | Self::InvalidToleranceValue { text, .. } => Some(text),
            Self::InvalidPattern { pattern, .. } => Some(pattern),
            Self::InstantOutOfRange { .. } | Self::InvalidConfig { .. } => None,
        }
    }

    /// Get the location inside [`Self::text`] if available
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            Self::MalformedTimestamp { text, span, .. }
            | Self::MalformedMathToken { text, span, .. }
            | Self::InvalidPattern { pattern: text, span, .. } => {
                Some(SourceLocation::from_span(*span, text))
            }
            Self::UnresolvedValue { cause, .. } => cause.as_ref().and_then(|c| c.location()),
            _ => None,
        }
    }

    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        let code = self.code();
        let mut diag = Diagnostic::error(code, self.to_string());
        if let Some(loc) = self.location() {
            diag = diag.with_location(loc);
        }
        if let Some(help) = code.info().help {
            diag = diag.with_help(help);
        }
        diag
    }
}
