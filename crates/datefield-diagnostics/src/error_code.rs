//! Date field error codes following a structured numbering system
//!
//! Error code ranges:
//! - DF0001-DF0099: Parse errors (timestamps, math expressions, tolerances)
//! - DF0100-DF0199: Resolution errors (value pipeline)
//! - DF0300-DF0399: Configuration errors (field mapping, display patterns)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    /// Create a new error code
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the numeric code
    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Get error information for this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    /// Check if this is a parse error (0001-0099)
    pub const fn is_parse_error(&self) -> bool {
        self.0 >= 1 && self.0 < 100
    }

    /// Check if this is a resolution error (0100-0199)
    pub const fn is_resolution_error(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    /// Check if this is a configuration error (0300-0399)
    pub const fn is_config_error(&self) -> bool {
        self.0 >= 300 && self.0 < 400
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DF{:04}", self.0)
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Short description of the error
    pub description: &'static str,
    /// Detailed help text
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Parse errors (0001-0099)
    map.insert(
        1,
        ErrorInfo::new("Malformed timestamp")
            .with_help("Canonical timestamps look like 2000-01-01T00:00:00.123Z"),
    );
    map.insert(
        2,
        ErrorInfo::new("Malformed date math token")
            .with_help("Math tokens are +<n><UNIT>, -<n><UNIT> or /<UNIT>, e.g. NOW-1DAY/DAY"),
    );
    map.insert(
        3,
        ErrorInfo::new("Invalid tolerance value")
            .with_help("Use a duration such as 30s, 1.5h, 2d or a number of milliseconds"),
    );

    // Resolution errors (0100-0199)
    map.insert(
        100,
        ErrorInfo::new("Unresolved date value")
            .with_help("The value is neither in the field format, a date math expression nor a number"),
    );
    map.insert(101, ErrorInfo::new("Instant out of calendar range"));

    // Configuration errors (0300-0399)
    map.insert(300, ErrorInfo::new("Invalid field configuration"));
    map.insert(
        301,
        ErrorInfo::new("Invalid display pattern")
            .with_help("Supported pattern letters: y u M d H h a m s S Z and quoted literals"),
    );

    map
});

// Convenient error code constants

// Parse errors
pub const DF0001: ErrorCode = ErrorCode::new(1);
pub const DF0002: ErrorCode = ErrorCode::new(2);
pub const DF0003: ErrorCode = ErrorCode::new(3);

// Resolution errors
pub const DF0100: ErrorCode = ErrorCode::new(100);
pub const DF0101: ErrorCode = ErrorCode::new(101);

// Configuration errors
pub const DF0300: ErrorCode = ErrorCode::new(300);
pub const DF0301: ErrorCode = ErrorCode::new(301);
