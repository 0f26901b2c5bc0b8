//! Date field text parsers
//!
//! Everything that turns text into date field values lives here:
//! - [`canonical`]: the fixed `yyyy-MM-ddTHH:mm:ss[.fraction][Z]` layout
//! - [`display`]: configured display formats and their `||` alternatives
//! - [`pattern`]: Joda-style patterns compiled to chrono format strings
//! - [`math`]: date math expressions and their operation tokenizer
//! - [`tolerance`]: fuzzy query tolerances
//!
//! Parsers are built on winnow; calendar validation uses chrono.
//!
//! ```
//! use datefield_parser::{canonical, parse_math};
//!
//! let instant = canonical::parse("2021-01-01T00:00:00Z").unwrap();
//! assert_eq!(instant.millis(), 1_609_459_200_000);
//! assert_eq!(parse_math("-1DAY/DAY").unwrap().len(), 2);
//! ```

pub mod canonical;
mod combinators;
pub mod display;
pub mod math;
pub mod pattern;
pub mod tolerance;

use datefield_types::{CalendarUnit, Instant};

pub use display::{DATE_OPTIONAL_TIME, DisplayFormat};
pub use math::{DateMath, parse_date_math, parse_math};
pub use pattern::JodaPattern;
pub use tolerance::parse_tolerance;

/// An instant parsed from text, with the finest unit the text specified
///
/// `2021-01-01` has day precision; `2021-01-01T10:00:00.5` has millisecond
/// precision. Inclusive upper bounds use the precision to cover the whole
/// unit the text named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParsedInstant {
    pub instant: Instant,
    pub precision: CalendarUnit,
    /// UTC offset the text was written in, east positive; 0 without a zone
    pub offset_millis: i64,
}

impl ParsedInstant {
    /// An instant written in UTC
    pub const fn utc(instant: Instant, precision: CalendarUnit) -> Self {
        Self {
            instant,
            precision,
            offset_millis: 0,
        }
    }

    /// The wall-clock reading of the text, as if it were UTC
    ///
    /// Calendar units start and end on this clock, not on the UTC one.
    pub const fn local(&self) -> Option<Instant> {
        self.instant.checked_add_millis(self.offset_millis)
    }
}
