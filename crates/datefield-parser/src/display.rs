//! Configured display formats
//!
//! A display format is the layout a field uses for stage-two parsing and for
//! printing stored values. It is either the named `dateOptionalTime` format or
//! a Joda-style pattern, and several alternatives can be joined with `||`.
//! Parsing tries each alternative in order; printing uses the first.

use crate::combinators::{Input, PResult, Scanner, digits, fixed_digits, fraction_millis, year};
use crate::pattern::JodaPattern;
use crate::ParsedInstant;
use chrono::{NaiveDate, NaiveTime};
use datefield_diagnostics::{DateFieldError, Result, Span};
use datefield_types::{CalendarUnit, Instant};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};
use std::str::FromStr;

/// Name of the default display format
pub const DATE_OPTIONAL_TIME: &str = "dateOptionalTime";

const ALTERNATIVE_SEPARATOR: &str = "||";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Alternative {
    DateOptionalTime,
    Pattern(JodaPattern),
}

impl Alternative {
    fn parse(&self, text: &str) -> Result<ParsedInstant> {
        match self {
            Self::DateOptionalTime => parse_date_optional_time(text),
            Self::Pattern(pattern) => pattern.parse(text),
        }
    }

    fn print(&self, instant: Instant) -> Result<String> {
        match self {
            Self::DateOptionalTime => print_date_optional_time(instant),
            Self::Pattern(pattern) => pattern.print(instant),
        }
    }
}

/// A field's display format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayFormat {
    spec: String,
    alternatives: Vec<Alternative>,
}

impl DisplayFormat {
    /// Compile a format spec such as `yyyy/MM/dd||dateOptionalTime`
    pub fn new(spec: &str) -> Result<Self> {
        let mut alternatives = Vec::new();
        let mut offset = 0;
        for piece in spec.split(ALTERNATIVE_SEPARATOR) {
            let leading = piece.len() - piece.trim_start().len();
            let name = piece.trim();
            let start = offset + leading;
            offset += piece.len() + ALTERNATIVE_SEPARATOR.len();

            if name.is_empty() {
                return Err(DateFieldError::invalid_pattern(
                    spec,
                    Span::point(start),
                    "empty format alternative",
                ));
            }
            let alternative = match name {
                DATE_OPTIONAL_TIME | "date_optional_time" => Alternative::DateOptionalTime,
                _ => Alternative::Pattern(JodaPattern::compile(name).map_err(|e| match e {
                    DateFieldError::InvalidPattern { span, message, .. } => {
                        DateFieldError::invalid_pattern(spec, span.shifted(start), message)
                    }
                    other => other,
                })?),
            };
            alternatives.push(alternative);
        }
        Ok(Self {
            spec: spec.to_string(),
            alternatives,
        })
    }

    /// The spec this format was compiled from
    pub fn spec(&self) -> &str {
        &self.spec
    }

    /// Whether this is the default `dateOptionalTime` format
    pub fn is_default(&self) -> bool {
        self.alternatives == [Alternative::DateOptionalTime]
    }

    /// Parse text with the first alternative that accepts it
    ///
    /// When every alternative rejects the text, the first alternative's error
    /// is returned.
    pub fn parse(&self, text: &str) -> Result<ParsedInstant> {
        let mut first_error = None;
        for alternative in &self.alternatives {
            match alternative.parse(text) {
                Ok(parsed) => return Ok(parsed),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        Err(first_error.unwrap_or_else(|| {
            DateFieldError::malformed_timestamp(text, Span::new(0, text.len()), "no format to parse with")
        }))
    }

    /// Print an instant with the first alternative
    pub fn print(&self, instant: Instant) -> Result<String> {
        match self.alternatives.first() {
            Some(alternative) => alternative.print(instant),
            None => print_date_optional_time(instant),
        }
    }
}

impl Default for DisplayFormat {
    fn default() -> Self {
        Self {
            spec: DATE_OPTIONAL_TIME.to_string(),
            alternatives: vec![Alternative::DateOptionalTime],
        }
    }
}

impl FromStr for DisplayFormat {
    type Err = DateFieldError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for DisplayFormat {
    type Error = DateFieldError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<DisplayFormat> for String {
    fn from(format: DisplayFormat) -> Self {
        format.spec
    }
}

impl fmt::Display for DisplayFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spec)
    }
}

/// Parse `yyyy-MM-dd[THH[:mm[:ss[.fraction]]]][Z|±HH[:mm]]`
///
/// The date part is required, so a bare run of digits never parses here.
pub fn parse_date_optional_time(text: &str) -> Result<ParsedInstant> {
    let mut scanner = Scanner::new(text);

    let y = scanner.run(4, "a 4-digit year", year)?;
    scanner.expect('-', "after year")?;
    let mo = scanner.run(2, "a 2-digit month", two_digits)?;
    scanner.expect('-', "after month")?;
    let d = scanner.run(2, "a 2-digit day", two_digits)?;
    let date = NaiveDate::from_ymd_opt(y, mo, d)
        .ok_or_else(|| scanner.error_at(0, scanner.pos(), "no such calendar date"))?;

    let mut precision = CalendarUnit::Day;
    let (mut h, mut mi, mut s, mut ms) = (0, 0, 0, 0);
    let time_start = scanner.pos();
    if scanner.eat('T') {
        h = scanner.run(2, "a 2-digit hour", two_digits)?;
        precision = CalendarUnit::Hour;
        if scanner.eat(':') {
            mi = scanner.run(2, "a 2-digit minute", two_digits)?;
            precision = CalendarUnit::Minute;
            if scanner.eat(':') {
                s = scanner.run(2, "a 2-digit second", two_digits)?;
                precision = CalendarUnit::Second;
                if scanner.eat('.') {
                    ms = fraction_millis(scanner.run(1, "fraction digits after '.'", digits)?);
                    precision = CalendarUnit::Millisecond;
                }
            }
        }
    }
    let time = NaiveTime::from_hms_milli_opt(h, mi, s, ms)
        .ok_or_else(|| scanner.error_at(time_start, scanner.pos() - time_start, "no such time of day"))?;

    let offset_minutes = zone_offset(&mut scanner)?;
    scanner.finish()?;

    let local = Instant::from_naive_utc(date.and_time(time));
    let offset_millis = i64::from(offset_minutes) * 60_000;
    let instant = local
        .checked_add_millis(-offset_millis)
        .ok_or(DateFieldError::InstantOutOfRange {
            instant: local.millis(),
        })?;
    Ok(ParsedInstant {
        instant,
        precision,
        offset_millis,
    })
}

/// Print as `yyyy-MM-ddTHH:mm:ss.SSSZ`
pub fn print_date_optional_time(instant: Instant) -> Result<String> {
    let out_of_range = || DateFieldError::InstantOutOfRange {
        instant: instant.millis(),
    };
    let dt = instant.to_datetime().ok_or_else(out_of_range)?;
    let mut out = String::with_capacity(24);
    write!(out, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.3fZ")).map_err(|_| out_of_range())?;
    Ok(out)
}

fn zone_offset(scanner: &mut Scanner<'_>) -> Result<i32> {
    if scanner.eat('Z') {
        return Ok(0);
    }
    let sign = match scanner.peek() {
        Some('+') => 1,
        Some('-') => -1,
        _ => return Ok(0),
    };
    let start = scanner.pos();
    scanner.eat(if sign > 0 { '+' } else { '-' });
    let hours = scanner.run(2, "a 2-digit offset hour", two_digits)?;
    let minutes = if scanner.eat(':') || scanner.peek().is_some_and(|c| c.is_ascii_digit()) {
        scanner.run(2, "a 2-digit offset minute", two_digits)?
    } else {
        0
    };
    if hours > 18 || minutes > 59 {
        return Err(scanner.error_at(start, scanner.pos() - start, "zone offset out of range"));
    }
    Ok(sign * (hours * 60 + minutes) as i32)
}

fn two_digits(input: &mut Input<'_>) -> PResult<u32> {
    fixed_digits(input, 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    // ============================================================================
    // dateOptionalTime
    // ============================================================================

    #[rstest]
    #[case("2021-01-01", 1_609_459_200_000, CalendarUnit::Day)]
    #[case("2021-01-01T05", 1_609_477_200_000, CalendarUnit::Hour)]
    #[case("2021-01-01T05:30", 1_609_479_000_000, CalendarUnit::Minute)]
    #[case("2021-01-01T00:00:01", 1_609_459_201_000, CalendarUnit::Second)]
    #[case("2021-01-01T00:00:00.5Z", 1_609_459_200_500, CalendarUnit::Millisecond)]
    #[case("2021-01-01T01:00:00+01:00", 1_609_459_200_000, CalendarUnit::Second)]
    #[case("2021-01-01T00:00:00-0130", 1_609_464_600_000, CalendarUnit::Second)]
    #[case("2020-12-31Z", 1_609_372_800_000, CalendarUnit::Day)]
    fn test_date_optional_time(#[case] text: &str, #[case] millis: i64, #[case] precision: CalendarUnit) {
        let parsed = parse_date_optional_time(text).unwrap();
        assert_eq!(parsed.instant.millis(), millis);
        assert_eq!(parsed.precision, precision);
    }

    #[rstest]
    #[case("2021-03-01T00:00:00Z", 0)]
    #[case("2021-03-01T00:00:00+05:00", 18_000_000)]
    #[case("2021-03-01-0130", -5_400_000)]
    #[case("2021-03-01", 0)]
    fn test_date_optional_time_keeps_offset(#[case] text: &str, #[case] offset_millis: i64) {
        let parsed = parse_date_optional_time(text).unwrap();
        assert_eq!(parsed.offset_millis, offset_millis);
        assert_eq!(parsed.local().unwrap().millis(), 1_614_556_800_000);
    }

    #[rstest]
    #[case("1609459200000")]
    #[case("2021-01-01T")]
    #[case("2021-01-01 00:00")]
    #[case("2021-02-29")]
    #[case("2021-01-01T00:00:00+19:00")]
    #[case("now")]
    fn test_date_optional_time_rejects(#[case] text: &str) {
        assert!(matches!(
            parse_date_optional_time(text),
            Err(DateFieldError::MalformedTimestamp { .. })
        ));
    }

    #[test]
    fn test_print_date_optional_time() {
        assert_eq!(
            print_date_optional_time(Instant::from_millis(1_609_459_200_500)).unwrap(),
            "2021-01-01T00:00:00.500Z"
        );
        assert_eq!(print_date_optional_time(Instant::EPOCH).unwrap(), "1970-01-01T00:00:00.000Z");
    }

    // ============================================================================
    // Alternatives
    // ============================================================================

    #[test]
    fn test_default_format() {
        let format = DisplayFormat::default();
        assert!(format.is_default());
        assert_eq!(format.spec(), "dateOptionalTime");
        assert_eq!(DisplayFormat::new("dateOptionalTime").unwrap(), format);
    }

    #[test]
    fn test_alternatives_parse_in_order_and_print_first() {
        let format = DisplayFormat::new("yyyy/MM/dd || dateOptionalTime").unwrap();
        assert_eq!(format.parse("2021/01/01").unwrap().instant.millis(), 1_609_459_200_000);
        assert_eq!(format.parse("2021-01-01T00:00:00Z").unwrap().instant.millis(), 1_609_459_200_000);
        assert_eq!(format.print(Instant::from_millis(1_609_459_200_000)).unwrap(), "2021/01/01");
    }

    #[test]
    fn test_all_alternatives_failing_reports_first() {
        let format = DisplayFormat::new("yyyy/MM/dd||dateOptionalTime").unwrap();
        let err = format.parse("yesterday").unwrap_err();
        assert!(err.to_string().contains("yyyy/MM/dd"), "{err}");
    }

    #[test]
    fn test_invalid_alternative_span_points_into_spec() {
        match DisplayFormat::new("dateOptionalTime||yyyy-qq").unwrap_err() {
            DateFieldError::InvalidPattern { pattern, span, .. } => {
                assert_eq!(pattern, "dateOptionalTime||yyyy-qq");
                assert_eq!(span, Span::new(23, 25));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(DisplayFormat::new("yyyy||").is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let format: DisplayFormat = serde_json::from_str("\"yyyy-MM-dd\"").unwrap();
        assert_eq!(format.spec(), "yyyy-MM-dd");
        assert_eq!(serde_json::to_string(&format).unwrap(), "\"yyyy-MM-dd\"");
        assert!(serde_json::from_str::<DisplayFormat>("\"yyyy-ZZZ\"").is_err());
    }
}
