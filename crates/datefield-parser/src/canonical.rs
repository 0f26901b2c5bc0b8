//! The fixed canonical timestamp format
//!
//! Canonical timestamps look like `yyyy-MM-ddTHH:mm:ss[.fraction][Z]` and are
//! always UTC. This is the only layout accepted as a date math anchor and the
//! layout used when a value is shown back in canonical form.

use crate::combinators::{Input, PResult, Scanner, digits, fixed_digits, fraction_millis, year};
use crate::ParsedInstant;
use chrono::{NaiveDate, NaiveTime};
use datefield_diagnostics::{DateFieldError, Result};
use datefield_types::{CalendarUnit, Instant};
use std::fmt::Write;

/// Parse a canonical timestamp
pub fn parse(text: &str) -> Result<Instant> {
    parse_with_precision(text).map(|parsed| parsed.instant)
}

/// Parse a canonical timestamp, reporting the finest unit it spelled out
///
/// The precision is [`CalendarUnit::Second`], or
/// [`CalendarUnit::Millisecond`] when a fraction is present.
pub fn parse_with_precision(text: &str) -> Result<ParsedInstant> {
    let mut scanner = Scanner::new(text);

    let date_start = scanner.pos();
    let y = scanner.run(4, "a 4-digit year", year)?;
    scanner.expect('-', "after year")?;
    let mo = scanner.run(2, "a 2-digit month", two_digits)?;
    scanner.expect('-', "after month")?;
    let d = scanner.run(2, "a 2-digit day", two_digits)?;
    let date = NaiveDate::from_ymd_opt(y, mo, d)
        .ok_or_else(|| scanner.error_at(date_start, scanner.pos() - date_start, "no such calendar date"))?;

    scanner.expect('T', "between date and time")?;
    let time_start = scanner.pos();
    let h = scanner.run(2, "a 2-digit hour", two_digits)?;
    scanner.expect(':', "after hour")?;
    let mi = scanner.run(2, "a 2-digit minute", two_digits)?;
    scanner.expect(':', "after minute")?;
    let s = scanner.run(2, "a 2-digit second", two_digits)?;
    let time = NaiveTime::from_hms_opt(h, mi, s)
        .ok_or_else(|| scanner.error_at(time_start, scanner.pos() - time_start, "no such time of day"))?;

    let mut millis = 0;
    let mut precision = CalendarUnit::Second;
    if scanner.eat('.') {
        let fraction = scanner.run(1, "fraction digits after '.'", digits)?;
        millis = fraction_millis(fraction);
        precision = CalendarUnit::Millisecond;
    }
    scanner.eat('Z');
    scanner.finish()?;

    let whole_seconds = Instant::from_naive_utc(date.and_time(time));
    let instant = whole_seconds
        .checked_add_millis(i64::from(millis))
        .ok_or(DateFieldError::InstantOutOfRange {
            instant: whole_seconds.millis(),
        })?;
    Ok(ParsedInstant::utc(instant, precision))
}

/// Format an instant in canonical form
///
/// Milliseconds are printed with trailing zeros removed and omitted when zero.
/// No zone suffix is written.
pub fn format(instant: Instant) -> Result<String> {
    let dt = instant.to_datetime().ok_or(DateFieldError::InstantOutOfRange {
        instant: instant.millis(),
    })?;
    let mut out = String::with_capacity(24);
    write!(out, "{}", dt.format("%Y-%m-%dT%H:%M:%S")).map_err(|_| DateFieldError::InstantOutOfRange {
        instant: instant.millis(),
    })?;
    let ms = instant.millis_of_second();
    if ms != 0 {
        let fraction = format!("{ms:03}");
        out.push('.');
        out.push_str(fraction.trim_end_matches('0'));
    }
    Ok(out)
}

fn two_digits(input: &mut Input<'_>) -> PResult<u32> {
    fixed_digits(input, 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use datefield_diagnostics::Span;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    // ============================================================================
    // Parsing
    // ============================================================================

    #[rstest]
    #[case("1970-01-01T00:00:00Z", 0)]
    #[case("1970-01-01T00:00:00", 0)]
    #[case("2021-01-01T00:00:00Z", 1_609_459_200_000)]
    #[case("2021-01-01T00:00:00.5Z", 1_609_459_200_500)]
    #[case("2021-01-01T00:00:00.123456Z", 1_609_459_200_123)]
    #[case("1969-12-31T23:59:59.999Z", -1)]
    #[case("2000-02-29T12:30:45.010", 951_827_445_010)]
    fn test_parse(#[case] text: &str, #[case] expected: i64) {
        assert_eq!(parse(text).unwrap(), Instant::from_millis(expected));
    }

    #[test]
    fn test_precision_tracks_fraction() {
        assert_eq!(
            parse_with_precision("2021-01-01T00:00:00Z").unwrap().precision,
            CalendarUnit::Second
        );
        assert_eq!(
            parse_with_precision("2021-01-01T00:00:00.1Z").unwrap().precision,
            CalendarUnit::Millisecond
        );
    }

    #[rstest]
    #[case("2021-01-01", 10, "expected 'T' between date and time")]
    #[case("2021-13-01T00:00:00Z", 0, "no such calendar date")]
    #[case("2021-02-30T00:00:00Z", 0, "no such calendar date")]
    #[case("2021-01-01T24:00:00Z", 11, "no such time of day")]
    #[case("2021-01-01T00:00:00.Z", 20, "expected fraction digits after '.'")]
    #[case("2021-01-01T00:00:00Zjunk", 20, "unexpected trailing text 'junk'")]
    #[case("21-01-01T00:00:00Z", 0, "expected a 4-digit year")]
    #[case("2021-1-01T00:00:00Z", 5, "expected a 2-digit month")]
    fn test_parse_errors(#[case] text: &str, #[case] start: usize, #[case] expected: &str) {
        match parse(text).unwrap_err() {
            DateFieldError::MalformedTimestamp { span, message, .. } => {
                assert_eq!(message, expected);
                assert_eq!(span.start, start);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_trailing_text_span_covers_rest() {
        let err = parse("2021-01-01T00:00:00Zab").unwrap_err();
        assert_eq!(err.location().unwrap().span(), Span::new(20, 22));
    }

    // ============================================================================
    // Formatting
    // ============================================================================

    #[rstest]
    #[case(0, "1970-01-01T00:00:00")]
    #[case(1_609_459_200_000, "2021-01-01T00:00:00")]
    #[case(1_609_459_200_500, "2021-01-01T00:00:00.5")]
    #[case(1_609_459_200_120, "2021-01-01T00:00:00.12")]
    #[case(1_609_459_200_007, "2021-01-01T00:00:00.007")]
    #[case(-500, "1969-12-31T23:59:59.5")]
    #[case(-1, "1969-12-31T23:59:59.999")]
    fn test_format(#[case] millis: i64, #[case] expected: &str) {
        assert_eq!(format(Instant::from_millis(millis)).unwrap(), expected);
    }

    #[test]
    fn test_format_out_of_range() {
        assert_eq!(
            format(Instant::from_millis(i64::MAX)).unwrap_err(),
            DateFieldError::InstantOutOfRange { instant: i64::MAX }
        );
    }

    #[test]
    fn test_format_then_parse_far_years() {
        for millis in [-62_135_596_800_000_i64, 253_402_300_800_000] {
            let text = format(Instant::from_millis(millis)).unwrap();
            assert_eq!(parse(&text).unwrap().millis(), millis, "{text}");
        }
    }
}
