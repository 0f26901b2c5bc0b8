//! Date math expressions
//!
//! An expression is an anchor followed by a run of operations:
//!
//! ```text
//! NOW-1DAY/DAY
//! 2021-01-01T00:00:00Z+1MONTH/DAY
//! ```
//!
//! Operations are `+N<unit>`, `-N<unit>` and `/<unit>` with no separators.
//! Units are case-insensitive and may be plural.

use crate::canonical;
use crate::combinators::{Input, digits, letters};
use datefield_diagnostics::{DateFieldError, Result, Span};
use datefield_types::{AnchorSpec, CalendarUnit, DateExpression, MathOp, MathOps};
use winnow::Parser;
use winnow::error::{ContextError, ErrMode};
use winnow::token::one_of;

const NOW: &str = "NOW";

/// A recognized date math expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateMath {
    pub expression: DateExpression,
    /// Finest unit spelled out by a literal anchor; `Millisecond` for `NOW`
    pub anchor_precision: CalendarUnit,
}

/// Recognize and parse a date math expression
///
/// Returns `Ok(None)` when the text has neither a `NOW` prefix nor a `Z`
/// after its first character, meaning it is not date math at all. Matching
/// ignores ASCII case. Errors point into `text`.
pub fn parse_date_math(text: &str) -> Result<Option<DateMath>> {
    let upper = text.to_ascii_uppercase();

    let (anchor, anchor_precision, suffix_start) = if upper.starts_with(NOW) {
        (AnchorSpec::Now, CalendarUnit::Millisecond, NOW.len())
    } else {
        match upper.find('Z') {
            Some(z) if z > 0 => {
                let parsed = canonical::parse_with_precision(&upper[..=z]).map_err(|e| e.within(text, 0))?;
                (AnchorSpec::Literal(parsed.instant), parsed.precision, z + 1)
            }
            _ => return Ok(None),
        }
    };

    let ops = parse_math(&upper[suffix_start..]).map_err(|e| e.within(text, suffix_start))?;
    Ok(Some(DateMath {
        expression: DateExpression { anchor, ops },
        anchor_precision,
    }))
}

/// Tokenize a math suffix such as `-1DAY/DAY`
///
/// The whole suffix is tokenized before anything is evaluated, so a bad
/// token never leaves a partially applied expression behind.
pub fn parse_math(suffix: &str) -> Result<MathOps> {
    let mut input: Input<'_> = suffix;
    let mut ops = MathOps::new();
    while !input.is_empty() {
        ops.push(math_op(suffix, &mut input)?);
    }
    Ok(ops)
}

fn math_op(suffix: &str, input: &mut Input<'_>) -> Result<MathOp> {
    let at = |input: &Input<'_>| suffix.len() - input.len();
    let error = |start: usize, width: usize, message: String| {
        let end = (start + width).min(suffix.len());
        DateFieldError::malformed_math(suffix, Span::new(start, end), message)
    };

    let start = at(input);
    let operator = one_of(['+', '-', '/'])
        .parse_next(input)
        .map_err(|_: ErrMode<ContextError>| error(start, 1, "expected '+', '-' or '/'".to_string()))?;

    let amount = if operator == '/' {
        None
    } else {
        let digits_start = at(input);
        let amount = digits(input)
            .map_err(|_| error(digits_start, 1, format!("expected a number after '{operator}'")))?;
        let value = amount
            .parse::<i64>()
            .map_err(|_| error(digits_start, amount.len(), format!("amount '{amount}' is too large")))?;
        Some(if operator == '-' { -value } else { value })
    };

    let unit_start = at(input);
    let code = letters(input).map_err(|_| error(unit_start, 1, "expected a unit such as DAY or HOUR".to_string()))?;
    let unit = CalendarUnit::from_code(code)
        .ok_or_else(|| error(unit_start, code.len(), format!("unknown unit '{code}'")))?;

    Ok(match amount {
        Some(amount) => MathOp::offset(unit, amount),
        None => MathOp::round(unit),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use datefield_types::Instant;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn message(err: DateFieldError) -> (Span, String) {
        match err {
            DateFieldError::MalformedMathToken { span, message, .. } => (span, message),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    // ============================================================================
    // Tokenizer
    // ============================================================================

    #[test]
    fn test_parse_math_sequence() {
        let ops = parse_math("-1DAY/DAY+2HOURS/MINUTE").unwrap();
        assert_eq!(
            ops.as_slice(),
            &[
                MathOp::offset(CalendarUnit::Day, -1),
                MathOp::round(CalendarUnit::Day),
                MathOp::offset(CalendarUnit::Hour, 2),
                MathOp::round(CalendarUnit::Minute),
            ]
        );
    }

    #[test]
    fn test_parse_math_empty() {
        assert!(parse_math("").unwrap().is_empty());
    }

    #[rstest]
    #[case("+1DAY", CalendarUnit::Day)]
    #[case("+1days", CalendarUnit::Day)]
    #[case("+1DATE", CalendarUnit::Day)]
    #[case("+1MILLI", CalendarUnit::Millisecond)]
    #[case("+1MILLISECONDS", CalendarUnit::Millisecond)]
    #[case("+1Year", CalendarUnit::Year)]
    fn test_unit_spellings(#[case] suffix: &str, #[case] unit: CalendarUnit) {
        assert_eq!(parse_math(suffix).unwrap()[0], MathOp::offset(unit, 1));
    }

    #[rstest]
    #[case("+1FORTNIGHT", Span::new(2, 11), "unknown unit 'FORTNIGHT'")]
    #[case("/", Span::new(1, 1), "expected a unit such as DAY or HOUR")]
    #[case("+DAY", Span::new(1, 2), "expected a number after '+'")]
    #[case("+1DAY*2", Span::new(5, 6), "expected '+', '-' or '/'")]
    #[case("+1 DAY", Span::new(2, 3), "expected a unit such as DAY or HOUR")]
    #[case("+99999999999999999999DAY", Span::new(1, 21), "amount '99999999999999999999' is too large")]
    fn test_parse_math_errors(#[case] suffix: &str, #[case] span: Span, #[case] expected: &str) {
        let (got_span, got) = message(parse_math(suffix).unwrap_err());
        assert_eq!(got, expected);
        assert_eq!(got_span, span);
    }

    // ============================================================================
    // Expressions
    // ============================================================================

    #[test]
    fn test_now_with_short_unit_is_rejected() {
        let (span, message) = message(parse_date_math("now-1d/d").unwrap_err());
        assert_eq!(span, Span::new(5, 6));
        assert_eq!(message, "unknown unit 'D'");
    }

    #[test]
    fn test_now_expression_lowercase() {
        let math = parse_date_math("now-1day/day").unwrap().unwrap();
        assert_eq!(math.expression.anchor, AnchorSpec::Now);
        assert_eq!(math.expression.ops.len(), 2);
        assert_eq!(math.anchor_precision, CalendarUnit::Millisecond);
    }

    #[test]
    fn test_literal_anchor() {
        let math = parse_date_math("2021-01-01T00:00:00Z+1MONTH").unwrap().unwrap();
        assert_eq!(
            math.expression.anchor,
            AnchorSpec::Literal(Instant::from_millis(1_609_459_200_000))
        );
        assert_eq!(math.expression.ops.as_slice(), &[MathOp::offset(CalendarUnit::Month, 1)]);
        assert_eq!(math.anchor_precision, CalendarUnit::Second);
    }

    #[test]
    fn test_not_date_math() {
        assert_eq!(parse_date_math("1609459200000").unwrap(), None);
        assert_eq!(parse_date_math("2021-01-01").unwrap(), None);
        assert_eq!(parse_date_math("Zulu").unwrap(), None);
    }

    #[test]
    fn test_error_offsets_point_into_whole_text() {
        let (span, _) = message(parse_date_math("NOW+1FORTNIGHT").unwrap_err());
        assert_eq!(span, Span::new(5, 14));

        let err = parse_date_math("2021-13-01T00:00:00Z").unwrap_err();
        assert!(matches!(err, DateFieldError::MalformedTimestamp { .. }));
        assert_eq!(err.text(), Some("2021-13-01T00:00:00Z"));
    }
}
