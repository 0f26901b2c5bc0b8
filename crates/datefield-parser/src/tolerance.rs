//! Fuzzy query tolerances

use crate::combinators::Input;
use datefield_diagnostics::{DateFieldError, Result};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::str::FromStr;
use winnow::Parser;
use winnow::error::{ContextError, ErrMode};
use winnow::token::take_while;

/// Parse a fuzzy tolerance into milliseconds
///
/// Accepts a duration such as `90s`, `1.5h` or `500ms`, falling back to a
/// plain integer count of milliseconds. Fractional durations are truncated
/// to whole milliseconds. Negative tolerances are rejected.
pub fn parse_tolerance(text: &str) -> Result<i64> {
    let trimmed = text.trim();
    let millis = match parse_duration(trimmed) {
        Some(millis) => millis,
        None => trimmed.parse::<i64>().map_err(|_| {
            DateFieldError::invalid_tolerance(text, "expected a duration such as 1d or 90s, or a number of milliseconds")
        })?,
    };
    if millis < 0 {
        return Err(DateFieldError::invalid_tolerance(text, "tolerance must not be negative"));
    }
    Ok(millis)
}

fn parse_duration(text: &str) -> Option<i64> {
    let mut input: Input<'_> = text;
    let number: &str = take_while(1.., ('0'..='9', '.'))
        .parse_next(&mut input)
        .map_err(|_: ErrMode<ContextError>| ())
        .ok()?;
    let factor: i64 = match input.to_ascii_lowercase().as_str() {
        "ms" => 1,
        "s" => 1_000,
        "m" => 60_000,
        "h" => 3_600_000,
        "d" => 86_400_000,
        "w" => 604_800_000,
        _ => return None,
    };
    Decimal::from_str(number)
        .ok()?
        .checked_mul(Decimal::from(factor))?
        .trunc()
        .to_i64()
}
