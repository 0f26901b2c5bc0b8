//! Date math evaluation
//!
//! Offsets in days and finer units are exact millisecond arithmetic. Month
//! and year offsets move the calendar fields and clamp the day of month to
//! the target month's length, so `Jan 31 + 1 MONTH` is the last day of
//! February. Rounding works on UTC calendar fields.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use datefield_diagnostics::{DateFieldError, Result};
use datefield_types::{CalendarUnit, Instant, MathOp, Rounding};

/// Apply `ops` to `anchor` in order, rounding down
pub fn evaluate(anchor: Instant, ops: &[MathOp]) -> Result<Instant> {
    evaluate_with(anchor, ops, Rounding::Down)
}

/// Apply `ops` to `anchor` in order with the given rounding direction
pub fn evaluate_with(anchor: Instant, ops: &[MathOp], rounding: Rounding) -> Result<Instant> {
    ops.iter().try_fold(anchor, |instant, op| apply(instant, *op, rounding))
}

/// Apply a single operation
pub fn apply(instant: Instant, op: MathOp, rounding: Rounding) -> Result<Instant> {
    match (op, rounding) {
        (MathOp::Offset { unit, amount }, _) => add_units(instant, unit, amount),
        (MathOp::Round { unit }, Rounding::Down) => round_down(instant, unit),
        (MathOp::Round { unit }, Rounding::Up) => round_up(instant, unit),
    }
}

/// Add a signed number of calendar units
pub fn add_units(instant: Instant, unit: CalendarUnit, amount: i64) -> Result<Instant> {
    let overflow = || DateFieldError::InstantOutOfRange {
        instant: instant.millis(),
    };
    match unit.fixed_millis() {
        Some(unit_millis) => amount
            .checked_mul(unit_millis)
            .and_then(|delta| instant.checked_add_millis(delta))
            .ok_or_else(overflow),
        None => {
            let months = if unit == CalendarUnit::Year {
                amount.checked_mul(12).ok_or_else(overflow)?
            } else {
                amount
            };
            add_months(instant, months).ok_or_else(overflow)
        }
    }
}

/// Truncate to the first millisecond of `unit`
pub fn round_down(instant: Instant, unit: CalendarUnit) -> Result<Instant> {
    let overflow = || DateFieldError::InstantOutOfRange {
        instant: instant.millis(),
    };
    match unit.fixed_millis() {
        // UTC has no leap seconds here, so fixed units align with the epoch
        Some(unit_millis) => instant
            .millis()
            .checked_sub(instant.millis().rem_euclid(unit_millis))
            .map(Instant::from_millis)
            .ok_or_else(overflow),
        None => {
            let dt = instant.to_datetime().ok_or_else(overflow)?.naive_utc();
            let month = if unit == CalendarUnit::Year { 1 } else { dt.month() };
            NaiveDate::from_ymd_opt(dt.year(), month, 1)
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(Instant::from_naive_utc)
                .ok_or_else(overflow)
        }
    }
}

/// Move to the last millisecond of the `unit` containing `instant`
pub fn round_up(instant: Instant, unit: CalendarUnit) -> Result<Instant> {
    end_of_unit(round_down(instant, unit)?, unit)
}

/// The last millisecond of the `unit` starting at `start`
///
/// `start + 1 unit - 1ms`. Used to widen a literal that names a whole day,
/// month or year into an inclusive upper bound.
pub fn end_of_unit(start: Instant, unit: CalendarUnit) -> Result<Instant> {
    add_units(start, unit, 1)?
        .checked_add_millis(-1)
        .ok_or(DateFieldError::InstantOutOfRange {
            instant: start.millis(),
        })
}

/// [`end_of_unit`] on a clock `offset_millis` east of UTC
///
/// A month written as `2021-03 +05:00` starts at `2021-02-28T19:00Z`; the
/// unit is widened on the local clock so it still ends with March.
pub fn end_of_unit_at_offset(start: Instant, unit: CalendarUnit, offset_millis: i64) -> Result<Instant> {
    let out_of_range = || DateFieldError::InstantOutOfRange {
        instant: start.millis(),
    };
    let local = start.checked_add_millis(offset_millis).ok_or_else(out_of_range)?;
    end_of_unit(local, unit)?
        .checked_add_millis(-offset_millis)
        .ok_or_else(out_of_range)
}

fn add_months(instant: Instant, months: i64) -> Option<Instant> {
    let dt = instant.to_datetime()?.naive_utc();
    let total = i64::from(dt.year())
        .checked_mul(12)?
        .checked_add(i64::from(dt.month0()))?
        .checked_add(months)?;
    let year = i32::try_from(total.div_euclid(12)).ok()?;
    let month = u32::try_from(total.rem_euclid(12)).ok()? + 1;
    let day = dt.day().min(days_in_month(year, month)?);
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(Instant::from_naive_utc(NaiveDateTime::new(date, dt.time())))
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    (28..=31)
        .rev()
        .find(|&day| NaiveDate::from_ymd_opt(year, month, day).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use datefield_parser::canonical;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn at(text: &str) -> Instant {
        canonical::parse(text).unwrap()
    }

    // ============================================================================
    // Offsets
    // ============================================================================

    #[rstest]
    #[case("2021-01-31T10:00:00Z", CalendarUnit::Month, 1, "2021-02-28T10:00:00Z")]
    #[case("2020-01-31T10:00:00Z", CalendarUnit::Month, 1, "2020-02-29T10:00:00Z")]
    #[case("2021-03-31T00:00:00Z", CalendarUnit::Month, -1, "2021-02-28T00:00:00Z")]
    #[case("2021-01-15T00:00:00Z", CalendarUnit::Month, 14, "2022-03-15T00:00:00Z")]
    #[case("2021-01-15T00:00:00Z", CalendarUnit::Month, -13, "2019-12-15T00:00:00Z")]
    #[case("2020-02-29T00:00:00Z", CalendarUnit::Year, 1, "2021-02-28T00:00:00Z")]
    #[case("2021-01-01T00:00:00Z", CalendarUnit::Day, -1, "2020-12-31T00:00:00Z")]
    #[case("2021-01-01T00:00:00Z", CalendarUnit::Hour, 36, "2021-01-02T12:00:00Z")]
    #[case("2021-01-01T00:00:00Z", CalendarUnit::Millisecond, -1, "2020-12-31T23:59:59.999Z")]
    fn test_add_units(#[case] start: &str, #[case] unit: CalendarUnit, #[case] amount: i64, #[case] expected: &str) {
        assert_eq!(add_units(at(start), unit, amount).unwrap(), at(expected));
    }

    #[test]
    fn test_add_units_overflow() {
        let err = add_units(Instant::from_millis(i64::MAX - 10), CalendarUnit::Day, 1).unwrap_err();
        assert!(matches!(err, DateFieldError::InstantOutOfRange { .. }));
        assert!(add_units(Instant::EPOCH, CalendarUnit::Year, i64::MAX).is_err());
        assert!(add_units(Instant::EPOCH, CalendarUnit::Year, 300_000).is_err());
    }

    // ============================================================================
    // Rounding
    // ============================================================================

    #[rstest]
    #[case(CalendarUnit::Year, "2021-01-01T00:00:00Z", "2021-12-31T23:59:59.999Z")]
    #[case(CalendarUnit::Month, "2021-06-01T00:00:00Z", "2021-06-30T23:59:59.999Z")]
    #[case(CalendarUnit::Day, "2021-06-15T00:00:00Z", "2021-06-15T23:59:59.999Z")]
    #[case(CalendarUnit::Hour, "2021-06-15T13:00:00Z", "2021-06-15T13:59:59.999Z")]
    #[case(CalendarUnit::Minute, "2021-06-15T13:45:00Z", "2021-06-15T13:45:59.999Z")]
    #[case(CalendarUnit::Second, "2021-06-15T13:45:30Z", "2021-06-15T13:45:30.999Z")]
    #[case(CalendarUnit::Millisecond, "2021-06-15T13:45:30.250Z", "2021-06-15T13:45:30.250Z")]
    fn test_rounding(#[case] unit: CalendarUnit, #[case] down: &str, #[case] up: &str) {
        let instant = at("2021-06-15T13:45:30.250Z");
        assert_eq!(round_down(instant, unit).unwrap(), at(down));
        assert_eq!(round_up(instant, unit).unwrap(), at(up));
    }

    #[test]
    fn test_round_down_before_epoch() {
        let instant = at("1969-12-31T23:59:59.500Z");
        assert_eq!(round_down(instant, CalendarUnit::Second).unwrap().millis(), -1_000);
        assert_eq!(round_down(instant, CalendarUnit::Day).unwrap().millis(), -86_400_000);
        assert_eq!(round_down(instant, CalendarUnit::Year).unwrap(), at("1969-01-01T00:00:00Z"));
    }

    #[test]
    fn test_round_down_at_lower_limit() {
        assert!(round_down(Instant::from_millis(i64::MIN), CalendarUnit::Day).is_err());
    }

    // ============================================================================
    // Sequences
    // ============================================================================

    #[test]
    fn test_ops_apply_in_order() {
        let anchor = at("2021-06-15T13:45:30Z");
        let round_then_add = [MathOp::round(CalendarUnit::Day), MathOp::offset(CalendarUnit::Hour, 1)];
        let add_then_round = [MathOp::offset(CalendarUnit::Hour, 1), MathOp::round(CalendarUnit::Day)];
        assert_eq!(evaluate(anchor, &round_then_add).unwrap(), at("2021-06-15T01:00:00Z"));
        assert_eq!(evaluate(anchor, &add_then_round).unwrap(), at("2021-06-15T00:00:00Z"));
    }

    #[test]
    fn test_round_up_only_changes_rounding() {
        let anchor = at("2021-06-15T13:45:30Z");
        let ops = [MathOp::offset(CalendarUnit::Day, -1), MathOp::round(CalendarUnit::Day)];
        assert_eq!(
            evaluate_with(anchor, &ops, Rounding::Up).unwrap(),
            at("2021-06-14T23:59:59.999Z")
        );
    }

    #[test]
    fn test_empty_ops_return_anchor() {
        let anchor = at("2021-06-15T13:45:30Z");
        assert_eq!(evaluate(anchor, &[]).unwrap(), anchor);
        assert_eq!(evaluate_with(anchor, &[], Rounding::Up).unwrap(), anchor);
    }

    #[test]
    fn test_end_of_unit() {
        assert_eq!(
            end_of_unit(at("2021-02-01T00:00:00Z"), CalendarUnit::Month).unwrap(),
            at("2021-02-28T23:59:59.999Z")
        );
        assert_eq!(
            end_of_unit(at("2021-02-01T00:00:00Z"), CalendarUnit::Millisecond).unwrap(),
            at("2021-02-01T00:00:00Z")
        );
    }

    const PLUS_FIVE: i64 = 5 * 3_600_000;
    const MINUS_THREE_THIRTY: i64 = -(3 * 3_600_000 + 1_800_000);

    #[rstest]
    #[case(CalendarUnit::Month, "2021-02-28T19:00:00Z", PLUS_FIVE, "2021-03-31T18:59:59.999Z")]
    #[case(CalendarUnit::Month, "2021-03-01T03:30:00Z", MINUS_THREE_THIRTY, "2021-04-01T03:29:59.999Z")]
    #[case(CalendarUnit::Year, "2020-12-31T19:00:00Z", PLUS_FIVE, "2021-12-31T18:59:59.999Z")]
    #[case(CalendarUnit::Year, "2021-01-01T03:30:00Z", MINUS_THREE_THIRTY, "2022-01-01T03:29:59.999Z")]
    #[case(CalendarUnit::Day, "2021-03-14T19:00:00Z", PLUS_FIVE, "2021-03-15T18:59:59.999Z")]
    #[case(CalendarUnit::Day, "2021-03-15T03:30:00Z", MINUS_THREE_THIRTY, "2021-03-16T03:29:59.999Z")]
    #[case(CalendarUnit::Month, "2021-02-01T00:00:00Z", 0, "2021-02-28T23:59:59.999Z")]
    fn test_end_of_unit_at_offset(
        #[case] unit: CalendarUnit,
        #[case] start: &str,
        #[case] offset_millis: i64,
        #[case] expected: &str,
    ) {
        assert_eq!(end_of_unit_at_offset(at(start), unit, offset_millis).unwrap(), at(expected));
    }
}
