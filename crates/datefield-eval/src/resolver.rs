//! Value resolution
//!
//! Every accepted input form converges on one [`Instant`]. Text is tried in
//! a fixed order: the field's display format, then date math, then a bare
//! integer scaled by the field's numeric resolution. Numbers skip all of it.

use crate::evaluator;
use datefield_diagnostics::{DateFieldError, Result};
use datefield_parser::{DisplayFormat, ParsedInstant, parse_date_math};
use datefield_types::{AnchorSpec, Instant, Rounding, TimeUnit};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw value handed over by the mapping layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldInput {
    /// Already a count of milliseconds
    Number(i64),
    /// UTF-8 encoded text, as stored in an index term
    Bytes(Vec<u8>),
    /// Text from a document or query
    Text(String),
}

impl FieldInput {
    /// Text form of the input, if it is text
    ///
    /// Bytes that are not valid UTF-8 are replaced lossily.
    pub fn as_text(&self) -> Option<std::borrow::Cow<'_, str>> {
        match self {
            Self::Number(_) => None,
            Self::Bytes(bytes) => Some(String::from_utf8_lossy(bytes)),
            Self::Text(text) => Some(std::borrow::Cow::Borrowed(text)),
        }
    }
}

impl From<i64> for FieldInput {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for FieldInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&[u8]> for FieldInput {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<Vec<u8>> for FieldInput {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl fmt::Display for FieldInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Bytes(bytes) => f.write_str(&String::from_utf8_lossy(bytes)),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// The stage that produced a resolved instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Number,
    DisplayFormat,
    DateMath,
    NumericFallback,
}

impl Stage {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::DisplayFormat => "display format",
            Self::DateMath => "date math",
            Self::NumericFallback => "numeric fallback",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A resolved instant and where it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub instant: Instant,
    pub stage: Stage,
}

/// Resolves field input against a display format and numeric resolution
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValueResolver {
    format: DisplayFormat,
    time_unit: TimeUnit,
}

impl ValueResolver {
    pub fn new(format: DisplayFormat, time_unit: TimeUnit) -> Self {
        Self { format, time_unit }
    }

    pub fn format(&self) -> &DisplayFormat {
        &self.format
    }

    pub const fn time_unit(&self) -> TimeUnit {
        self.time_unit
    }

    /// Resolve input to an instant
    pub fn resolve(&self, input: &FieldInput, now: Instant) -> Result<Instant> {
        self.resolve_with(input, now, Rounding::Down).map(|r| r.instant)
    }

    /// Resolve input, reporting the stage that succeeded
    ///
    /// With [`Rounding::Up`] a literal is widened to the last millisecond of
    /// the finest unit it names, and date math rounds up instead of down.
    /// `NOW` without math and numeric inputs are never widened.
    pub fn resolve_with(&self, input: &FieldInput, now: Instant, rounding: Rounding) -> Result<Resolution> {
        match input {
            FieldInput::Number(n) => Ok(Resolution {
                instant: Instant::from_millis(*n),
                stage: Stage::Number,
            }),
            FieldInput::Bytes(_) | FieldInput::Text(_) => {
                let text = input.as_text().unwrap_or_default();
                self.resolve_text(&text, now, rounding)
            }
        }
    }

    /// Resolve text through the display format, date math and numeric stages
    pub fn resolve_text(&self, text: &str, now: Instant, rounding: Rounding) -> Result<Resolution> {
        let format_error = match self.format.parse(text).and_then(|parsed| widen(parsed, rounding)) {
            Ok(instant) => {
                debug!("resolved [{text}] with date format [{}]", self.format);
                return Ok(Resolution {
                    instant,
                    stage: Stage::DisplayFormat,
                });
            }
            Err(e) => {
                trace!("date format [{}] rejected [{text}]: {e}", self.format);
                e
            }
        };

        let math_error = match parse_date_math(text) {
            Ok(Some(math)) => {
                let expr = &math.expression;
                let evaluated = match (rounding, expr.anchor, expr.ops.is_empty()) {
                    (Rounding::Up, AnchorSpec::Literal(start), true) => {
                        evaluator::end_of_unit(start, math.anchor_precision)
                    }
                    _ => evaluator::evaluate_with(expr.anchor.instant(now), &expr.ops, rounding),
                };
                match evaluated {
                    Ok(instant) => {
                        debug!("resolved [{text}] with date math");
                        return Ok(Resolution {
                            instant,
                            stage: Stage::DateMath,
                        });
                    }
                    Err(e) => {
                        trace!("date math for [{text}] failed: {e}");
                        Some(e)
                    }
                }
            }
            Ok(None) => {
                trace!("[{text}] is not date math");
                None
            }
            Err(e) => {
                trace!("date math rejected [{text}]: {e}");
                Some(e)
            }
        };

        if let Ok(value) = text.parse::<i64>() {
            if let Some(millis) = self.time_unit.to_millis(value) {
                debug!("resolved [{text}] as a number of {}", self.time_unit);
                return Ok(Resolution {
                    instant: Instant::from_millis(millis),
                    stage: Stage::NumericFallback,
                });
            }
            trace!("[{text}] {} overflows milliseconds", self.time_unit);
        }

        Err(DateFieldError::UnresolvedValue {
            text: text.to_string(),
            format: self.format.spec().to_string(),
            time_unit: self.time_unit.name().to_string(),
            cause: Some(Box::new(math_error.unwrap_or(format_error))),
        })
    }
}

/// Stage-2 instant, widened to the end of its unit when rounding up
fn widen(parsed: ParsedInstant, rounding: Rounding) -> Result<Instant> {
    match rounding {
        Rounding::Down => Ok(parsed.instant),
        Rounding::Up => evaluator::end_of_unit_at_offset(parsed.instant, parsed.precision, parsed.offset_millis),
    }
}
