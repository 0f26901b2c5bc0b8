//! Joda-style date patterns compiled to chrono format strings
//!
//! Supported letters:
//!
//! | Letters        | Meaning                      | chrono            |
//! |----------------|------------------------------|-------------------|
//! | `yyyy` `uuuu`  | year                         | `%Y`              |
//! | `yy`           | two-digit year               | `%y`              |
//! | `M` `MM`       | month number                 | `%m`              |
//! | `MMM` `MMMM`   | month name                   | `%b` `%B`         |
//! | `d` `dd`       | day of month                 | `%d`              |
//! | `E` `EEEE`     | day name                     | `%a` `%A`         |
//! | `H` `HH`       | hour of day                  | `%H`              |
//! | `h` `hh`       | clock hour with `a`          | `%I`              |
//! | `a`            | half day                     | `%p`              |
//! | `m` `mm`       | minute                       | `%M`              |
//! | `s` `ss`       | second                       | `%S`              |
//! | `S`..          | fraction of second           | `%3f` `%6f` `%9f` |
//! | `Z` `ZZ`       | zone offset                  | `%z` `%:z`        |
//!
//! Text between single quotes is literal and `''` is a single quote.
//! Fields the pattern leaves out take their minimum value and patterns
//! without a zone offset read as UTC.

use crate::ParsedInstant;
use chrono::format::{Item, Parsed, StrftimeItems};
use datefield_diagnostics::{DateFieldError, Result, Span};
use datefield_types::{CalendarUnit, Instant};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Fields {
    year: bool,
    month: bool,
    day: bool,
    hour24: bool,
    hour12: bool,
    half_day: bool,
    minute: bool,
    offset: bool,
}

/// A compiled date pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JodaPattern {
    source: String,
    parse_fmt: String,
    print_fmt: String,
    precision: CalendarUnit,
    fields: Fields,
}

impl JodaPattern {
    /// Compile a pattern such as `yyyy/MM/dd HH:mm`
    pub fn compile(pattern: &str) -> Result<Self> {
        let mut compiler = Compiler::new(pattern);
        compiler.run()?;
        let Compiler {
            parse_fmt,
            print_fmt,
            precision,
            fields,
            ..
        } = compiler;
        let precision = precision.ok_or_else(|| {
            DateFieldError::invalid_pattern(
                pattern,
                Span::new(0, pattern.len()),
                "pattern has no date or time fields",
            )
        })?;
        for fmt in [&parse_fmt, &print_fmt] {
            if StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error)) {
                return Err(DateFieldError::invalid_pattern(
                    pattern,
                    Span::new(0, pattern.len()),
                    "pattern cannot be expressed as a chrono format",
                ));
            }
        }
        Ok(Self {
            source: pattern.to_string(),
            parse_fmt,
            print_fmt,
            precision,
            fields,
        })
    }

    /// The pattern as written
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Finest unit the pattern spells out
    pub const fn precision(&self) -> CalendarUnit {
        self.precision
    }

    /// Parse text laid out by this pattern
    pub fn parse(&self, text: &str) -> Result<ParsedInstant> {
        let mut parsed = Parsed::new();
        chrono::format::parse(&mut parsed, text, StrftimeItems::new(&self.parse_fmt))
            .and_then(|()| self.fill_defaults(&mut parsed))
            .map_err(|e| self.mismatch(text, e))?;

        let (instant, offset_millis) = if self.fields.offset {
            parsed
                .to_datetime()
                .map(|dt| (Instant::from_datetime(&dt), i64::from(dt.offset().local_minus_utc()) * 1_000))
        } else {
            parsed
                .to_naive_datetime_with_offset(0)
                .map(|ndt| (Instant::from_naive_utc(ndt), 0))
        }
        .map_err(|e| self.mismatch(text, e))?;

        Ok(ParsedInstant {
            instant,
            precision: self.precision,
            offset_millis,
        })
    }

    /// Print an instant in UTC using this pattern
    pub fn print(&self, instant: Instant) -> Result<String> {
        let out_of_range = || DateFieldError::InstantOutOfRange {
            instant: instant.millis(),
        };
        let dt = instant.to_datetime().ok_or_else(out_of_range)?;
        let mut out = String::new();
        write!(out, "{}", dt.format(&self.print_fmt)).map_err(|_| out_of_range())?;
        Ok(out)
    }

    fn fill_defaults(&self, parsed: &mut Parsed) -> chrono::ParseResult<()> {
        let f = self.fields;
        if !f.year {
            parsed.set_year(1970)?;
        }
        if !f.month {
            parsed.set_month(1)?;
        }
        if !f.day {
            parsed.set_day(1)?;
        }
        if f.hour12 && !f.half_day {
            parsed.set_ampm(false)?;
        }
        if !f.hour24 && !f.hour12 && !f.half_day {
            parsed.set_hour(0)?;
        }
        if !f.minute {
            parsed.set_minute(0)?;
        }
        Ok(())
    }

    fn mismatch(&self, text: &str, err: chrono::ParseError) -> DateFieldError {
        DateFieldError::malformed_timestamp(
            text,
            Span::new(0, text.len()),
            format!("does not match pattern '{}': {err}", self.source),
        )
    }
}

struct Compiler<'p> {
    pattern: &'p str,
    chars: Vec<(usize, char)>,
    pos: usize,
    parse_fmt: String,
    print_fmt: String,
    precision: Option<CalendarUnit>,
    fields: Fields,
}

impl<'p> Compiler<'p> {
    fn new(pattern: &'p str) -> Self {
        Self {
            pattern,
            chars: pattern.char_indices().collect(),
            pos: 0,
            parse_fmt: String::new(),
            print_fmt: String::new(),
            precision: None,
            fields: Fields::default(),
        }
    }

    fn run(&mut self) -> Result<()> {
        while let Some(&(offset, c)) = self.chars.get(self.pos) {
            if c == '\'' {
                self.quoted(offset)?;
            } else if c.is_ascii_alphabetic() {
                let count = self.chars[self.pos..]
                    .iter()
                    .take_while(|&&(_, other)| other == c)
                    .count();
                self.pos += count;
                self.letter(c, count, Span::new(offset, offset + count))?;
            } else {
                self.literal(c);
                self.pos += 1;
            }
        }
        Ok(())
    }

    fn quoted(&mut self, open: usize) -> Result<()> {
        self.pos += 1;
        if self.chars.get(self.pos).map(|&(_, c)| c) == Some('\'') {
            self.literal('\'');
            self.pos += 1;
            return Ok(());
        }
        loop {
            match self.chars.get(self.pos).map(|&(_, c)| c) {
                None => {
                    return Err(DateFieldError::invalid_pattern(
                        self.pattern,
                        Span::new(open, self.pattern.len()),
                        "unterminated quoted literal",
                    ));
                }
                Some('\'') if self.chars.get(self.pos + 1).map(|&(_, c)| c) == Some('\'') => {
                    self.literal('\'');
                    self.pos += 2;
                }
                Some('\'') => {
                    self.pos += 1;
                    return Ok(());
                }
                Some(c) => {
                    self.literal(c);
                    self.pos += 1;
                }
            }
        }
    }

    fn literal(&mut self, c: char) {
        if c == '%' {
            self.both("%%");
        } else {
            self.parse_fmt.push(c);
            self.print_fmt.push(c);
        }
    }

    fn both(&mut self, spec: &str) {
        self.parse_fmt.push_str(spec);
        self.print_fmt.push_str(spec);
    }

    fn unit(&mut self, unit: CalendarUnit) {
        self.precision = Some(self.precision.map_or(unit, |p| p.max(unit)));
    }

    fn letter(&mut self, c: char, count: usize, span: Span) -> Result<()> {
        let too_long = |pattern: &str| {
            DateFieldError::invalid_pattern(pattern, span, format!("too many '{c}' letters"))
        };
        match c {
            'y' | 'u' | 'Y' => {
                self.both(if count == 2 { "%y" } else { "%Y" });
                self.fields.year = true;
                self.unit(CalendarUnit::Year);
            }
            'M' => {
                self.both(match count {
                    1 | 2 => "%m",
                    3 => "%b",
                    _ => "%B",
                });
                self.fields.month = true;
                self.unit(CalendarUnit::Month);
            }
            'd' if count <= 2 => {
                self.both("%d");
                self.fields.day = true;
                self.unit(CalendarUnit::Day);
            }
            'E' => self.both(if count <= 3 { "%a" } else { "%A" }),
            'H' if count <= 2 => {
                self.both("%H");
                self.fields.hour24 = true;
                self.unit(CalendarUnit::Hour);
            }
            'h' if count <= 2 => {
                self.both("%I");
                self.fields.hour12 = true;
                self.unit(CalendarUnit::Hour);
            }
            'a' if count == 1 => {
                self.both("%p");
                self.fields.half_day = true;
            }
            'm' if count <= 2 => {
                self.both("%M");
                self.fields.minute = true;
                self.unit(CalendarUnit::Minute);
            }
            's' if count <= 2 => {
                self.both("%S");
                self.unit(CalendarUnit::Second);
            }
            'S' => {
                self.both(match count {
                    1..=3 => "%3f",
                    4..=6 => "%6f",
                    _ => "%9f",
                });
                self.unit(CalendarUnit::Millisecond);
            }
            'Z' if count <= 2 => {
                self.parse_fmt.push_str("%#z");
                self.print_fmt.push_str(if count == 1 { "%z" } else { "%:z" });
                self.fields.offset = true;
            }
            'Z' => {
                return Err(DateFieldError::invalid_pattern(
                    self.pattern,
                    span,
                    "time zone ids are not supported, use Z or ZZ for an offset",
                ));
            }
            'd' | 'H' | 'h' | 'a' | 'm' | 's' => return Err(too_long(self.pattern)),
            _ => {
                return Err(DateFieldError::invalid_pattern(
                    self.pattern,
                    span,
                    format!("unsupported pattern letter '{c}'"),
                ));
            }
        }
        Ok(())
    }
}
