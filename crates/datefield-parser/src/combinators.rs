//! Common parser combinators for date field text

use datefield_diagnostics::{DateFieldError, Result, Span};
use winnow::ascii::{alpha1, digit1};
use winnow::combinator::opt;
use winnow::error::{ContextError, ErrMode};
use winnow::token::{one_of, take_while};
use winnow::{ModalResult, Parser};

pub(crate) type Input<'a> = &'a str;
pub(crate) type PResult<O> = ModalResult<O>;

/// Exactly `n` ASCII digits
pub(crate) fn fixed_digits(input: &mut Input<'_>, n: usize) -> PResult<u32> {
    take_while(n, '0'..='9')
        .try_map(|s: &str| s.parse::<u32>())
        .parse_next(input)
}

/// Optionally signed year of at least four digits
///
/// Years outside 0000..=9999 carry an explicit sign, matching chrono's `%Y`.
pub(crate) fn year(input: &mut Input<'_>) -> PResult<i32> {
    (opt(one_of(['+', '-'])), take_while(4.., '0'..='9'))
        .try_map(|(sign, digits): (Option<char>, &str)| {
            digits
                .parse::<i32>()
                .map(|v| if sign == Some('-') { -v } else { v })
        })
        .parse_next(input)
}

/// One or more ASCII digits
pub(crate) fn digits<'i>(input: &mut Input<'i>) -> PResult<&'i str> {
    digit1.parse_next(input)
}

/// One or more ASCII letters
pub(crate) fn letters<'i>(input: &mut Input<'i>) -> PResult<&'i str> {
    alpha1.parse_next(input)
}

/// Leading digits of a decimal fraction as whole milliseconds
///
/// Digits past the third are dropped, never rounded: `5` is 500,
/// `12345` is 123.
pub(crate) fn fraction_millis(digits: &str) -> u32 {
    digits
        .bytes()
        .chain(std::iter::repeat(b'0'))
        .take(3)
        .fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
}

/// Position-tracking wrapper that turns winnow failures into typed errors
///
/// Winnow handles the token shapes; the scanner remembers where each field
/// started so a failure can point at it.
pub(crate) struct Scanner<'t> {
    text: &'t str,
    input: Input<'t>,
}

impl<'t> Scanner<'t> {
    pub(crate) fn new(text: &'t str) -> Self {
        Self { text, input: text }
    }

    /// Byte offset of the next unread character
    pub(crate) fn pos(&self) -> usize {
        self.text.len() - self.input.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.input.chars().next()
    }

    /// Consume `c` if it is next
    pub(crate) fn eat(&mut self, c: char) -> bool {
        match self.input.strip_prefix(c) {
            Some(rest) => {
                self.input = rest;
                true
            }
            None => false,
        }
    }

    /// Consume `c` or fail pointing at the current position
    pub(crate) fn expect(&mut self, c: char, context: &str) -> Result<()> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.error_here(1, format!("expected '{c}' {context}")))
        }
    }

    /// Run a winnow parser, reporting `what` on failure
    pub(crate) fn run<O>(
        &mut self,
        width: usize,
        what: &str,
        mut parser: impl Parser<Input<'t>, O, ErrMode<ContextError>>,
    ) -> Result<O> {
        let start = self.pos();
        parser
            .parse_next(&mut self.input)
            .map_err(|_| self.error_at(start, width, format!("expected {what}")))
    }

    /// Fail unless the whole text was consumed
    pub(crate) fn finish(&self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            let remaining = self.text.len() - self.pos();
            Err(self.error_here(remaining, format!("unexpected trailing text '{}'", self.input)))
        }
    }

    pub(crate) fn error_here(&self, width: usize, message: impl Into<String>) -> DateFieldError {
        self.error_at(self.pos(), width, message)
    }

    pub(crate) fn error_at(&self, start: usize, width: usize, message: impl Into<String>) -> DateFieldError {
        let start = start.min(self.text.len());
        let end = (start + width).min(self.text.len());
        DateFieldError::malformed_timestamp(self.text, Span::new(start, end), message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_millis_truncates() {
        assert_eq!(fraction_millis("5"), 500);
        assert_eq!(fraction_millis("12"), 120);
        assert_eq!(fraction_millis("123"), 123);
        assert_eq!(fraction_millis("12345"), 123);
        assert_eq!(fraction_millis("9999999999999999999999"), 999);
    }

    #[test]
    fn test_year_sign_and_width() {
        let mut input = "2024-01";
        assert_eq!(year(&mut input).unwrap(), 2024);
        assert_eq!(input, "-01");

        let mut input = "-0001-01";
        assert_eq!(year(&mut input).unwrap(), -1);

        let mut input = "+10000-01";
        assert_eq!(year(&mut input).unwrap(), 10000);

        let mut input = "999-01";
        assert!(year(&mut input).is_err());
    }

    #[test]
    fn test_scanner_positions() {
        let mut scanner = Scanner::new("12:3x");
        assert_eq!(scanner.run(2, "hour", |i: &mut Input<'_>| fixed_digits(i, 2)).unwrap(), 12);
        scanner.expect(':', "after hour").unwrap();
        let err = scanner.run(2, "minute", |i: &mut Input<'_>| fixed_digits(i, 2)).unwrap_err();
        match err {
            DateFieldError::MalformedTimestamp { span, message, .. } => {
                assert_eq!(span, Span::new(3, 5));
                assert_eq!(message, "expected minute");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
