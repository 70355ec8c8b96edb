//! Locale-aware number transformers.
//!
//! All transformers in this module share a [`NumberFormatter`], which renders
//! numbers with a locale's decimal and grouping separators and parses them
//! back, stopping at the first character it does not recognize.
//!
//! ## Modules
//!
//! - [`localized`] - Plain, integer, and money transformers
//! - [`percent`] - Percentages, stored as fractions or whole numbers
//! - [`float`] - Numeric strings to floats

pub mod float;
pub mod localized;
pub mod percent;

use formflow_core::locale::Locale;
use formflow_core::rounding::{round_decimal_str, RoundingMode};
use formflow_core::{FormError, FormResult, Value};

pub use float::StringToFloat;
pub use localized::{IntegerToLocalizedString, MoneyToLocalizedString, NumberToLocalizedString};
pub use percent::{PercentToLocalizedString, PercentType};

/// Characters ignored at the end of a parsed number.
const TRAILING_BLANKS: &[char] = &[' ', '\t', '\n', '\r', '\0', '\u{0b}', '\u{a0}'];

/// How many fraction digits a formatted number shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FractionDigits {
    /// Exactly this many digits, zero-padded.
    Exact(u32),
    /// At most this many digits, trailing zeros removed.
    Max(u32),
}

/// A number read by [`NumberFormatter::parse`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedNumber {
    Int(i64),
    Float(f64),
}

impl ParsedNumber {
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
        }
    }
}

/// Formats and parses numbers for one locale.
///
/// ```
/// use formflow_core::locale::Locale;
/// use formflow_core::rounding::RoundingMode;
/// use formflow_transform::number::{FractionDigits, NumberFormatter, ParsedNumber};
///
/// let f = NumberFormatter::new(Locale::new("de_DE"))
///     .with_grouping(true)
///     .with_fraction_digits(FractionDigits::Exact(2), RoundingMode::HalfUp);
/// assert_eq!(f.format_f64(1234.567), "1.234,57");
/// assert_eq!(f.parse("1.234,5").unwrap(), ParsedNumber::Float(1234.5));
/// ```
#[derive(Debug, Clone)]
pub struct NumberFormatter {
    locale: Locale,
    grouping: bool,
    fraction_digits: FractionDigits,
    rounding_mode: RoundingMode,
}

impl NumberFormatter {
    /// A formatter with no grouping and up to three fraction digits,
    /// rounded half-even.
    pub const fn new(locale: Locale) -> Self {
        Self {
            locale,
            grouping: false,
            fraction_digits: FractionDigits::Max(3),
            rounding_mode: RoundingMode::HalfEven,
        }
    }

    #[must_use]
    pub const fn with_grouping(mut self, grouping: bool) -> Self {
        self.grouping = grouping;
        self
    }

    #[must_use]
    pub const fn with_fraction_digits(
        mut self,
        fraction_digits: FractionDigits,
        rounding_mode: RoundingMode,
    ) -> Self {
        self.fraction_digits = fraction_digits;
        self.rounding_mode = rounding_mode;
        self
    }

    pub const fn locale(&self) -> &Locale {
        &self.locale
    }

    pub const fn grouping(&self) -> bool {
        self.grouping
    }

    pub fn decimal_separator(&self) -> char {
        self.locale.symbols().decimal
    }

    // ── Formatting ──────────────────────────────────────────────────

    /// Formats a numeric value: an integer, a float, or a numeric string.
    pub fn format_value(&self, value: &Value) -> FormResult<String> {
        match value {
            Value::Int(i) => Ok(self.format_decimal(&i.to_string())),
            Value::Float(f) => Ok(self.format_f64(*f)),
            other => other
                .as_f64()
                .map(|f| self.format_f64(f))
                .ok_or_else(|| FormError::transformation_failed("Expected a numeric.")),
        }
    }

    /// Formats a float.
    pub fn format_f64(&self, value: f64) -> String {
        if value.is_nan() {
            return "NaN".to_string();
        }
        if value.is_infinite() {
            return String::from(if value > 0.0 { "∞" } else { "-∞" });
        }
        self.format_decimal(&value.to_string())
    }

    /// Formats a plain decimal string such as `-1234.5`.
    fn format_decimal(&self, repr: &str) -> String {
        let rounded = match self.fraction_digits {
            FractionDigits::Exact(scale) => {
                round_decimal_str(repr, scale as usize, self.rounding_mode)
            }
            FractionDigits::Max(max) => {
                let rounded = round_decimal_str(repr, max as usize, self.rounding_mode);
                if rounded.contains('.') {
                    rounded.trim_end_matches('0').trim_end_matches('.').to_string()
                } else {
                    rounded
                }
            }
        };

        let (negative, body) = match rounded.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, rounded.as_str()),
        };
        let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));
        let symbols = self.locale.symbols();

        let mut out = String::with_capacity(rounded.len() + int_part.len() / 3 + 1);
        if negative {
            out.push('-');
        }
        let len = int_part.len();
        for (i, c) in int_part.chars().enumerate() {
            if self.grouping && i > 0 && (len - i) % 3 == 0 {
                out.push(symbols.group);
            }
            out.push(c);
        }
        if !frac_part.is_empty() {
            out.push(symbols.decimal);
            out.push_str(frac_part);
        }

        out.replace(['\u{a0}', '\u{202f}'], " ")
    }

    // ── Parsing ─────────────────────────────────────────────────────

    /// Rewrites `.` and `,` to the locale decimal separator unless the
    /// character is the active grouping separator.
    pub fn normalize_decimal_separators(&self, value: &str) -> String {
        let symbols = self.locale.symbols();
        value
            .chars()
            .map(|c| match c {
                '.' | ',' if c != symbols.decimal && !(self.grouping && c == symbols.group) => {
                    symbols.decimal
                }
                other => other,
            })
            .collect()
    }

    /// Parses a localized number.
    ///
    /// The value is read as a float when it contains the decimal separator
    /// or an exponent, and as an integer otherwise. Group separators are
    /// accepted only when grouping is enabled and they are followed by
    /// exactly three digits. Parsing stops at the first unrecognized
    /// character; any remainder other than trailing blanks is an error that
    /// quotes it.
    pub fn parse(&self, value: &str) -> FormResult<ParsedNumber> {
        let normalized = self.normalize_decimal_separators(value);
        let chars: Vec<char> = normalized.chars().collect();
        let symbols = self.locale.symbols();
        let mut pos = 0;

        let negative = chars.first() == Some(&'-');
        if negative {
            pos += 1;
        }

        if chars.get(pos) == Some(&'∞') {
            return Err(infinity());
        }

        let mut int_digits = String::new();
        while let Some(&c) = chars.get(pos) {
            if c.is_ascii_digit() {
                int_digits.push(c);
                pos += 1;
            } else if self.grouping
                && !int_digits.is_empty()
                && self.is_group_separator(c)
                && is_digit_group(&chars, pos + 1)
            {
                pos += 1;
            } else {
                break;
            }
        }

        let mut frac_digits = String::new();
        let mut is_double = false;
        if chars.get(pos) == Some(&symbols.decimal) {
            is_double = true;
            pos += 1;
            while let Some(&c) = chars.get(pos).filter(|c| c.is_ascii_digit()) {
                frac_digits.push(c);
                pos += 1;
            }
        }

        if int_digits.is_empty() && frac_digits.is_empty() {
            return Err(FormError::transformation_failed("Number parsing failed."));
        }

        let mut exponent = String::new();
        if matches!(chars.get(pos), Some('e' | 'E')) {
            let mut look = pos + 1;
            let mut sign = String::new();
            if let Some(&s @ ('+' | '-')) = chars.get(look) {
                sign.push(s);
                look += 1;
            }
            let start = look;
            while chars.get(look).is_some_and(char::is_ascii_digit) {
                look += 1;
            }
            if look > start {
                is_double = true;
                exponent = format!("e{sign}{}", chars[start..look].iter().collect::<String>());
                pos = look;
            }
        }

        let number = if is_double {
            let text = format!(
                "{}{}.{}{exponent}",
                if negative { "-" } else { "" },
                if int_digits.is_empty() { "0" } else { &int_digits },
                if frac_digits.is_empty() { "0" } else { &frac_digits },
            );
            let f: f64 = text
                .parse()
                .map_err(|_| FormError::transformation_failed("Number parsing failed."))?;
            #[allow(clippy::cast_precision_loss)]
            let limit = i64::MAX as f64;
            if !f.is_finite() || f >= limit || f <= -limit {
                return Err(infinity());
            }
            ParsedNumber::Float(f)
        } else {
            let magnitude: i128 = int_digits.parse().map_err(|_| infinity())?;
            let signed = if negative { -magnitude } else { magnitude };
            if signed >= i128::from(i64::MAX) || signed <= -i128::from(i64::MAX) {
                return Err(infinity());
            }
            ParsedNumber::Int(i64::try_from(signed).map_err(|_| infinity())?)
        };

        let remainder: String = chars[pos..].iter().collect();
        let remainder = remainder.trim_matches(TRAILING_BLANKS);
        if !remainder.is_empty() {
            return Err(FormError::transformation_failed(format!(
                "The number contains unrecognized characters: \"{remainder}\"."
            )));
        }

        Ok(number)
    }

    fn is_group_separator(&self, c: char) -> bool {
        let symbols = self.locale.symbols();
        if symbols.group_is_space() {
            matches!(c, ' ' | '\u{a0}' | '\u{202f}')
        } else {
            c == symbols.group
        }
    }
}

/// Exactly three digits starting at `start`, not followed by a fourth.
fn is_digit_group(chars: &[char], start: usize) -> bool {
    (start..start + 3).all(|i| chars.get(i).is_some_and(char::is_ascii_digit))
        && !chars.get(start + 3).is_some_and(char::is_ascii_digit)
}

fn infinity() -> FormError {
    FormError::transformation_failed("I don't have a clear idea what infinity looks like.")
}

/// Fails on the spellings of "not a number" that float parsers accept.
pub(crate) fn reject_nan(value: &str) -> FormResult<()> {
    if matches!(value, "NaN" | "NAN" | "nan") {
        return Err(FormError::transformation_failed("\"NaN\" is not a valid number."));
    }
    Ok(())
}
