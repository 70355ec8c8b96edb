//! Numbers, integers, and money amounts as localized strings.

use std::num::NonZeroU32;

use formflow_core::locale::Locale;
use formflow_core::rounding::{normalize_precision, round_f64, RoundingMode};
use formflow_core::{FormError, FormResult, Value};

use super::{reject_nan, FractionDigits, NumberFormatter, ParsedNumber};
use crate::transformer::DataTransformer;

/// Transforms between a number and a localized string.
///
/// Without a scale the view shows up to three fraction digits, rounded
/// half-even, and parsed values are not rounded. With a scale the view
/// shows exactly that many digits and parsed values are rounded to it with
/// the configured mode; a scale of zero yields integers.
///
/// # Examples
///
/// ```
/// use formflow_core::{locale::Locale, rounding::RoundingMode, Value};
/// use formflow_transform::number::NumberToLocalizedString;
/// use formflow_transform::transformer::DataTransformer;
///
/// let t = NumberToLocalizedString::new(Locale::new("de_AT"))
///     .with_scale(0)
///     .with_rounding_mode(RoundingMode::HalfEven);
/// assert_eq!(t.transform(&Value::Float(1234.5)).unwrap(), Value::from("1234"));
/// assert_eq!(t.transform(&Value::Float(1233.5)).unwrap(), Value::from("1234"));
/// assert_eq!(t.reverse_transform(&Value::from("1234,5")).unwrap(), Value::Int(1234));
/// ```
#[derive(Debug, Clone)]
pub struct NumberToLocalizedString {
    scale: Option<u32>,
    grouping: bool,
    rounding_mode: RoundingMode,
    locale: Locale,
}

impl NumberToLocalizedString {
    pub const fn new(locale: Locale) -> Self {
        Self {
            scale: None,
            grouping: false,
            rounding_mode: RoundingMode::HalfUp,
            locale,
        }
    }

    #[must_use]
    pub const fn with_scale(mut self, scale: u32) -> Self {
        self.scale = Some(scale);
        self
    }

    #[must_use]
    pub const fn with_grouping(mut self, grouping: bool) -> Self {
        self.grouping = grouping;
        self
    }

    #[must_use]
    pub const fn with_rounding_mode(mut self, rounding_mode: RoundingMode) -> Self {
        self.rounding_mode = rounding_mode;
        self
    }

    pub const fn scale(&self) -> Option<u32> {
        self.scale
    }

    fn formatter(&self) -> NumberFormatter {
        let formatter = NumberFormatter::new(self.locale.clone()).with_grouping(self.grouping);
        match self.scale {
            Some(scale) => formatter.with_fraction_digits(FractionDigits::Exact(scale), self.rounding_mode),
            None => formatter,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn round(&self, number: ParsedNumber) -> Value {
        match (self.scale, number) {
            (None, ParsedNumber::Int(i)) | (Some(0), ParsedNumber::Int(i)) => Value::Int(i),
            (None, ParsedNumber::Float(f)) => Value::Float(f),
            (Some(0), ParsedNumber::Float(f)) => {
                Value::Int(round_f64(f, 1.0, self.rounding_mode) as i64)
            }
            (Some(scale), number) => {
                let coefficient = 10_f64.powi(i32::try_from(scale).unwrap_or(i32::MAX));
                Value::Float(round_f64(number.as_f64(), coefficient, self.rounding_mode))
            }
        }
    }
}

impl DataTransformer for NumberToLocalizedString {
    fn transform(&self, value: &Value) -> FormResult<Value> {
        if value.is_null() {
            return Ok(Value::from(""));
        }
        if !value.is_numeric() {
            return Err(FormError::transformation_failed("Expected a numeric."));
        }
        self.formatter().format_value(value).map(Value::String)
    }

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    fn reverse_transform(&self, value: &Value) -> FormResult<Value> {
        let s = match value {
            Value::Null => return Ok(Value::Null),
            Value::String(s) => s,
            _ => return Err(FormError::transformation_failed("Expected a string.")),
        };
        if s.is_empty() {
            return Ok(Value::Null);
        }
        let invalid = |err: FormError| err.with_invalid_message("Please enter a valid number.", s);
        reject_nan(s).map_err(invalid)?;

        let number = match self.formatter().parse(s).map_err(invalid)? {
            ParsedNumber::Int(i) if (i as f64) as i64 == i => ParsedNumber::Float(i as f64),
            other => other,
        };
        Ok(self.round(number))
    }
}

// ============================================================
// IntegerToLocalizedString
// ============================================================

/// Transforms between an integer and a localized string.
///
/// Fractions are rounded towards zero by default. View values containing
/// the locale's decimal separator are rejected.
#[derive(Debug, Clone)]
pub struct IntegerToLocalizedString {
    inner: NumberToLocalizedString,
}

impl IntegerToLocalizedString {
    pub const fn new(locale: Locale) -> Self {
        Self {
            inner: NumberToLocalizedString::new(locale)
                .with_scale(0)
                .with_rounding_mode(RoundingMode::Down),
        }
    }

    #[must_use]
    pub fn with_grouping(mut self, grouping: bool) -> Self {
        self.inner = self.inner.with_grouping(grouping);
        self
    }

    #[must_use]
    pub fn with_rounding_mode(mut self, rounding_mode: RoundingMode) -> Self {
        self.inner = self.inner.with_rounding_mode(rounding_mode);
        self
    }
}

impl DataTransformer for IntegerToLocalizedString {
    fn transform(&self, value: &Value) -> FormResult<Value> {
        self.inner.transform(value)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn reverse_transform(&self, value: &Value) -> FormResult<Value> {
        if let Value::String(s) = value {
            if s.contains(self.inner.locale.symbols().decimal) {
                return Err(FormError::transformation_failed(format!(
                    "The value \"{s}\" is not a valid integer."
                ))
                .with_invalid_message("Please enter an integer.", s.as_str()));
            }
        }
        match self.inner.reverse_transform(value)? {
            Value::Float(f) => Ok(Value::Int(f as i64)),
            other => Ok(other),
        }
    }
}

// ============================================================
// MoneyToLocalizedString
// ============================================================

/// Transforms between a money amount and a localized string.
///
/// Amounts stored in minor units (cents) use a divisor: the model value is
/// divided before formatting and the parsed value multiplied back.
///
/// ```
/// use std::num::NonZeroU32;
/// use formflow_core::{locale::Locale, Value};
/// use formflow_transform::number::MoneyToLocalizedString;
/// use formflow_transform::transformer::DataTransformer;
///
/// let t = MoneyToLocalizedString::new(Locale::new("de_AT"))
///     .with_divisor(NonZeroU32::new(100).unwrap());
/// assert_eq!(t.transform(&Value::Int(123_456)).unwrap(), Value::from("1234,56"));
/// assert_eq!(t.reverse_transform(&Value::from("1234,56")).unwrap(), Value::Float(123_456.0));
/// ```
#[derive(Debug, Clone)]
pub struct MoneyToLocalizedString {
    inner: NumberToLocalizedString,
    divisor: NonZeroU32,
}

impl MoneyToLocalizedString {
    pub const fn new(locale: Locale) -> Self {
        Self {
            inner: NumberToLocalizedString::new(locale).with_scale(2),
            divisor: NonZeroU32::MIN,
        }
    }

    #[must_use]
    pub fn with_scale(mut self, scale: u32) -> Self {
        self.inner = self.inner.with_scale(scale);
        self
    }

    #[must_use]
    pub fn with_grouping(mut self, grouping: bool) -> Self {
        self.inner = self.inner.with_grouping(grouping);
        self
    }

    #[must_use]
    pub fn with_rounding_mode(mut self, rounding_mode: RoundingMode) -> Self {
        self.inner = self.inner.with_rounding_mode(rounding_mode);
        self
    }

    #[must_use]
    pub const fn with_divisor(mut self, divisor: NonZeroU32) -> Self {
        self.divisor = divisor;
        self
    }
}

impl DataTransformer for MoneyToLocalizedString {
    fn transform(&self, value: &Value) -> FormResult<Value> {
        if value.is_null() || self.divisor.get() == 1 {
            return self.inner.transform(value);
        }
        let amount = value
            .as_f64()
            .ok_or_else(|| FormError::transformation_failed("Expected a numeric."))?;
        self.inner
            .transform(&Value::Float(amount / f64::from(self.divisor.get())))
    }

    fn reverse_transform(&self, value: &Value) -> FormResult<Value> {
        let amount = self.inner.reverse_transform(value)?;
        if self.divisor.get() == 1 {
            return Ok(amount);
        }
        Ok(amount.as_f64().map_or(Value::Null, |a| {
            Value::Float(normalize_precision(a * f64::from(self.divisor.get())))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(locale: &str) -> NumberToLocalizedString {
        NumberToLocalizedString::new(Locale::new(locale))
    }

    // ── NumberToLocalizedString: transform ──────────────────────────

    #[test]
    fn test_transform() {
        let cases = [
            (Value::Float(1.0), "1", "de_AT"),
            (Value::Float(1.5), "1,5", "de_AT"),
            (Value::Float(1234.5), "1234,5", "de_AT"),
            (Value::Float(12345.912), "12345,912", "de_AT"),
            (Value::Float(1234.5), "1234,5", "ru"),
            (Value::Float(1234.5), "1234,5", "fi"),
            (Value::Int(12), "12", "en"),
            (Value::from("3.25"), "3.25", "en"),
        ];
        for (from, to, locale) in cases {
            assert_eq!(number(locale).transform(&from).unwrap(), Value::from(to), "{locale}");
        }
    }

    #[test]
    fn test_transform_with_grouping() {
        let cases = [
            (1234.5, "1.234,5", "de_DE"),
            (12345.912, "12.345,912", "de_DE"),
            (1234.5, "1 234,5", "fr"),
            (1234.5, "1 234,5", "ru"),
            (1234.5, "1 234,5", "fi"),
        ];
        for (from, to, locale) in cases {
            let t = number(locale).with_grouping(true);
            assert_eq!(t.transform(&Value::Float(from)).unwrap(), Value::from(to));
            assert_eq!(t.reverse_transform(&Value::from(to)).unwrap(), Value::Float(from));
        }
    }

    #[test]
    fn test_transform_empty() {
        assert_eq!(number("en").transform(&Value::Null).unwrap(), Value::from(""));
    }

    #[test]
    fn test_transform_with_scale() {
        let t = number("de_AT").with_scale(2);
        assert_eq!(t.transform(&Value::Float(1234.5)).unwrap(), Value::from("1234,50"));
        assert_eq!(t.transform(&Value::Float(678.916)).unwrap(), Value::from("678,92"));
    }

    #[test]
    fn test_transform_with_rounding() {
        use RoundingMode::*;
        let cases = [
            (0, 1234.5, "1235", Ceiling),
            (0, -1234.5, "-1234", Ceiling),
            (1, 123.44, "123,5", Ceiling),
            (0, -1234.4, "-1235", Floor),
            (1, 123.45, "123,4", Floor),
            (0, -1234.4, "-1235", Up),
            (1, -123.45, "-123,4", Down),
            (0, 1234.5, "1234", HalfEven),
            (0, 1233.5, "1234", HalfEven),
            (1, 123.45, "123,4", HalfEven),
            (1, -123.35, "-123,4", HalfEven),
            (0, -1234.5, "-1235", HalfUp),
            (1, 123.45, "123,5", HalfUp),
            (0, 1234.5, "1234", HalfDown),
            (1, -123.46, "-123,5", HalfDown),
        ];
        for (scale, input, output, mode) in cases {
            let t = number("de_AT").with_scale(scale).with_rounding_mode(mode);
            assert_eq!(
                t.transform(&Value::Float(input)).unwrap(),
                Value::from(output),
                "{input} at scale {scale} with {mode}"
            );
        }
    }

    #[test]
    fn test_transform_does_not_round_if_no_scale() {
        let t = number("de_AT").with_rounding_mode(RoundingMode::Down);
        assert_eq!(t.transform(&Value::Float(1234.547)).unwrap(), Value::from("1234,547"));
    }

    #[test]
    fn test_transform_expects_numeric() {
        let err = number("en").transform(&Value::from("foo")).unwrap_err();
        assert_eq!(err.message(), "Expected a numeric.");
        assert!(number("en").transform(&Value::Bool(true)).is_err());
    }

    // ── NumberToLocalizedString: reverse ────────────────────────────

    #[test]
    fn test_reverse_transform_with_rounding() {
        use RoundingMode::*;
        let int_cases = [
            ("1234,5", 1235, Ceiling),
            ("-1234,5", -1234, Ceiling),
            ("-1234,4", -1235, Floor),
            ("1234,4", 1235, Up),
            ("-1234,5", -1234, Down),
            ("1234,5", 1234, HalfEven),
            ("1233,5", 1234, HalfEven),
            ("-1232,5", -1232, HalfEven),
            ("-1234,5", -1235, HalfUp),
            ("1234,5", 1234, HalfDown),
            ("-1234,6", -1235, HalfDown),
        ];
        for (input, output, mode) in int_cases {
            let t = number("en").with_scale(0).with_rounding_mode(mode);
            assert_eq!(t.reverse_transform(&Value::from(input)).unwrap(), Value::Int(output));
        }

        let float_cases = [
            (1, "123,44", 123.5, Ceiling),
            (1, "-123,45", -123.5, Floor),
            (1, "-123,44", -123.5, Up),
            (1, "123,45", 123.4, Down),
            (2, "37.37", 37.37, Down),
            (2, "2.01", 2.01, Down),
            (1, "123,35", 123.4, HalfEven),
            (1, "-123,25", -123.2, HalfEven),
            (1, "123,45", 123.5, HalfUp),
            (1, "-123,45", -123.4, HalfDown),
        ];
        for (scale, input, output, mode) in float_cases {
            let t = number("en").with_scale(scale).with_rounding_mode(mode);
            assert_eq!(
                t.reverse_transform(&Value::from(input)).unwrap(),
                Value::Float(output),
                "{input} at scale {scale} with {mode}"
            );
        }
    }

    #[test]
    fn test_reverse_transform_does_not_round_if_no_scale() {
        let t = number("en").with_rounding_mode(RoundingMode::Down);
        assert_eq!(
            t.reverse_transform(&Value::from("1234,547")).unwrap(),
            Value::Float(1234.547)
        );
    }

    #[test]
    fn test_reverse_transform_empty() {
        let t = number("en");
        assert_eq!(t.reverse_transform(&Value::from("")).unwrap(), Value::Null);
        assert_eq!(t.reverse_transform(&Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn test_reverse_transform_with_grouping_and_fixed_spaces() {
        let t = number("ru").with_grouping(true);
        assert_eq!(
            t.reverse_transform(&Value::from("1\u{a0}234,5")).unwrap(),
            Value::Float(1234.5)
        );
    }

    #[test]
    fn test_reverse_transform_with_grouping_but_without_group_separator() {
        let t = number("de_AT").with_grouping(true);
        assert_eq!(t.reverse_transform(&Value::from("1234,5")).unwrap(), Value::Float(1234.5));
        assert_eq!(
            t.reverse_transform(&Value::from("12345,912")).unwrap(),
            Value::Float(12345.912)
        );
    }

    #[test]
    fn test_decimal_separator_may_be_dot_if_grouping_separator_is_not_dot() {
        let t = number("fr").with_grouping(true);
        for input in ["1 234,5", "1 234.5", "1234,5", "1234.5"] {
            assert_eq!(t.reverse_transform(&Value::from(input)).unwrap(), Value::Float(1234.5));
        }
    }

    #[test]
    fn test_decimal_separator_may_be_comma_if_grouping_separator_is_not_comma() {
        let t = number("bg").with_grouping(true);
        for input in ["1 234.5", "1 234,5", "1234.5", "1234,5"] {
            assert_eq!(t.reverse_transform(&Value::from(input)).unwrap(), Value::Float(1234.5));
        }
    }

    #[test]
    fn test_decimal_separator_may_not_be_group_separator() {
        let de = number("de_DE").with_grouping(true);
        assert!(de.reverse_transform(&Value::from("1.234.5")).is_err());
        assert!(de.reverse_transform(&Value::from("1234.5")).is_err());
        let en = number("en").with_grouping(true);
        assert!(en.reverse_transform(&Value::from("1,234,5")).is_err());
        assert!(en.reverse_transform(&Value::from("1234,5")).is_err());
    }

    #[test]
    fn test_reverse_transform_expects_string() {
        let err = number("en").reverse_transform(&Value::Int(1)).unwrap_err();
        assert_eq!(err.message(), "Expected a string.");
    }

    #[test]
    fn test_reverse_transform_disallows_nan() {
        for nan in ["nan", "NaN", "NAN"] {
            let err = number("en").reverse_transform(&Value::from(nan)).unwrap_err();
            assert_eq!(err.message(), "\"NaN\" is not a valid number.");
        }
    }

    #[test]
    fn test_reverse_transform_disallows_infinity() {
        for input in ["∞", "∞,123", "-∞"] {
            assert!(number("en").reverse_transform(&Value::from(input)).is_err());
        }
    }

    #[test]
    fn test_reverse_transform_disallows_extra_characters() {
        let t = number("en");
        assert!(t.reverse_transform(&Value::from("foo123")).is_err());
        let err = t.reverse_transform(&Value::from("12foo3")).unwrap_err();
        assert_eq!(err.message(), "The number contains unrecognized characters: \"foo3\".");
        let ru = number("ru").with_grouping(true);
        let err = ru
            .reverse_transform(&Value::from("12\u{a0}345,678foo"))
            .unwrap_err();
        assert_eq!(err.message(), "The number contains unrecognized characters: \"foo\".");
    }

    #[test]
    fn test_reverse_transform_big_and_small_int() {
        let t = number("en").with_grouping(true);
        assert_eq!(
            t.reverse_transform(&Value::from((i64::MAX - 1).to_string())).unwrap(),
            Value::Int(i64::MAX - 1)
        );
        assert_eq!(t.reverse_transform(&Value::from("1")).unwrap(), Value::Float(1.0));
    }

    #[test]
    fn test_reverse_transform_e_notation() {
        let cases = [
            (0.001, "1E-3"),
            (0.001, "1.0E-3"),
            (0.001, "1e-3"),
            (0.001, "1.0e-03"),
            (1000.0, "1E3"),
            (1000.0, "1.0e3"),
            (1232.0, "1.232e3"),
        ];
        for (output, input) in cases {
            assert_eq!(
                number("en").reverse_transform(&Value::from(input)).unwrap(),
                Value::Float(output)
            );
        }
    }

    // ── IntegerToLocalizedString ────────────────────────────────────

    #[test]
    fn test_integer_transform() {
        let t = IntegerToLocalizedString::new(Locale::new("de_AT"));
        assert_eq!(t.transform(&Value::Int(1)).unwrap(), Value::from("1"));
        assert_eq!(t.transform(&Value::Float(12345.9)).unwrap(), Value::from("12345"));
        assert_eq!(t.transform(&Value::Null).unwrap(), Value::from(""));
    }

    #[test]
    fn test_integer_reverse_transform() {
        let t = IntegerToLocalizedString::new(Locale::new("de_AT"));
        assert_eq!(t.reverse_transform(&Value::from("12345")).unwrap(), Value::Int(12345));
        assert_eq!(t.reverse_transform(&Value::from("")).unwrap(), Value::Null);
    }

    #[test]
    fn test_integer_rejects_decimal_separator() {
        let t = IntegerToLocalizedString::new(Locale::new("de_AT"));
        let err = t.reverse_transform(&Value::from("12345,912")).unwrap_err();
        assert_eq!(err.message(), "The value \"12345,912\" is not a valid integer.");
    }

    #[test]
    fn test_integer_with_grouping() {
        let t = IntegerToLocalizedString::new(Locale::new("de_DE")).with_grouping(true);
        assert_eq!(t.transform(&Value::Int(1_234_567)).unwrap(), Value::from("1.234.567"));
        assert_eq!(t.reverse_transform(&Value::from("1.234.567")).unwrap(), Value::Int(1_234_567));
    }

    #[test]
    fn test_integer_rounding_mode() {
        let t = IntegerToLocalizedString::new(Locale::new("en"))
            .with_rounding_mode(RoundingMode::HalfUp);
        assert_eq!(t.transform(&Value::Float(1.5)).unwrap(), Value::from("2"));
    }

    // ── MoneyToLocalizedString ──────────────────────────────────────

    #[test]
    fn test_money_transform() {
        let t = MoneyToLocalizedString::new(Locale::new("de_AT"))
            .with_divisor(NonZeroU32::new(100).unwrap());
        assert_eq!(t.transform(&Value::Int(123_456)).unwrap(), Value::from("1234,56"));
        assert_eq!(t.transform(&Value::Null).unwrap(), Value::from(""));
        assert!(t.transform(&Value::from("abc")).is_err());
    }

    #[test]
    fn test_money_reverse_transform() {
        let t = MoneyToLocalizedString::new(Locale::new("de_AT"))
            .with_divisor(NonZeroU32::new(100).unwrap());
        assert_eq!(
            t.reverse_transform(&Value::from("12345,67")).unwrap(),
            Value::Float(1_234_567.0)
        );
        assert_eq!(t.reverse_transform(&Value::from("")).unwrap(), Value::Null);
    }

    #[test]
    fn test_money_default_scale_and_divisor() {
        let t = MoneyToLocalizedString::new(Locale::new("en"));
        assert_eq!(t.transform(&Value::Float(12.5)).unwrap(), Value::from("12.50"));
        assert_eq!(t.reverse_transform(&Value::from("12.345")).unwrap(), Value::Float(12.35));
    }

    #[test]
    fn test_money_with_grouping_and_zero_scale() {
        let t = MoneyToLocalizedString::new(Locale::new("en"))
            .with_scale(0)
            .with_grouping(true);
        assert_eq!(t.transform(&Value::Float(1234.5)).unwrap(), Value::from("1,235"));
        assert_eq!(t.reverse_transform(&Value::from("1,234")).unwrap(), Value::Int(1234));
    }

    #[test]
    fn test_money_builders_chain_after_divisor() {
        let t = MoneyToLocalizedString::new(Locale::new("en"))
            .with_divisor(NonZeroU32::new(100).unwrap())
            .with_scale(3)
            .with_grouping(true)
            .with_rounding_mode(RoundingMode::Down);
        assert_eq!(t.transform(&Value::Int(123_456_789)).unwrap(), Value::from("1,234,567.890"));
        assert_eq!(t.reverse_transform(&Value::from("1.23456")).unwrap(), Value::Float(123.4));
    }

    // ── User-facing messages ────────────────────────────────────────

    #[test]
    fn test_parse_failures_carry_invalid_message() {
        let err = number("en").reverse_transform(&Value::from("12foo")).unwrap_err();
        assert_eq!(err.message(), "The number contains unrecognized characters: \"foo\".");
        assert_eq!(err.invalid_message(), Some("Please enter a valid number."));
        match err {
            FormError::TransformationFailed(failure) => {
                assert_eq!(failure.invalid_message_parameters["{{ value }}"], "12foo");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = number("en").reverse_transform(&Value::from("NaN")).unwrap_err();
        assert_eq!(err.invalid_message(), Some("Please enter a valid number."));

        let err = IntegerToLocalizedString::new(Locale::new("de_AT"))
            .reverse_transform(&Value::from("1,5"))
            .unwrap_err();
        assert_eq!(err.invalid_message(), Some("Please enter an integer."));
    }

    #[test]
    fn test_type_errors_have_no_invalid_message() {
        let err = number("en").reverse_transform(&Value::Int(1)).unwrap_err();
        assert_eq!(err.message(), "Expected a string.");
        assert_eq!(err.invalid_message(), None);
    }
}
