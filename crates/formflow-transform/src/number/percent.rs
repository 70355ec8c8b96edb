//! Percentages as localized strings.

use std::fmt;
use std::str::FromStr;

use formflow_core::locale::Locale;
use formflow_core::rounding::{normalize_precision, round_f64, RoundingMode};
use formflow_core::{FormError, FormResult, Value};

use super::{reject_nan, FractionDigits, NumberFormatter, ParsedNumber};
use crate::transformer::DataTransformer;

/// How a percentage is stored in the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PercentType {
    /// `0.15` is shown as `15`.
    #[default]
    Fractional,
    /// `15` is shown as `15`.
    Integer,
}

impl PercentType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fractional => "fractional",
            Self::Integer => "integer",
        }
    }
}

impl fmt::Display for PercentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PercentType {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fractional" => Ok(Self::Fractional),
            "integer" => Ok(Self::Integer),
            other => Err(FormError::InvalidArgument(format!(
                "The \"type\" option must be one of \"fractional\", \"integer\"; \"{other}\" given."
            ))),
        }
    }
}

/// Transforms between a percentage and a localized string.
///
/// # Examples
///
/// ```
/// use formflow_core::{locale::Locale, Value};
/// use formflow_transform::number::PercentToLocalizedString;
/// use formflow_transform::transformer::DataTransformer;
///
/// let t = PercentToLocalizedString::new(Locale::new("de_AT")).with_scale(2);
/// assert_eq!(t.transform(&Value::Float(0.1234)).unwrap(), Value::from("12,34"));
/// assert_eq!(t.reverse_transform(&Value::from("12,34")).unwrap(), Value::Float(0.1234));
/// ```
#[derive(Debug, Clone)]
pub struct PercentToLocalizedString {
    scale: u32,
    percent_type: PercentType,
    rounding_mode: Option<RoundingMode>,
    html5: bool,
    grouping: bool,
    locale: Locale,
}

impl PercentToLocalizedString {
    pub const fn new(locale: Locale) -> Self {
        Self {
            scale: 0,
            percent_type: PercentType::Fractional,
            rounding_mode: Some(RoundingMode::HalfUp),
            html5: false,
            grouping: true,
            locale,
        }
    }

    #[must_use]
    pub const fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }

    #[must_use]
    pub const fn with_type(mut self, percent_type: PercentType) -> Self {
        self.percent_type = percent_type;
        self
    }

    /// Sets the rounding mode; `None` leaves parsed values unrounded.
    #[must_use]
    pub const fn with_rounding_mode(mut self, rounding_mode: Option<RoundingMode>) -> Self {
        self.rounding_mode = rounding_mode;
        self
    }

    /// In HTML5 mode numbers are always written as `1234.5`.
    #[must_use]
    pub const fn with_html5_format(mut self, html5: bool) -> Self {
        self.html5 = html5;
        self
    }

    #[must_use]
    pub const fn with_grouping(mut self, grouping: bool) -> Self {
        self.grouping = grouping;
        self
    }

    fn formatter(&self) -> NumberFormatter {
        let mode = self.rounding_mode.unwrap_or(RoundingMode::HalfEven);
        let formatter = if self.html5 {
            NumberFormatter::new(Locale::new("en"))
        } else {
            NumberFormatter::new(self.locale.clone()).with_grouping(self.grouping)
        };
        formatter.with_fraction_digits(FractionDigits::Exact(self.scale), mode)
    }

    fn coefficient(&self) -> f64 {
        let coefficient = 10_f64.powi(i32::try_from(self.scale).unwrap_or(i32::MAX));
        match self.percent_type {
            PercentType::Fractional => coefficient * 100.0,
            PercentType::Integer => coefficient,
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
    fn round(&self, number: ParsedNumber) -> Value {
        let (Some(mode), ParsedNumber::Float(f)) = (self.rounding_mode, number) else {
            return match number {
                ParsedNumber::Int(i) => Value::Int(i),
                ParsedNumber::Float(f) => Value::Float(f),
            };
        };
        let coefficient = self.coefficient();
        if coefficient == 1.0 {
            Value::Int(round_f64(f, 1.0, mode) as i64)
        } else {
            Value::Float(round_f64(f, coefficient, mode))
        }
    }
}

impl DataTransformer for PercentToLocalizedString {
    fn transform(&self, value: &Value) -> FormResult<Value> {
        if value.is_null() {
            return Ok(Value::from(""));
        }
        if !value.is_numeric() {
            return Err(FormError::transformation_failed("Numeric argument required."));
        }
        let formatter = self.formatter();
        let formatted = match (self.percent_type, value) {
            (PercentType::Integer, v) => formatter.format_value(v)?,
            (PercentType::Fractional, v) => {
                let f = v.as_f64().unwrap_or_default();
                formatter.format_f64(normalize_precision(f * 100.0))
            }
        };
        Ok(Value::String(formatted))
    }

    fn reverse_transform(&self, value: &Value) -> FormResult<Value> {
        let s = match value {
            Value::Null => return Ok(Value::Null),
            Value::String(s) => s,
            _ => return Err(FormError::transformation_failed("Expected a string.")),
        };
        if s.is_empty() {
            return Ok(Value::Null);
        }
        let invalid =
            |err: FormError| err.with_invalid_message("Please enter a percentage value.", s);
        reject_nan(s).map_err(invalid)?;

        let number = match (self.percent_type, self.formatter().parse(s).map_err(invalid)?) {
            (PercentType::Fractional, n) => ParsedNumber::Float(n.as_f64() / 100.0),
            (PercentType::Integer, n) => n,
        };
        Ok(self.round(number))
    }
}
