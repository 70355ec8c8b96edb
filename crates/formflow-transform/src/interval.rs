//! Interval transformers.
//!
//! [`DateIntervalToArray`] maps a [`DateInterval`] to a map of amount
//! strings and an `invert` flag; [`DateIntervalToString`] maps it to an
//! ISO-8601 duration in a configurable `%` format.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use formflow_core::{DateInterval, FormError, FormResult, Value};

use crate::transformer::DataTransformer;

// ============================================================
// DateIntervalToArray
// ============================================================

/// One component of an interval as shown in the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IntervalField {
    Years,
    Months,
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
    Invert,
}

impl IntervalField {
    pub const ALL: [Self; 8] = [
        Self::Years,
        Self::Months,
        Self::Weeks,
        Self::Days,
        Self::Hours,
        Self::Minutes,
        Self::Seconds,
        Self::Invert,
    ];

    /// The fields shown when none are configured: everything but weeks.
    pub const DEFAULT: [Self; 7] = [
        Self::Years,
        Self::Months,
        Self::Days,
        Self::Hours,
        Self::Minutes,
        Self::Seconds,
        Self::Invert,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Years => "years",
            Self::Months => "months",
            Self::Weeks => "weeks",
            Self::Days => "days",
            Self::Hours => "hours",
            Self::Minutes => "minutes",
            Self::Seconds => "seconds",
            Self::Invert => "invert",
        }
    }
}

impl fmt::Display for IntervalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntervalField {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| FormError::InvalidArgument(format!("Unknown interval field \"{s}\".")))
    }
}

/// Transforms between a [`DateInterval`] and a map of its components.
///
/// When weeks are shown, days are split into whole weeks and the remaining
/// days; reading the map back adds them up again.
///
/// # Examples
///
/// ```
/// use formflow_core::Value;
/// use formflow_transform::interval::{DateIntervalToArray, IntervalField};
/// use formflow_transform::transformer::DataTransformer;
///
/// let t = DateIntervalToArray::new()
///     .with_fields([IntervalField::Years, IntervalField::Minutes, IntervalField::Seconds]);
/// let interval = Value::Interval("P1Y2M3DT4H5M6S".parse().unwrap());
/// assert_eq!(
///     t.transform(&interval).unwrap(),
///     Value::map([("years", "1"), ("minutes", "5"), ("seconds", "6")])
/// );
/// ```
#[derive(Debug, Clone)]
pub struct DateIntervalToArray {
    fields: Vec<IntervalField>,
    pad: bool,
}

impl Default for DateIntervalToArray {
    fn default() -> Self {
        Self::new()
    }
}

impl DateIntervalToArray {
    pub fn new() -> Self {
        Self {
            fields: IntervalField::DEFAULT.to_vec(),
            pad: false,
        }
    }

    #[must_use]
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = IntervalField>) -> Self {
        let mut fields: Vec<IntervalField> = fields.into_iter().collect();
        fields.sort_unstable();
        fields.dedup();
        self.fields = fields;
        self
    }

    /// Zero-pads amounts other than weeks to two digits.
    #[must_use]
    pub const fn with_pad(mut self, pad: bool) -> Self {
        self.pad = pad;
        self
    }

    fn has(&self, field: IntervalField) -> bool {
        self.fields.contains(&field)
    }

    fn amount(&self, n: u32) -> Value {
        Value::String(if self.pad { format!("{n:02}") } else { n.to_string() })
    }

    /// Reads a digit-only amount. Absent and empty amounts count as zero.
    fn read(map: &IndexMap<String, Value>, field: IntervalField) -> FormResult<u32> {
        let invalid =
            || FormError::transformation_failed(format!("This amount of \"{field}\" is invalid."));
        match map.get(field.as_str()) {
            None | Some(Value::Null) => Ok(0),
            Some(v) if v.to_string().is_empty() => Ok(0),
            Some(v) if v.is_digit_string() => v.to_string().parse().map_err(|_| invalid()),
            Some(_) => Err(invalid()),
        }
    }
}

impl DataTransformer for DateIntervalToArray {
    fn transform(&self, value: &Value) -> FormResult<Value> {
        let interval = match value {
            Value::Null => {
                let map = self
                    .fields
                    .iter()
                    .map(|f| {
                        let empty = if *f == IntervalField::Invert {
                            Value::Bool(false)
                        } else {
                            Value::from("")
                        };
                        (f.as_str().to_string(), empty)
                    })
                    .collect();
                return Ok(Value::Map(map));
            }
            Value::Interval(interval) => interval,
            other => return Err(FormError::unexpected_type("DateInterval", other.type_name())),
        };

        let (weeks, days) = if self.has(IntervalField::Weeks) {
            (interval.days / 7, interval.days % 7)
        } else {
            (0, interval.days)
        };

        let map = self
            .fields
            .iter()
            .map(|field| {
                let v = match field {
                    IntervalField::Years => self.amount(interval.years),
                    IntervalField::Months => self.amount(interval.months),
                    IntervalField::Weeks => Value::String(weeks.to_string()),
                    IntervalField::Days => self.amount(days),
                    IntervalField::Hours => self.amount(interval.hours),
                    IntervalField::Minutes => self.amount(interval.minutes),
                    IntervalField::Seconds => self.amount(interval.seconds),
                    IntervalField::Invert => Value::Bool(interval.invert),
                };
                (field.as_str().to_string(), v)
            })
            .collect();
        Ok(Value::Map(map))
    }

    fn reverse_transform(&self, value: &Value) -> FormResult<Value> {
        let map = match value {
            Value::Null => return Ok(Value::Null),
            Value::Map(map) => map,
            other => return Err(FormError::unexpected_type("array", other.type_name())),
        };
        if map.values().all(|v| v.to_string().is_empty()) {
            return Ok(Value::Null);
        }

        let missing: Vec<&str> = self
            .fields
            .iter()
            .filter(|f| !value.has_set(f.as_str()))
            .map(|f| f.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(FormError::transformation_failed(format!(
                "The fields \"{}\" should not be empty.",
                missing.join("\", \"")
            )));
        }

        let invert = match map.get("invert") {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(_) => {
                return Err(FormError::transformation_failed(
                    "The value of \"invert\" must be boolean.",
                ))
            }
        };

        let weeks = Self::read(map, IntervalField::Weeks)?;
        let interval = DateInterval::new(
            Self::read(map, IntervalField::Years)?,
            Self::read(map, IntervalField::Months)?,
            Self::read(map, IntervalField::Days)?.saturating_add(weeks.saturating_mul(7)),
            Self::read(map, IntervalField::Hours)?,
            Self::read(map, IntervalField::Minutes)?,
            Self::read(map, IntervalField::Seconds)?,
        )
        .with_invert(invert);

        Ok(Value::Interval(interval))
    }
}

// ============================================================
// DateIntervalToString
// ============================================================

/// The format used when none is given.
pub const DEFAULT_INTERVAL_FORMAT: &str = "P%yY%mM%dDT%hH%iM%sS";

static ISO8601_DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^P(?:(?:\d+|%[yY])Y)?(?:(?:\d+|%[mM])M)?(?:(?:\d+|%[wW])W)?(?:(?:\d+|%[dD])D)?",
        r"(?:T(?:(?:\d+|%[hH])H)?(?:(?:\d+|%[iI])M)?(?:(?:\d+|%[sS])S)?)?$",
    ))
    .expect("valid regex")
});

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"%([yYmMdDhHiIsSwW])(\w)").expect("valid regex"));

/// Returns `true` for ISO-8601 durations, where `%` placeholders may stand
/// in for amounts.
fn is_iso8601(s: &str) -> bool {
    ISO8601_DURATION.is_match(s)
        && s[1..].chars().any(|c| c.is_ascii_digit() || c == '%')
}

/// Transforms between a [`DateInterval`] and an ISO-8601 duration string.
///
/// The format decides both how intervals are rendered and which components
/// a parsed duration may contain.
///
/// ```
/// use formflow_core::{DateInterval, Value};
/// use formflow_transform::interval::DateIntervalToString;
/// use formflow_transform::transformer::DataTransformer;
///
/// let t = DateIntervalToString::new("P%yY%mM%dD").unwrap();
/// let interval = Value::Interval(DateInterval::new(1, 2, 3, 0, 0, 0));
/// assert_eq!(t.transform(&interval).unwrap(), Value::from("P1Y2M3D"));
/// assert!(t.reverse_transform(&Value::from("PT4H")).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct DateIntervalToString {
    format: String,
    pattern: Regex,
}

impl Default for DateIntervalToString {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL_FORMAT).expect("default format compiles")
    }
}

impl DateIntervalToString {
    pub fn new(format: &str) -> FormResult<Self> {
        let source = format!("^{}$", PLACEHOLDER.replace_all(format, r"(?P<${1}>\d+)${2}"));
        let pattern = Regex::new(&source).map_err(|e| {
            FormError::InvalidArgument(format!("The format \"{format}\" cannot be matched: {e}"))
        })?;
        Ok(Self {
            format: format.to_string(),
            pattern,
        })
    }

    pub fn format(&self) -> &str {
        &self.format
    }
}

impl DataTransformer for DateIntervalToString {
    fn transform(&self, value: &Value) -> FormResult<Value> {
        match value {
            Value::Null => Ok(Value::from("")),
            Value::Interval(interval) => Ok(Value::String(interval.format(&self.format))),
            other => Err(FormError::unexpected_type("DateInterval", other.type_name())),
        }
    }

    fn reverse_transform(&self, value: &Value) -> FormResult<Value> {
        let s = match value {
            Value::Null => return Ok(Value::Null),
            Value::String(s) => s,
            other => return Err(FormError::unexpected_type("string", other.type_name())),
        };
        if s.is_empty() {
            return Ok(Value::Null);
        }
        if !is_iso8601(s) {
            return Err(FormError::transformation_failed(
                "Non ISO 8601 duration strings are not supported.",
            ));
        }
        if !self.pattern.is_match(s) {
            return Err(FormError::transformation_failed(format!(
                "Value \"{s}\" contains intervals not accepted by format \"{}\".",
                self.format
            )));
        }
        let interval: DateInterval = s
            .parse()
            .map_err(|e: FormError| FormError::transformation_failed(e.message()))?;
        Ok(Value::Interval(interval))
    }
}
