//! Date-times as formatted strings.

use chrono::format::{parse, Item, Parsed, StrftimeItems};
use chrono::NaiveDateTime;

use formflow_core::{FormError, FormResult, Value};

use super::{expect_datetime, TimezonePair};
use crate::transformer::DataTransformer;

/// The format used when none is given.
pub const DEFAULT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Transforms between a date-time and a string in a `strftime` format.
///
/// Fields missing from the format are read as 1970-01-01 00:00:00, so a
/// date-only format parses to midnight, a time-only format to that time on
/// 1970-01-01, and `%Y-%m` to the first of the month.
///
/// ```
/// use chrono::TimeZone;
/// use chrono_tz::Tz;
/// use formflow_core::Value;
/// use formflow_transform::datetime::DateTimeToString;
/// use formflow_transform::transformer::DataTransformer;
///
/// let t = DateTimeToString::new(None, Some("Asia/Tokyo"), None).unwrap();
/// let dt = Tz::UTC.with_ymd_and_hms(2010, 2, 3, 4, 5, 6).unwrap();
/// assert_eq!(t.transform(&Value::DateTime(dt)).unwrap(), Value::from("2010-02-03 13:05:06"));
/// ```
#[derive(Debug, Clone)]
pub struct DateTimeToString {
    zones: TimezonePair,
    format: String,
}

impl DateTimeToString {
    /// Creates a transformer. `format` defaults to [`DEFAULT_FORMAT`].
    pub fn new(
        input_timezone: Option<&str>,
        output_timezone: Option<&str>,
        format: Option<&str>,
    ) -> FormResult<Self> {
        let format = format.unwrap_or(DEFAULT_FORMAT);
        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            return Err(FormError::InvalidArgument(format!(
                "The format \"{format}\" is not a valid date format."
            )));
        }
        Ok(Self {
            zones: TimezonePair::new(input_timezone, output_timezone)?,
            format: format.to_string(),
        })
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    /// Reads `s` in the configured format. Fields the format does not
    /// carry are taken from 1970-01-01 00:00:00.
    fn parse(&self, s: &str) -> Option<NaiveDateTime> {
        let mut parsed = Parsed::new();
        parse(&mut parsed, s, StrftimeItems::new(&self.format)).ok()?;
        if let Ok(dt) = parsed.to_naive_datetime_with_offset(0) {
            return Some(dt);
        }

        // Setters refuse to overwrite a parsed field, so only gaps are filled.
        if parsed.to_naive_date().is_err() {
            let _ = parsed.set_year(1970);
            let _ = parsed.set_month(1);
            let _ = parsed.set_day(1);
        }
        if parsed.to_naive_time().is_err() {
            let _ = parsed.set_hour(0);
            let _ = parsed.set_minute(0);
            let _ = parsed.set_second(0);
        }
        parsed.to_naive_datetime_with_offset(0).ok()
    }
}

impl DataTransformer for DateTimeToString {
    fn transform(&self, value: &Value) -> FormResult<Value> {
        if value.is_null() {
            return Ok(Value::from(""));
        }
        let dt = self.zones.to_output(expect_datetime(value)?);
        Ok(Value::String(dt.format(&self.format).to_string()))
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
        let naive = self.parse(s).ok_or_else(|| {
            FormError::transformation_failed(format!(
                "The date \"{s}\" does not match the format \"{}\".",
                self.format
            ))
            .with_invalid_message("Please enter a valid date and time.", s.as_str())
        })?;
        Ok(Value::DateTime(self.zones.from_output_local(naive)))
    }
}
