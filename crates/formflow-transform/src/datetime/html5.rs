//! Date-times as HTML5 `datetime-local` strings.

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

use formflow_core::{FormError, FormResult, Value};

use super::{check_date, expect_datetime, TimezonePair};
use crate::transformer::DataTransformer;

static LOCAL_DATE_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})-(\d{2})-(\d{2})[T ](\d{2}:\d{2}(?::\d{2})?)$").expect("valid regex")
});

/// Transforms between a date-time and a local date-time string such as
/// `2010-02-03T04:05`.
///
/// Seconds are written only when enabled but always accepted. A space may
/// separate date and time in the view.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeToHtml5LocalDateTime {
    zones: TimezonePair,
    with_seconds: bool,
}

impl DateTimeToHtml5LocalDateTime {
    pub fn new(input_timezone: Option<&str>, output_timezone: Option<&str>) -> FormResult<Self> {
        Ok(Self {
            zones: TimezonePair::new(input_timezone, output_timezone)?,
            with_seconds: false,
        })
    }

    #[must_use]
    pub const fn with_seconds(mut self, with_seconds: bool) -> Self {
        self.with_seconds = with_seconds;
        self
    }
}

impl DataTransformer for DateTimeToHtml5LocalDateTime {
    fn transform(&self, value: &Value) -> FormResult<Value> {
        if value.is_null() {
            return Ok(Value::from(""));
        }
        let dt = self.zones.to_output(expect_datetime(value)?);
        let format = if self.with_seconds {
            "%Y-%m-%dT%H:%M:%S"
        } else {
            "%Y-%m-%dT%H:%M"
        };
        Ok(Value::String(dt.format(format).to_string()))
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

        let invalid = || FormError::transformation_failed(format!("The date \"{s}\" is not a valid date."));
        let caps = LOCAL_DATE_TIME.captures(s).ok_or_else(invalid)?;
        let date = check_date(&caps[1], &caps[2], &caps[3])?;

        let time = &caps[4];
        let naive = if time.len() == 5 {
            NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M")
        } else {
            NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M:%S")
        }
        .map_err(|_| invalid())?;

        Ok(Value::DateTime(self.zones.from_output_local(naive)))
    }
}
