//! Date-times as Unix timestamps.

use chrono::DateTime;

use formflow_core::{FormError, FormResult, Value};

use super::{expect_datetime, TimezonePair};
use crate::transformer::DataTransformer;

/// Transforms between a date-time and its Unix timestamp in seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeToTimestamp {
    zones: TimezonePair,
}

impl DateTimeToTimestamp {
    pub fn new(input_timezone: Option<&str>, output_timezone: Option<&str>) -> FormResult<Self> {
        Ok(Self {
            zones: TimezonePair::new(input_timezone, output_timezone)?,
        })
    }
}

impl DataTransformer for DateTimeToTimestamp {
    fn transform(&self, value: &Value) -> FormResult<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        Ok(Value::Int(expect_datetime(value)?.timestamp()))
    }

    #[allow(clippy::cast_possible_truncation)]
    fn reverse_transform(&self, value: &Value) -> FormResult<Value> {
        let seconds = match value {
            Value::Null => return Ok(Value::Null),
            Value::Int(i) => *i,
            other => other
                .as_f64()
                .map(|f| f.trunc() as i64)
                .ok_or_else(|| FormError::transformation_failed("Expected a numeric."))?,
        };
        let utc = DateTime::from_timestamp(seconds, 0).ok_or_else(|| {
            FormError::transformation_failed(format!("The timestamp \"{seconds}\" is out of range."))
        })?;
        Ok(Value::DateTime(self.zones.to_input(&utc)))
    }
}
