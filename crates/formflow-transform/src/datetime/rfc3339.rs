//! Date-times as RFC 3339 strings.

use chrono::{DateTime, SecondsFormat};
use once_cell::sync::Lazy;
use regex::Regex;

use formflow_core::{FormError, FormResult, Value};

use super::{check_date, expect_datetime, TimezonePair};
use crate::transformer::DataTransformer;

static RFC3339: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(\d{4})-(\d{2})-(\d{2})T(\d{2}:\d{2})(:\d{2})?(\.\d+)?(Z|[+-]\d{2}:\d{2})$")
        .expect("valid regex")
});

/// Transforms between a date-time and an RFC 3339 string.
///
/// UTC offsets are written as `Z`. Seconds may be omitted in the view.
///
/// ```
/// use chrono::TimeZone;
/// use chrono_tz::Tz;
/// use formflow_core::Value;
/// use formflow_transform::datetime::DateTimeToRfc3339;
/// use formflow_transform::transformer::DataTransformer;
///
/// let t = DateTimeToRfc3339::new(None, None).unwrap();
/// let dt = Tz::UTC.with_ymd_and_hms(2010, 2, 3, 4, 5, 6).unwrap();
/// assert_eq!(t.transform(&Value::DateTime(dt)).unwrap(), Value::from("2010-02-03T04:05:06Z"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeToRfc3339 {
    zones: TimezonePair,
}

impl DateTimeToRfc3339 {
    pub fn new(input_timezone: Option<&str>, output_timezone: Option<&str>) -> FormResult<Self> {
        Ok(Self {
            zones: TimezonePair::new(input_timezone, output_timezone)?,
        })
    }
}

impl DataTransformer for DateTimeToRfc3339 {
    fn transform(&self, value: &Value) -> FormResult<Value> {
        if value.is_null() {
            return Ok(Value::from(""));
        }
        let dt = self.zones.to_output(expect_datetime(value)?);
        Ok(Value::String(dt.to_rfc3339_opts(SecondsFormat::Secs, true)))
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
        let caps = RFC3339.captures(s).ok_or_else(invalid)?;
        check_date(&caps[1], &caps[2], &caps[3])?;

        let normalized = format!(
            "{}-{}-{}T{}{}{}{}",
            &caps[1],
            &caps[2],
            &caps[3],
            &caps[4],
            caps.get(5).map_or(":00", |m| m.as_str()),
            caps.get(6).map_or("", |m| m.as_str()),
            caps[7].to_ascii_uppercase(),
        );
        let dt = DateTime::parse_from_rfc3339(&normalized).map_err(|_| invalid())?;
        Ok(Value::DateTime(self.zones.to_input(&dt)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Tz;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> Value {
        Value::DateTime(Tz::UTC.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap())
    }

    #[test]
    fn test_transform() {
        let cases = [
            ("UTC", "UTC", "2010-02-03T04:05:06Z"),
            ("UTC", "America/New_York", "2010-02-02T23:05:06-05:00"),
            ("UTC", "Asia/Hong_Kong", "2010-02-03T12:05:06+08:00"),
        ];
        for (input, output, expected) in cases {
            let t = DateTimeToRfc3339::new(Some(input), Some(output)).unwrap();
            assert_eq!(t.transform(&utc(2010, 2, 3, 4, 5, 6)).unwrap(), Value::from(expected));
        }
        let t = DateTimeToRfc3339::default();
        assert_eq!(t.transform(&Value::Null).unwrap(), Value::from(""));
    }

    #[test]
    fn test_transform_requires_datetime() {
        let err = DateTimeToRfc3339::default().transform(&Value::from("2010-01-01")).unwrap_err();
        assert_eq!(err.message(), "Expected a DateTime.");
    }

    #[test]
    fn test_reverse_transform() {
        let t = DateTimeToRfc3339::default();
        let cases = [
            "2010-02-03T04:05:06Z",
            "2010-02-03t04:05:06z",
            "2010-02-02T23:05:06-05:00",
            "2010-02-03T12:05:06+08:00",
        ];
        for input in cases {
            assert_eq!(t.reverse_transform(&Value::from(input)).unwrap(), utc(2010, 2, 3, 4, 5, 6), "{input}");
        }
        assert_eq!(
            t.reverse_transform(&Value::from("2010-02-03T04:05Z")).unwrap(),
            utc(2010, 2, 3, 4, 5, 0)
        );
    }

    #[test]
    fn test_reverse_transform_to_input_zone() {
        let t = DateTimeToRfc3339::new(Some("Asia/Hong_Kong"), None).unwrap();
        let Value::DateTime(dt) = t.reverse_transform(&Value::from("2010-02-03T04:05:06Z")).unwrap() else {
            panic!("expected a date-time");
        };
        assert_eq!(dt.timezone(), Tz::Asia__Hong_Kong);
        assert_eq!(dt.to_rfc3339(), "2010-02-03T12:05:06+08:00");
    }

    #[test]
    fn test_reverse_transform_empty() {
        let t = DateTimeToRfc3339::default();
        assert_eq!(t.reverse_transform(&Value::from("")).unwrap(), Value::Null);
        assert_eq!(t.reverse_transform(&Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn test_reverse_transform_expects_string() {
        let err = DateTimeToRfc3339::default().reverse_transform(&Value::Int(12345)).unwrap_err();
        assert_eq!(err.message(), "Expected a string.");
    }

    #[test]
    fn test_reverse_transform_with_non_existing_date() {
        let err = DateTimeToRfc3339::default()
            .reverse_transform(&Value::from("2010-04-31T04:05Z"))
            .unwrap_err();
        assert_eq!(err.message(), "The date \"2010-04-31\" is not a valid date.");
    }

    #[test]
    fn test_reverse_transform_invalid_strings() {
        let t = DateTimeToRfc3339::default();
        for input in ["2010-2010-2010", "x", "2010-01-01T25:00Z", "2010-01-01 04:05:06Z"] {
            let err = t.reverse_transform(&Value::from(input)).unwrap_err();
            assert_eq!(err.message(), format!("The date \"{input}\" is not a valid date."));
        }
    }
}
