//! Time zones as IANA names.

use formflow_core::timezone::parse_timezone;
use formflow_core::{FormError, FormResult, Value};

use crate::transformer::DataTransformer;

/// Transforms between a time zone (or a list of them) and its name.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeZoneToString {
    multiple: bool,
}

impl DateTimeZoneToString {
    pub const fn new(multiple: bool) -> Self {
        Self { multiple }
    }

    fn zone_name(value: &Value) -> FormResult<Value> {
        match value {
            Value::TimeZone(tz) => Ok(Value::from(tz.name())),
            other => Err(FormError::unexpected_type("DateTimeZone", other.type_name())),
        }
    }

    fn zone(value: &Value) -> FormResult<Value> {
        let Value::String(name) = value else {
            return Err(FormError::unexpected_type("string", value.type_name()));
        };
        parse_timezone(name)
            .map(Value::TimeZone)
            .map_err(|e| FormError::transformation_failed(e.message()))
    }

    fn each(&self, value: &Value, f: fn(&Value) -> FormResult<Value>) -> FormResult<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        if !self.multiple {
            return f(value);
        }
        match value {
            Value::List(items) => items.iter().map(f).collect::<FormResult<Vec<_>>>().map(Value::List),
            other => Err(FormError::unexpected_type("array", other.type_name())),
        }
    }
}

impl DataTransformer for DateTimeZoneToString {
    fn transform(&self, value: &Value) -> FormResult<Value> {
        self.each(value, Self::zone_name)
    }

    fn reverse_transform(&self, value: &Value) -> FormResult<Value> {
        self.each(value, Self::zone)
    }
}
