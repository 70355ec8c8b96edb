//! UUIDs and ULIDs as their canonical strings.
//!
//! UUIDs render in lowercase hyphenated form and ULIDs in Crockford
//! base32. Reading back accepts any form the underlying parser does.

use std::str::FromStr;

use formflow_core::{FormError, FormResult, Value};

use crate::transformer::DataTransformer;

/// Reads a non-empty string view value, mapping `Null` and `""` to `None`.
fn view_str(value: &Value) -> FormResult<Option<&str>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s)),
        _ => Err(FormError::transformation_failed("Expected a string.")),
    }
}

fn parse_id<T: FromStr>(s: &str, kind: &str) -> FormResult<T> {
    s.parse()
        .map_err(|_| FormError::transformation_failed(format!("The value \"{s}\" is not a valid {kind}.")))
}

/// Transforms between a [`Value::Uuid`] and its string form.
///
/// ```
/// use formflow_core::Value;
/// use formflow_transform::identifier::UuidToString;
/// use formflow_transform::transformer::DataTransformer;
///
/// let id = uuid::Uuid::nil();
/// let s = UuidToString.transform(&Value::Uuid(id)).unwrap();
/// assert_eq!(s, Value::from("00000000-0000-0000-0000-000000000000"));
/// assert_eq!(UuidToString.reverse_transform(&s).unwrap(), Value::Uuid(id));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidToString;

impl DataTransformer for UuidToString {
    fn transform(&self, value: &Value) -> FormResult<Value> {
        match value {
            Value::Null => Ok(Value::from("")),
            Value::Uuid(id) => Ok(Value::String(id.hyphenated().to_string())),
            _ => Err(FormError::transformation_failed("Expected a Uuid.")),
        }
    }

    fn reverse_transform(&self, value: &Value) -> FormResult<Value> {
        view_str(value)?.map_or(Ok(Value::Null), |s| parse_id(s, "UUID").map(Value::Uuid))
    }
}

/// Transforms between a [`Value::Ulid`] and its base32 string.
#[derive(Debug, Clone, Copy, Default)]
pub struct UlidToString;

impl DataTransformer for UlidToString {
    fn transform(&self, value: &Value) -> FormResult<Value> {
        match value {
            Value::Null => Ok(Value::from("")),
            Value::Ulid(id) => Ok(Value::String(id.to_string())),
            _ => Err(FormError::transformation_failed("Expected a Ulid.")),
        }
    }

    fn reverse_transform(&self, value: &Value) -> FormResult<Value> {
        view_str(value)?.map_or(Ok(Value::Null), |s| parse_id(s, "ULID").map(Value::Ulid))
    }
}
