//! Booleans as checkbox strings.

use formflow_core::{FormError, FormResult, Value};

use crate::transformer::DataTransformer;

/// Transforms between a boolean and the string a checkbox submits.
///
/// `true` renders as the true value and `false` (or `Null`) as `""`.
/// Reading back, any of the false values means `false` and every other
/// string means `true`.
#[derive(Debug, Clone)]
pub struct BooleanToString {
    true_value: String,
    false_values: Vec<Value>,
}

impl Default for BooleanToString {
    fn default() -> Self {
        Self {
            true_value: "1".to_string(),
            false_values: vec![Value::Null, Value::from("")],
        }
    }
}

impl BooleanToString {
    /// Creates a transformer with custom tokens.
    ///
    /// Fails when the true value is one of the false values.
    pub fn new(true_value: impl Into<String>, false_values: Vec<Value>) -> FormResult<Self> {
        let true_value = true_value.into();
        if false_values.iter().any(|v| v.as_str() == Some(true_value.as_str())) {
            return Err(FormError::InvalidArgument(
                "The specified \"true\" value is contained in the false-values.".to_string(),
            ));
        }
        Ok(Self {
            true_value,
            false_values,
        })
    }

    pub fn true_value(&self) -> &str {
        &self.true_value
    }

    pub fn false_values(&self) -> &[Value] {
        &self.false_values
    }
}

impl DataTransformer for BooleanToString {
    fn transform(&self, value: &Value) -> FormResult<Value> {
        match value {
            Value::Bool(true) => Ok(Value::from(self.true_value.as_str())),
            Value::Bool(false) | Value::Null => Ok(Value::from("")),
            _ => Err(FormError::transformation_failed("Expected a Boolean.")),
        }
    }

    fn reverse_transform(&self, value: &Value) -> FormResult<Value> {
        if self.false_values.contains(value) {
            return Ok(Value::Bool(false));
        }
        if !matches!(value, Value::String(_)) {
            return Err(FormError::transformation_failed("Expected a string."));
        }
        Ok(Value::Bool(true))
    }
}
