//! Numeric strings stored in the model, floats in the view.

use formflow_core::rounding::{normalize_precision, round_decimal_str, RoundingMode};
use formflow_core::{FormError, FormResult, Value};

use crate::transformer::DataTransformer;

/// Transforms between a numeric string and a float.
///
/// ```
/// use formflow_core::Value;
/// use formflow_transform::number::StringToFloat;
/// use formflow_transform::transformer::DataTransformer;
///
/// let t = StringToFloat::new(Some(2));
/// assert_eq!(t.transform(&Value::from("1.5")).unwrap(), Value::Float(1.5));
/// assert_eq!(t.reverse_transform(&Value::Float(1.5)).unwrap(), Value::from("1.50"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct StringToFloat {
    scale: Option<u32>,
}

impl StringToFloat {
    pub const fn new(scale: Option<u32>) -> Self {
        Self { scale }
    }
}

impl DataTransformer for StringToFloat {
    fn transform(&self, value: &Value) -> FormResult<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::String(_) => value
                .as_f64()
                .map(Value::Float)
                .ok_or_else(|| FormError::transformation_failed("Expected a numeric string.")),
            _ => Err(FormError::transformation_failed("Expected a numeric string.")),
        }
    }

    fn reverse_transform(&self, value: &Value) -> FormResult<Value> {
        let number = match value {
            Value::Null => return Ok(Value::Null),
            Value::Int(_) | Value::Float(_) => value.as_f64().unwrap_or_default(),
            _ => return Err(FormError::transformation_failed("Expected a float.")),
        };
        if !number.is_finite() {
            return Err(FormError::transformation_failed("Expected a finite float."));
        }
        let repr = normalize_precision(number).to_string();
        Ok(Value::String(match self.scale {
            Some(scale) => round_decimal_str(&repr, scale as usize, RoundingMode::HalfUp),
            None => repr,
        }))
    }
}
