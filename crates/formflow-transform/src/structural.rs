//! Transformers that reshape values without interpreting them.
//!
//! - [`ArrayToDelimitedString`] joins a list into one string and splits it back
//! - [`ArrayToParts`] splits a flat map into named sub-maps
//! - [`ValueToDuplicates`] copies one value under several keys, such as a
//!   password and its confirmation

use indexmap::IndexMap;

use formflow_core::{FormError, FormResult, Value};

use crate::transformer::DataTransformer;

fn quoted_list(keys: &[&str]) -> String {
    keys.join("\", \"")
}

// ============================================================
// ArrayToDelimitedString
// ============================================================

/// Transforms between a list and a delimited string.
///
/// Splitting trims every element and drops empty ones, so `"a, ,b"` reads
/// as `["a", "b"]`.
///
/// ```
/// use formflow_core::Value;
/// use formflow_transform::structural::ArrayToDelimitedString;
/// use formflow_transform::transformer::DataTransformer;
///
/// let t = ArrayToDelimitedString::default();
/// assert_eq!(t.transform(&Value::list(["a", "b"])).unwrap(), Value::from("a,b"));
/// assert_eq!(t.reverse_transform(&Value::from(" a , ,b ")).unwrap(), Value::list(["a", "b"]));
/// ```
#[derive(Debug, Clone)]
pub struct ArrayToDelimitedString {
    delimiter: String,
}

impl Default for ArrayToDelimitedString {
    fn default() -> Self {
        Self::new(",")
    }
}

impl ArrayToDelimitedString {
    pub fn new(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
        }
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }
}

impl DataTransformer for ArrayToDelimitedString {
    fn transform(&self, value: &Value) -> FormResult<Value> {
        match value {
            Value::Null => Ok(Value::from("")),
            Value::List(items) => Ok(Value::String(
                items
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(&self.delimiter),
            )),
            other => Err(FormError::unexpected_type("array", other.type_name())),
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
        let items = s
            .split(self.delimiter.as_str())
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(Value::from)
            .collect();
        Ok(Value::List(items))
    }
}

// ============================================================
// ArrayToParts
// ============================================================

/// Transforms between a flat map and a map of named parts.
///
/// Each part lists the keys of the flat map it holds. Reading the parts back
/// succeeds when every part is filled and yields `Null` when all are empty;
/// a mix of filled and empty parts is a failure.
///
/// ```
/// use formflow_core::Value;
/// use formflow_transform::structural::ArrayToParts;
/// use formflow_transform::transformer::DataTransformer;
///
/// let t = ArrayToParts::default()
///     .with_part("first", ["a", "b"])
///     .with_part("second", ["c"]);
/// let flat = Value::map([("a", "1"), ("b", "2"), ("c", "3")]);
/// let parts = t.transform(&flat).unwrap();
/// assert_eq!(parts.get("second"), Some(&Value::map([("c", "3")])));
/// assert_eq!(t.reverse_transform(&parts).unwrap(), flat);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArrayToParts {
    parts: IndexMap<String, Vec<String>>,
}

impl ArrayToParts {
    pub const fn new(parts: IndexMap<String, Vec<String>>) -> Self {
        Self { parts }
    }

    /// Adds a part holding the given keys.
    #[must_use]
    pub fn with_part<K, I>(mut self, name: impl Into<String>, keys: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = K>,
    {
        self.parts
            .insert(name.into(), keys.into_iter().map(Into::into).collect());
        self
    }

    pub const fn parts(&self) -> &IndexMap<String, Vec<String>> {
        &self.parts
    }
}

impl DataTransformer for ArrayToParts {
    fn transform(&self, value: &Value) -> FormResult<Value> {
        let empty = IndexMap::new();
        let map = match value {
            Value::Null => &empty,
            Value::Map(map) => map,
            _ => return Err(FormError::transformation_failed("Expected an array.")),
        };

        let result = self
            .parts
            .iter()
            .map(|(part, keys)| {
                let v = if map.is_empty() {
                    Value::Null
                } else {
                    Value::Map(
                        map.iter()
                            .filter(|(k, _)| keys.contains(k))
                            .map(|(k, v)| (k.clone(), v.clone()))
                            .collect(),
                    )
                };
                (part.clone(), v)
            })
            .collect();
        Ok(Value::Map(result))
    }

    fn reverse_transform(&self, value: &Value) -> FormResult<Value> {
        let map = match value {
            Value::Null => return Ok(Value::Null),
            Value::Map(map) => map,
            _ => return Err(FormError::transformation_failed("Expected an array.")),
        };

        let mut result = IndexMap::new();
        let mut empty_parts = Vec::new();
        for part in self.parts.keys() {
            match map.get(part).filter(|v| !v.is_empty()) {
                Some(Value::Map(filled)) => {
                    result.extend(filled.iter().map(|(k, v)| (k.clone(), v.clone())));
                }
                Some(_) => {
                    return Err(FormError::transformation_failed(format!(
                        "The part \"{part}\" is expected to be an array."
                    )))
                }
                None => empty_parts.push(part.as_str()),
            }
        }

        if empty_parts.is_empty() {
            return Ok(Value::Map(result));
        }
        if empty_parts.len() == self.parts.len() {
            return Ok(Value::Null);
        }
        Err(FormError::transformation_failed(format!(
            "The keys \"{}\" should not be empty.",
            quoted_list(&empty_parts)
        )))
    }
}

// ============================================================
// ValueToDuplicates
// ============================================================

/// Transforms between one value and a map holding copies of it.
///
/// Reading the map back requires every filled copy to be identical. A copy
/// is empty when it is absent, `Null`, `false`, or an empty list.
#[derive(Debug, Clone)]
pub struct ValueToDuplicates {
    keys: Vec<String>,
}

impl ValueToDuplicates {
    pub fn new<K, I>(keys: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = K>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}

fn is_unset(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null | Value::Bool(false)) => true,
        Some(Value::List(items)) => items.is_empty(),
        Some(_) => false,
    }
}

impl DataTransformer for ValueToDuplicates {
    fn transform(&self, value: &Value) -> FormResult<Value> {
        Ok(Value::Map(
            self.keys
                .iter()
                .map(|k| (k.clone(), value.clone()))
                .collect(),
        ))
    }

    fn reverse_transform(&self, value: &Value) -> FormResult<Value> {
        let map = match value {
            Value::Null => return Ok(Value::Null),
            Value::Map(map) => map,
            _ => return Err(FormError::transformation_failed("Expected an array.")),
        };

        let first = map.values().next();
        let mut empty_keys = Vec::new();
        for key in &self.keys {
            let copy = map.get(key);
            if is_unset(copy) {
                empty_keys.push(key.as_str());
            } else if copy != first {
                return Err(FormError::transformation_failed(
                    "All values in the array should be the same.",
                ));
            }
        }

        if empty_keys.is_empty() {
            return Ok(first.cloned().unwrap_or(Value::Null));
        }
        if empty_keys.len() == self.keys.len() {
            return Ok(Value::Null);
        }
        Err(FormError::transformation_failed(format!(
            "The keys \"{}\" should not be empty.",
            quoted_list(&empty_keys)
        )))
    }
}
