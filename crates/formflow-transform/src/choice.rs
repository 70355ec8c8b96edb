//! Choice lists and the transformers that map choices to submitted values.
//!
//! A [`ChoiceList`] pairs every choice (any [`Value`]) with the string a
//! widget submits for it. [`ChoiceToValue`] maps a single selection and
//! [`ChoicesToValues`] a multiple one.

use indexmap::IndexMap;

use formflow_core::{FormError, FormResult, Value};

use crate::transformer::DataTransformer;

// ============================================================
// ChoiceList
// ============================================================

/// An ordered mapping from submitted values to choices.
///
/// Scalar choices whose string casts are unique are keyed by those casts
/// (`true` as `"1"`, `false` as `"0"`). Anything else is keyed by position.
///
/// ```
/// use formflow_core::Value;
/// use formflow_transform::choice::ChoiceList;
///
/// let list = ChoiceList::new([Value::from("a"), Value::Bool(false)]);
/// assert_eq!(list.values().collect::<Vec<_>>(), ["a", "0"]);
///
/// let list = ChoiceList::new([Value::Int(1), Value::from("1")]);
/// assert_eq!(list.values().collect::<Vec<_>>(), ["0", "1"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChoiceList {
    choices: IndexMap<String, Value>,
}

fn cast_value(choice: &Value) -> Option<String> {
    match choice {
        Value::Bool(false) => Some("0".to_string()),
        Value::Bool(true) | Value::Int(_) | Value::Float(_) | Value::String(_) => Some(choice.to_string()),
        _ => None,
    }
}

impl ChoiceList {
    /// Builds a list, generating values from the choices.
    pub fn new(choices: impl IntoIterator<Item = Value>) -> Self {
        let choices: Vec<Value> = choices.into_iter().collect();
        let casts: Option<IndexMap<String, Value>> = choices
            .iter()
            .map(|c| cast_value(c).map(|v| (v, c.clone())))
            .collect();

        let choices = match casts {
            Some(map) if map.len() == choices.len() => map,
            _ => choices
                .into_iter()
                .enumerate()
                .map(|(i, c)| (i.to_string(), c))
                .collect(),
        };
        Self { choices }
    }

    /// Builds a list from explicit `(value, choice)` pairs.
    pub fn from_pairs<K: Into<String>>(pairs: impl IntoIterator<Item = (K, Value)>) -> Self {
        Self {
            choices: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub const fn choices(&self) -> &IndexMap<String, Value> {
        &self.choices
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.choices.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// The values of the given choices, in the order given. Choices not in
    /// the list are skipped.
    pub fn get_values_for_choices(&self, choices: &[Value]) -> Vec<String> {
        choices
            .iter()
            .filter_map(|given| {
                self.choices
                    .iter()
                    .find(|(_, choice)| *choice == given)
                    .map(|(value, _)| value.clone())
            })
            .collect()
    }

    /// The choices for the given values, in the order given. Unknown values
    /// are skipped.
    pub fn get_choices_for_values(&self, values: &[String]) -> Vec<Value> {
        values
            .iter()
            .filter_map(|v| self.choices.get(v).cloned())
            .collect()
    }
}

// ============================================================
// ChoiceToValue
// ============================================================

/// Transforms between a single choice and its submitted value.
///
/// A choice missing from the list renders as `""`.
#[derive(Debug, Clone)]
pub struct ChoiceToValue {
    choice_list: ChoiceList,
}

impl ChoiceToValue {
    pub const fn new(choice_list: ChoiceList) -> Self {
        Self { choice_list }
    }
}

impl DataTransformer for ChoiceToValue {
    fn transform(&self, value: &Value) -> FormResult<Value> {
        let values = self.choice_list.get_values_for_choices(std::slice::from_ref(value));
        Ok(Value::String(values.into_iter().next().unwrap_or_default()))
    }

    fn reverse_transform(&self, value: &Value) -> FormResult<Value> {
        let submitted = match value {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            _ => return Err(FormError::transformation_failed("Expected a string or null.")),
        };
        let mut choices = self.choice_list.get_choices_for_values(std::slice::from_ref(&submitted));
        if choices.len() == 1 {
            return Ok(choices.remove(0));
        }
        if submitted.is_empty() {
            return Ok(Value::Null);
        }
        Err(FormError::transformation_failed(format!(
            "The choice \"{submitted}\" does not exist or is not unique."
        )))
    }
}

// ============================================================
// ChoicesToValues
// ============================================================

/// Transforms between a list of choices and the list of submitted values.
#[derive(Debug, Clone)]
pub struct ChoicesToValues {
    choice_list: ChoiceList,
}

impl ChoicesToValues {
    pub const fn new(choice_list: ChoiceList) -> Self {
        Self { choice_list }
    }
}

impl DataTransformer for ChoicesToValues {
    fn transform(&self, value: &Value) -> FormResult<Value> {
        match value {
            Value::Null => Ok(Value::List(vec![])),
            Value::List(choices) => Ok(Value::list(self.choice_list.get_values_for_choices(choices))),
            _ => Err(FormError::transformation_failed("Expected an array.")),
        }
    }

    fn reverse_transform(&self, value: &Value) -> FormResult<Value> {
        let values: Vec<String> = match value {
            Value::Null => return Ok(Value::List(vec![])),
            Value::List(values) => values.iter().map(ToString::to_string).collect(),
            _ => return Err(FormError::transformation_failed("Expected an array.")),
        };
        let choices = self.choice_list.get_choices_for_values(&values);
        if choices.len() != values.len() {
            return Err(FormError::transformation_failed(
                "Could not find all matching choices for the given values",
            ));
        }
        Ok(Value::List(choices))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> ChoiceList {
        ChoiceList::new([Value::from("A"), Value::from("B"), Value::from("C")])
    }

    fn list_with_bools() -> ChoiceList {
        ChoiceList::new([Value::Bool(true), Value::Bool(false), Value::from("")])
    }

    // ── ChoiceList ──────────────────────────────────────────────────

    #[test]
    fn test_values_from_string_casts() {
        assert_eq!(list().values().collect::<Vec<_>>(), ["A", "B", "C"]);
        assert_eq!(list_with_bools().values().collect::<Vec<_>>(), ["1", "0", ""]);
    }

    #[test]
    fn test_values_from_indices() {
        let dup = ChoiceList::new([Value::Int(1), Value::from("1")]);
        assert_eq!(dup.values().collect::<Vec<_>>(), ["0", "1"]);

        let non_scalar = ChoiceList::new([Value::from("a"), Value::Null]);
        assert_eq!(non_scalar.values().collect::<Vec<_>>(), ["0", "1"]);
    }

    #[test]
    fn test_from_pairs() {
        let list = ChoiceList::from_pairs([("en", Value::from("English")), ("de", Value::from("German"))]);
        assert_eq!(list.len(), 2);
        assert_eq!(list.get_choices_for_values(&["de".to_string()]), vec![Value::from("German")]);
        assert_eq!(list.get_values_for_choices(&[Value::from("English")]), vec!["en".to_string()]);
    }

    #[test]
    fn test_lookups_skip_unknown() {
        let l = list();
        assert_eq!(l.get_values_for_choices(&[Value::from("C"), Value::from("X")]), vec!["C".to_string()]);
        assert!(l.get_choices_for_values(&["X".to_string()]).is_empty());
        assert!(ChoiceList::default().is_empty());
    }

    // ── ChoiceToValue ───────────────────────────────────────────────

    #[test]
    fn test_choice_transform() {
        let t = ChoiceToValue::new(list());
        assert_eq!(t.transform(&Value::from("B")).unwrap(), Value::from("B"));
        assert_eq!(t.transform(&Value::from("X")).unwrap(), Value::from(""));

        let t = ChoiceToValue::new(list_with_bools());
        assert_eq!(t.transform(&Value::Bool(true)).unwrap(), Value::from("1"));
        assert_eq!(t.transform(&Value::Bool(false)).unwrap(), Value::from("0"));
        assert_eq!(t.transform(&Value::from("")).unwrap(), Value::from(""));
    }

    #[test]
    fn test_choice_reverse_transform() {
        let t = ChoiceToValue::new(list_with_bools());
        assert_eq!(t.reverse_transform(&Value::from("1")).unwrap(), Value::Bool(true));
        assert_eq!(t.reverse_transform(&Value::from("0")).unwrap(), Value::Bool(false));
        assert_eq!(t.reverse_transform(&Value::from("")).unwrap(), Value::from(""));
        assert_eq!(t.reverse_transform(&Value::Null).unwrap(), Value::from(""));

        let t = ChoiceToValue::new(list());
        assert_eq!(t.reverse_transform(&Value::from("")).unwrap(), Value::Null);
        assert_eq!(t.reverse_transform(&Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn test_choice_reverse_transform_unknown() {
        let err = ChoiceToValue::new(list()).reverse_transform(&Value::from("X")).unwrap_err();
        assert_eq!(err.message(), "The choice \"X\" does not exist or is not unique.");
    }

    #[test]
    fn test_choice_reverse_transform_expects_string() {
        let err = ChoiceToValue::new(list()).reverse_transform(&Value::Int(1)).unwrap_err();
        assert_eq!(err.message(), "Expected a string or null.");
    }

    // ── ChoicesToValues ─────────────────────────────────────────────

    #[test]
    fn test_choices_transform() {
        let t = ChoicesToValues::new(list());
        assert_eq!(
            t.transform(&Value::list(["A", "C"])).unwrap(),
            Value::list(["A", "C"])
        );
        assert_eq!(t.transform(&Value::Null).unwrap(), Value::List(vec![]));
        let err = t.transform(&Value::from("A")).unwrap_err();
        assert_eq!(err.message(), "Expected an array.");
    }

    #[test]
    fn test_choices_reverse_transform() {
        let t = ChoicesToValues::new(list_with_bools());
        assert_eq!(
            t.reverse_transform(&Value::list(["1", "0"])).unwrap(),
            Value::list([true, false])
        );
        assert_eq!(t.reverse_transform(&Value::Null).unwrap(), Value::List(vec![]));
        assert_eq!(t.reverse_transform(&Value::List(vec![])).unwrap(), Value::List(vec![]));
    }

    #[test]
    fn test_choices_reverse_transform_unknown() {
        let t = ChoicesToValues::new(list());
        let err = t.reverse_transform(&Value::list(["A", "X"])).unwrap_err();
        assert_eq!(err.message(), "Could not find all matching choices for the given values");
        let err = t.reverse_transform(&Value::from("A")).unwrap_err();
        assert_eq!(err.message(), "Expected an array.");
    }
}
