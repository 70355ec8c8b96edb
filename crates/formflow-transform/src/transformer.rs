//! The [`DataTransformer`] trait and its compositions.
//!
//! A transformer converts a model value into a view value with
//! [`transform`](DataTransformer::transform) and back with
//! [`reverse_transform`](DataTransformer::reverse_transform). A
//! [`DataTransformerChain`] runs several transformers in sequence, and a
//! [`CallbackTransformer`] wraps two closures.

use std::fmt;

use formflow_core::logging::{transformer_span, Direction};
use formflow_core::{FormResult, Value};

/// A two-way converter between a model value and a view value.
///
/// Implementations are configured at construction and immutable afterwards,
/// so one instance may be shared across threads.
///
/// # Examples
///
/// ```
/// use formflow_core::Value;
/// use formflow_transform::transformer::DataTransformer;
/// use formflow_transform::boolean::BooleanToString;
///
/// let t = BooleanToString::default();
/// assert_eq!(t.transform(&Value::Bool(true)).unwrap(), Value::from("1"));
/// assert_eq!(t.reverse_transform(&Value::from("")).unwrap(), Value::Bool(false));
/// ```
pub trait DataTransformer: Send + Sync + fmt::Debug {
    /// Converts a model value into its view representation.
    fn transform(&self, value: &Value) -> FormResult<Value>;

    /// Converts a view value back into its model representation.
    fn reverse_transform(&self, value: &Value) -> FormResult<Value>;

    /// A human-readable name used in logs.
    fn name(&self) -> &str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }
}

impl<T: DataTransformer + ?Sized> DataTransformer for Box<T> {
    fn transform(&self, value: &Value) -> FormResult<Value> {
        (**self).transform(value)
    }

    fn reverse_transform(&self, value: &Value) -> FormResult<Value> {
        (**self).reverse_transform(value)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

// ============================================================
// DataTransformerChain
// ============================================================

/// An ordered list of transformers applied as one.
///
/// `transform` runs the list front to back; `reverse_transform` runs it back
/// to front. The first failure stops the run and is returned unchanged. An
/// empty chain returns its input.
#[derive(Debug, Default)]
pub struct DataTransformerChain {
    transformers: Vec<Box<dyn DataTransformer>>,
}

impl DataTransformerChain {
    pub fn new(transformers: Vec<Box<dyn DataTransformer>>) -> Self {
        Self { transformers }
    }

    /// Appends a transformer to the end of the chain.
    #[must_use]
    pub fn with(mut self, transformer: impl DataTransformer + 'static) -> Self {
        self.transformers.push(Box::new(transformer));
        self
    }

    pub fn transformers(&self) -> &[Box<dyn DataTransformer>] {
        &self.transformers
    }

    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }

    fn run<'a>(
        direction: Direction,
        steps: impl Iterator<Item = &'a Box<dyn DataTransformer>>,
        value: &Value,
    ) -> FormResult<Value> {
        let mut current = value.clone();
        for (index, step) in steps.enumerate() {
            let span = transformer_span(step.name(), direction);
            let _guard = span.enter();

            let result = match direction {
                Direction::Transform => step.transform(&current),
                Direction::Reverse => step.reverse_transform(&current),
            };
            current = result.map_err(|e| {
                tracing::debug!(step = index, error = %e, "Transformer chain failed");
                e
            })?;
            tracing::trace!(step = index, output = ?current, "Transformer applied");
        }
        Ok(current)
    }
}

impl DataTransformer for DataTransformerChain {
    fn transform(&self, value: &Value) -> FormResult<Value> {
        Self::run(Direction::Transform, self.transformers.iter(), value)
    }

    fn reverse_transform(&self, value: &Value) -> FormResult<Value> {
        Self::run(Direction::Reverse, self.transformers.iter().rev(), value)
    }
}

// ============================================================
// CallbackTransformer
// ============================================================

type Callback = Box<dyn Fn(&Value) -> FormResult<Value> + Send + Sync>;

/// A transformer built from two closures.
///
/// ```
/// use formflow_core::Value;
/// use formflow_transform::transformer::{CallbackTransformer, DataTransformer};
///
/// let upper = CallbackTransformer::new(
///     |v| Ok(Value::from(v.to_string().to_uppercase())),
///     |v| Ok(Value::from(v.to_string().to_lowercase())),
/// );
/// assert_eq!(upper.transform(&Value::from("abc")).unwrap(), Value::from("ABC"));
/// ```
pub struct CallbackTransformer {
    transform: Callback,
    reverse_transform: Callback,
}

impl CallbackTransformer {
    pub fn new<F, R>(transform: F, reverse_transform: R) -> Self
    where
        F: Fn(&Value) -> FormResult<Value> + Send + Sync + 'static,
        R: Fn(&Value) -> FormResult<Value> + Send + Sync + 'static,
    {
        Self {
            transform: Box::new(transform),
            reverse_transform: Box::new(reverse_transform),
        }
    }
}

impl fmt::Debug for CallbackTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackTransformer").finish_non_exhaustive()
    }
}

impl DataTransformer for CallbackTransformer {
    fn transform(&self, value: &Value) -> FormResult<Value> {
        (self.transform)(value)
    }

    fn reverse_transform(&self, value: &Value) -> FormResult<Value> {
        (self.reverse_transform)(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use formflow_core::FormError;

    fn appender(suffix: &'static str, log: Arc<Mutex<Vec<String>>>) -> CallbackTransformer {
        let forward_log = Arc::clone(&log);
        CallbackTransformer::new(
            move |v| {
                forward_log.lock().unwrap().push(format!("t{suffix}"));
                Ok(Value::from(format!("{v}{suffix}")))
            },
            move |v| {
                log.lock().unwrap().push(format!("r{suffix}"));
                Ok(Value::from(format!("{v}{suffix}")))
            },
        )
    }

    fn failing(message: &'static str) -> CallbackTransformer {
        CallbackTransformer::new(
            move |_| Err(FormError::transformation_failed(message)),
            move |_| Err(FormError::transformation_failed(message)),
        )
    }

    #[test]
    fn test_transform_runs_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = DataTransformerChain::default()
            .with(appender("1", Arc::clone(&log)))
            .with(appender("2", Arc::clone(&log)));
        assert_eq!(chain.transform(&Value::from("x")).unwrap(), Value::from("x12"));
        assert_eq!(*log.lock().unwrap(), vec!["t1", "t2"]);
    }

    #[test]
    fn test_reverse_transform_runs_in_reverse_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = DataTransformerChain::default()
            .with(appender("1", Arc::clone(&log)))
            .with(appender("2", Arc::clone(&log)));
        assert_eq!(
            chain.reverse_transform(&Value::from("x")).unwrap(),
            Value::from("x21")
        );
        assert_eq!(*log.lock().unwrap(), vec!["r2", "r1"]);
    }

    #[test]
    fn test_empty_chain_is_identity() {
        let chain = DataTransformerChain::default();
        assert!(chain.is_empty());
        let value = Value::map([("a", 1)]);
        assert_eq!(chain.transform(&value).unwrap(), value);
        assert_eq!(chain.reverse_transform(&value).unwrap(), value);
    }

    #[test]
    fn test_failure_stops_chain_and_propagates_unchanged() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = DataTransformerChain::default()
            .with(failing("first link broke"))
            .with(appender("2", Arc::clone(&log)));

        let err = chain.transform(&Value::from("x")).unwrap_err();
        assert_eq!(err, FormError::transformation_failed("first link broke"));
        assert!(log.lock().unwrap().is_empty());

        // Reverse runs link 2 first, then fails on link 1.
        let err = chain.reverse_transform(&Value::from("x")).unwrap_err();
        assert_eq!(err.message(), "first link broke");
        assert_eq!(*log.lock().unwrap(), vec!["r2"]);
    }

    #[test]
    fn test_unexpected_type_kind_preserved() {
        let chain = DataTransformerChain::default().with(CallbackTransformer::new(
            |_| Err(FormError::unexpected_type("array", "string")),
            |v| Ok(v.clone()),
        ));
        assert!(chain.transform(&Value::Null).unwrap_err().is_unexpected_type());
    }

    #[test]
    fn test_boxed_and_nested_chains() {
        let inner = DataTransformerChain::default().with(CallbackTransformer::new(
            |v| Ok(Value::from(format!("[{v}]"))),
            |v| Ok(v.clone()),
        ));
        let outer = DataTransformerChain::new(vec![Box::new(inner)]);
        assert_eq!(outer.len(), 1);
        assert_eq!(outer.transform(&Value::from("a")).unwrap(), Value::from("[a]"));
    }

    #[test]
    fn test_name_is_short_type_name() {
        assert_eq!(DataTransformerChain::default().name(), "DataTransformerChain");
    }
}
