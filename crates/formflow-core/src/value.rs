//! Dynamic values carried between the model and view sides of a form.
//!
//! The [`Value`] enum is the single type every transformer accepts and
//! returns. Model values are typically numbers, date-times, intervals, time
//! zones, or identifiers; view values are strings and nested maps of strings.

use std::fmt;

use chrono::DateTime;
use chrono_tz::Tz;
use indexmap::IndexMap;

use crate::interval::DateInterval;

/// A value on either side of a transformer.
///
/// Maps preserve insertion order so that array-shaped view values keep the
/// field order a widget renders them in.
///
/// # Examples
///
/// ```
/// use formflow_core::value::Value;
///
/// let v = Value::from(42_i64);
/// assert_eq!(v, Value::Int(42));
///
/// let v = Value::from("hello");
/// assert_eq!(v, Value::String("hello".to_string()));
/// assert!(Value::from("1.5e3").is_numeric());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The absence of a value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit floating-point number.
    Float(f64),
    /// A UTF-8 string.
    String(String),
    /// A zoned date and time.
    DateTime(DateTime<Tz>),
    /// A calendar interval.
    Interval(DateInterval),
    /// An IANA time zone.
    TimeZone(Tz),
    /// A UUID.
    Uuid(uuid::Uuid),
    /// A ULID.
    Ulid(ulid::Ulid),
    /// An ordered list of values.
    List(Vec<Value>),
    /// An insertion-ordered map of values.
    Map(IndexMap<String, Value>),
}

impl Value {
    /// Builds a [`Value::Map`] from key/value pairs.
    ///
    /// ```
    /// use formflow_core::value::Value;
    ///
    /// let map = Value::map([("year", "2024"), ("month", "6")]);
    /// assert_eq!(map.get("year"), Some(&Value::from("2024")));
    /// ```
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Self>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Builds a [`Value::List`] from anything convertible to values.
    pub fn list<V, I>(items: I) -> Self
    where
        V: Into<Self>,
        I: IntoIterator<Item = V>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// A short name of the value's type, used in error messages.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::DateTime(_) => "DateTime",
            Self::Interval(_) => "DateInterval",
            Self::TimeZone(_) => "DateTimeZone",
            Self::Uuid(_) => "Uuid",
            Self::Ulid(_) => "Ulid",
            Self::List(_) | Self::Map(_) => "array",
        }
    }

    /// Returns `true` for [`Value::Null`].
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` for integers, floats, and strings that spell a finite number.
    pub fn is_numeric(&self) -> bool {
        match self {
            Self::Int(_) | Self::Float(_) => true,
            Self::String(s) => parse_numeric_str(s).is_some(),
            _ => false,
        }
    }

    /// The value as a float, if it is numeric.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::String(s) => parse_numeric_str(s),
            _ => None,
        }
    }

    /// The inner string slice, if this is a [`Value::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The inner map, if this is a [`Value::Map`].
    pub const fn as_map(&self) -> Option<&IndexMap<String, Self>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Looks up a key in a map value. Non-map values have no keys.
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.as_map().and_then(|m| m.get(key))
    }

    /// Returns `true` when a map value holds a non-null entry for `key`.
    pub fn has_set(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.is_null())
    }

    /// Emptiness in the loose sense used by form input: `null`, `false`,
    /// zero, `""`, `"0"`, and empty collections are all empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Bool(b) => !b,
            Self::Int(i) => *i == 0,
            Self::Float(f) => *f == 0.0,
            Self::String(s) => s.is_empty() || s == "0",
            Self::List(l) => l.is_empty(),
            Self::Map(m) => m.is_empty(),
            _ => false,
        }
    }

    /// Returns `true` when the string form of the value is a non-empty run of
    /// ASCII digits.
    pub fn is_digit_string(&self) -> bool {
        let s = self.to_string();
        !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
    }
}

/// Parses a numeric string the way loose form input is read: surrounding
/// whitespace is allowed, `inf` and `nan` spellings are not.
fn parse_numeric_str(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty()
        || !trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// The string cast of a value: `null` and `false` are empty, `true` is `"1"`,
/// collections render as `Array`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null | Self::Bool(false) => Ok(()),
            Self::Bool(true) => write!(f, "1"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "{s}"),
            Self::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Self::Interval(i) => write!(f, "{i}"),
            Self::TimeZone(tz) => write!(f, "{}", tz.name()),
            Self::Uuid(u) => write!(f, "{u}"),
            Self::Ulid(u) => write!(f, "{u}"),
            Self::List(_) | Self::Map(_) => write!(f, "Array"),
        }
    }
}

// ── From implementations ───────────────────────────────────────────────

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<DateTime<Tz>> for Value {
    fn from(v: DateTime<Tz>) -> Self {
        Self::DateTime(v)
    }
}

impl From<DateInterval> for Value {
    fn from(v: DateInterval) -> Self {
        Self::Interval(v)
    }
}

impl From<Tz> for Value {
    fn from(v: Tz) -> Self {
        Self::TimeZone(v)
    }
}

impl From<uuid::Uuid> for Value {
    fn from(v: uuid::Uuid) -> Self {
        Self::Uuid(v)
    }
}

impl From<ulid::Ulid> for Value {
    fn from(v: ulid::Ulid) -> Self {
        Self::Ulid(v)
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::List(v)
    }
}

impl From<IndexMap<String, Self>> for Value {
    fn from(v: IndexMap<String, Self>) -> Self {
        Self::Map(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
