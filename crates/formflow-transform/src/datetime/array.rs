//! Date-times as maps of string fields.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use indexmap::IndexMap;

use formflow_core::{FormError, FormResult, Value};

use super::{expect_datetime, TimezonePair};
use crate::transformer::DataTransformer;

/// One component of a date-time.
///
/// Variants are declared in canonical order; output maps follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DateField {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl DateField {
    pub const ALL: [Self; 6] = [
        Self::Year,
        Self::Month,
        Self::Day,
        Self::Hour,
        Self::Minute,
        Self::Second,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
        }
    }

    const fn max(self) -> Option<u32> {
        match self {
            Self::Hour => Some(23),
            Self::Minute | Self::Second => Some(59),
            _ => None,
        }
    }
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateField {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| FormError::InvalidArgument(format!("Unknown date field \"{s}\".")))
    }
}

/// Transforms between a date-time and a map of its fields.
///
/// The view is a map such as `{year: "2010", month: "2", day: "3"}`.
/// Fields are unpadded unless padding is enabled. Year, month and day left
/// empty in the view fall back to the reference date (1970-01-01).
///
/// # Examples
///
/// ```
/// use chrono::TimeZone;
/// use chrono_tz::Tz;
/// use formflow_core::Value;
/// use formflow_transform::datetime::{DateField, DateTimeToArray};
/// use formflow_transform::transformer::DataTransformer;
///
/// let t = DateTimeToArray::new(None, None)
///     .unwrap()
///     .with_fields([DateField::Year, DateField::Month, DateField::Day]);
/// let dt = Tz::UTC.with_ymd_and_hms(2010, 2, 3, 4, 5, 6).unwrap();
/// assert_eq!(
///     t.transform(&Value::DateTime(dt)).unwrap(),
///     Value::map([("year", "2010"), ("month", "2"), ("day", "3")])
/// );
/// ```
#[derive(Debug, Clone)]
pub struct DateTimeToArray {
    zones: TimezonePair,
    fields: Vec<DateField>,
    pad: bool,
    reference_date: NaiveDate,
}

impl DateTimeToArray {
    /// Creates a transformer for all six fields.
    pub fn new(input_timezone: Option<&str>, output_timezone: Option<&str>) -> FormResult<Self> {
        Ok(Self {
            zones: TimezonePair::new(input_timezone, output_timezone)?,
            fields: DateField::ALL.to_vec(),
            pad: false,
            reference_date: NaiveDate::default(),
        })
    }

    /// Restricts the view to the given fields. Order and duplicates are
    /// normalized.
    #[must_use]
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = DateField>) -> Self {
        let mut fields: Vec<DateField> = fields.into_iter().collect();
        fields.sort_unstable();
        fields.dedup();
        self.fields = fields;
        self
    }

    /// Zero-pads month, day, and time fields to two digits.
    #[must_use]
    pub const fn with_pad(mut self, pad: bool) -> Self {
        self.pad = pad;
        self
    }

    /// Sets the date used for empty year, month, or day fields.
    #[must_use]
    pub const fn with_reference_date(mut self, reference_date: NaiveDate) -> Self {
        self.reference_date = reference_date;
        self
    }

    pub fn fields(&self) -> &[DateField] {
        &self.fields
    }

    fn empty_view(&self) -> Value {
        Value::Map(
            self.fields
                .iter()
                .map(|f| (f.as_str().to_string(), Value::from("")))
                .collect(),
        )
    }

    /// Reads a digit-only field, or `None` when it is absent or empty.
    fn read(
        map: &IndexMap<String, Value>,
        field: DateField,
    ) -> FormResult<Option<u32>> {
        let invalid = || FormError::transformation_failed(format!("This {field} is invalid."));
        let Some(value) = map.get(field.as_str()).filter(|v| !v.is_null()) else {
            return Ok(None);
        };
        if !value.is_digit_string() {
            return Err(invalid());
        }
        let amount: u32 = value.to_string().parse().map_err(|_| invalid())?;
        if field.max().is_some_and(|max| amount > max) {
            return Err(invalid());
        }
        // Zero year, month, or day counts as empty.
        if amount == 0 && field <= DateField::Day {
            return Ok(None);
        }
        Ok(Some(amount))
    }
}

impl DataTransformer for DateTimeToArray {
    fn transform(&self, value: &Value) -> FormResult<Value> {
        if value.is_null() {
            return Ok(self.empty_view());
        }
        let dt = self.zones.to_output(expect_datetime(value)?);

        let pad = self.pad;
        let render = |n: u32| if pad { format!("{n:02}") } else { n.to_string() };
        let map = self
            .fields
            .iter()
            .map(|field| {
                let text = match field {
                    DateField::Year if pad => format!("{:04}", dt.year()),
                    DateField::Year => dt.year().to_string(),
                    DateField::Month => render(dt.month()),
                    DateField::Day => render(dt.day()),
                    DateField::Hour => render(dt.hour()),
                    DateField::Minute => render(dt.minute()),
                    DateField::Second => render(dt.second()),
                };
                (field.as_str().to_string(), Value::String(text))
            })
            .collect();
        Ok(Value::Map(map))
    }

    fn reverse_transform(&self, value: &Value) -> FormResult<Value> {
        let map = match value {
            Value::Null => return Ok(Value::Null),
            Value::Map(map) => map,
            _ => return Err(FormError::transformation_failed("Expected an array.")),
        };
        if map.values().all(|v| v.to_string().is_empty()) {
            return Ok(Value::Null);
        }

        let missing: Vec<&str> = self
            .fields
            .iter()
            .filter(|f| !value.has_set(f.as_str()))
            .map(|f| f.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(FormError::transformation_failed(format!(
                "The fields \"{}\" should not be empty.",
                missing.join("\", \"")
            )));
        }

        let month = Self::read(map, DateField::Month)?;
        let day = Self::read(map, DateField::Day)?;
        let year = Self::read(map, DateField::Year)?;
        let hour = Self::read(map, DateField::Hour)?;
        let minute = Self::read(map, DateField::Minute)?;
        let second = Self::read(map, DateField::Second)?;

        let year = match year {
            Some(y) => i32::try_from(y)
                .map_err(|_| FormError::transformation_failed("This year is invalid."))?,
            None => self.reference_date.year(),
        };
        let date = NaiveDate::from_ymd_opt(
            year,
            month.unwrap_or_else(|| self.reference_date.month()),
            day.unwrap_or_else(|| self.reference_date.day()),
        )
        .ok_or_else(|| FormError::transformation_failed("This is an invalid date."))?;
        let time = NaiveTime::from_hms_opt(
            hour.unwrap_or_default(),
            minute.unwrap_or_default(),
            second.unwrap_or_default(),
        )
        .ok_or_else(|| FormError::transformation_failed("This is an invalid time."))?;

        Ok(Value::DateTime(self.zones.from_output_local(date.and_time(time))))
    }
}
