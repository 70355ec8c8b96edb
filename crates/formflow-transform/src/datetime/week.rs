//! ISO weeks as `{year, week}` maps.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use formflow_core::{FormError, FormResult, Value};

use crate::transformer::DataTransformer;

/// Transforms between a week string such as `2019-W05` and a map
/// `{year: 2019, week: 5}` of integers.
///
/// ```
/// use formflow_core::Value;
/// use formflow_transform::datetime::WeekToArray;
/// use formflow_transform::transformer::DataTransformer;
///
/// let t = WeekToArray;
/// let view = Value::map([("year", 2019), ("week", 5)]);
/// assert_eq!(t.transform(&Value::from("2019-W05")).unwrap(), view);
/// assert_eq!(t.reverse_transform(&view).unwrap(), Value::from("2019-W05"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekToArray;

static WEEK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<year>\d{4})-W(?P<week>\d{2})$").expect("valid regex"));

/// The number of ISO weeks in `year`. December 28th always falls in the
/// last week.
fn weeks_in_year(year: i32) -> Option<u32> {
    NaiveDate::from_ymd_opt(year, 12, 28).map(|d| d.iso_week().week())
}

impl DataTransformer for WeekToArray {
    fn transform(&self, value: &Value) -> FormResult<Value> {
        let s = match value {
            Value::Null => return Ok(Value::map([("year", Value::Null), ("week", Value::Null)])),
            Value::String(s) => s,
            other => {
                return Err(FormError::transformation_failed(format!(
                    "Value is expected to be a string but was \"{}\".",
                    other.type_name()
                )))
            }
        };
        let caps = WEEK.captures(s).ok_or_else(|| {
            FormError::transformation_failed("Given data does not follow the date format \"Y-\\WW\".")
        })?;
        let year: i64 = caps["year"].parse().unwrap_or_default();
        let week: i64 = caps["week"].parse().unwrap_or_default();
        Ok(Value::map([("year", year), ("week", week)]))
    }

    fn reverse_transform(&self, value: &Value) -> FormResult<Value> {
        let map = match value {
            Value::Null => return Ok(Value::Null),
            Value::Map(map) => map,
            other => {
                return Err(FormError::transformation_failed(format!(
                    "Value is expected to be an array, but was \"{}\".",
                    other.type_name()
                )))
            }
        };

        for key in ["year", "week"] {
            if !map.contains_key(key) {
                return Err(FormError::transformation_failed(format!("Key \"{key}\" is missing.")));
            }
        }
        let extra: Vec<&str> = map
            .keys()
            .map(String::as_str)
            .filter(|k| !matches!(*k, "year" | "week"))
            .collect();
        if !extra.is_empty() {
            return Err(FormError::transformation_failed(format!(
                "Expected only keys \"year\" and \"week\" to be present, but also got [\"{}\"].",
                extra.join("\", \"")
            )));
        }

        let (year, week) = (&map["year"], &map["week"]);
        if year.is_null() && week.is_null() {
            return Ok(Value::Null);
        }
        let Value::Int(year) = *year else {
            return Err(FormError::transformation_failed(format!(
                "Year is expected to be an integer, but was \"{}\".",
                year.type_name()
            )));
        };
        let Value::Int(week) = *week else {
            return Err(FormError::transformation_failed(format!(
                "Week is expected to be an integer, but was \"{}\".",
                week.type_name()
            )));
        };

        let exists = i32::try_from(year)
            .ok()
            .and_then(weeks_in_year)
            .is_some_and(|last| week >= 1 && week <= i64::from(last));
        if !exists {
            return Err(FormError::transformation_failed(format!(
                "Week \"{week}\" does not exist for year \"{year}\"."
            )));
        }

        Ok(Value::String(format!("{year}-W{week:02}")))
    }
}
