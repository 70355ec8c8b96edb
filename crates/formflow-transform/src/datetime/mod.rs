//! Date-time transformers.
//!
//! Every transformer here converts between a model zone (the *input* zone)
//! and a view zone (the *output* zone). Model values are converted to the
//! view zone before they are formatted, and parsed view values are
//! interpreted in the view zone and converted back.
//!
//! ## Modules
//!
//! - [`array`] - Date-times as maps of year, month, day, hour, minute, second
//! - [`string`] - Date-times as `strftime`-formatted strings
//! - [`rfc3339`] - RFC 3339 strings
//! - [`timestamp`] - Unix timestamps
//! - [`html5`] - HTML5 `datetime-local` strings
//! - [`week`] - ISO week strings such as `2024-W05`
//! - [`zone`] - Time zones as IANA names

pub mod array;
pub mod html5;
pub mod rfc3339;
pub mod string;
pub mod timestamp;
pub mod week;
pub mod zone;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;

use formflow_core::timezone::{convert, parse_timezone, resolve_local};
use formflow_core::{FormError, FormResult, Value};

pub use array::{DateField, DateTimeToArray};
pub use html5::DateTimeToHtml5LocalDateTime;
pub use rfc3339::DateTimeToRfc3339;
pub use string::DateTimeToString;
pub use timestamp::DateTimeToTimestamp;
pub use week::WeekToArray;
pub use zone::DateTimeZoneToString;

/// The model and view zones of a date-time transformer.
///
/// ```
/// use formflow_transform::datetime::TimezonePair;
///
/// let zones = TimezonePair::new(Some("America/New_York"), None).unwrap();
/// assert_eq!(zones.input().name(), "America/New_York");
/// assert_eq!(zones.output().name(), "UTC");
///
/// let err = TimezonePair::new(Some("Mars/Olympus"), None).unwrap_err();
/// assert_eq!(err.message(), "Input timezone is invalid: Mars/Olympus.");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimezonePair {
    input: Tz,
    output: Tz,
}

impl Default for TimezonePair {
    fn default() -> Self {
        Self {
            input: Tz::UTC,
            output: Tz::UTC,
        }
    }
}

impl TimezonePair {
    /// Resolves both zones; `None` means UTC.
    pub fn new(input: Option<&str>, output: Option<&str>) -> FormResult<Self> {
        let input = match input {
            Some(name) => parse_timezone(name)
                .map_err(|_| FormError::InvalidArgument(format!("Input timezone is invalid: {name}.")))?,
            None => Tz::UTC,
        };
        let output = match output {
            Some(name) => parse_timezone(name)
                .map_err(|_| FormError::InvalidArgument(format!("Output timezone is invalid: {name}.")))?,
            None => Tz::UTC,
        };
        Ok(Self { input, output })
    }

    pub const fn input(&self) -> Tz {
        self.input
    }

    pub const fn output(&self) -> Tz {
        self.output
    }

    /// Moves a model date-time into the view zone.
    pub fn to_output(&self, dt: &DateTime<Tz>) -> DateTime<Tz> {
        convert(dt, self.output)
    }

    /// Moves a date-time into the model zone.
    pub fn to_input<Z: chrono::TimeZone>(&self, dt: &DateTime<Z>) -> DateTime<Tz> {
        convert(dt, self.input)
    }

    /// Reads a wall-clock time in the view zone and returns it in the model zone.
    pub fn from_output_local(&self, naive: NaiveDateTime) -> DateTime<Tz> {
        self.to_input(&resolve_local(self.output, naive))
    }
}

/// Extracts the date-time from a model value.
pub(crate) fn expect_datetime(value: &Value) -> FormResult<&DateTime<Tz>> {
    match value {
        Value::DateTime(dt) => Ok(dt),
        _ => Err(FormError::transformation_failed("Expected a DateTime.")),
    }
}

/// Fails unless year, month and day form a calendar date.
pub(crate) fn check_date(year: &str, month: &str, day: &str) -> FormResult<NaiveDate> {
    let date = year.parse().ok().and_then(|y| {
        let m = month.parse().ok()?;
        let d = day.parse().ok()?;
        NaiveDate::from_ymd_opt(y, m, d)
    });
    date.ok_or_else(|| {
        FormError::transformation_failed(format!(
            "The date \"{year}-{month}-{day}\" is not a valid date."
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn test_defaults_to_utc() {
        let zones = TimezonePair::default();
        assert_eq!(zones.input(), Tz::UTC);
        assert_eq!(zones.output(), Tz::UTC);
        assert_eq!(TimezonePair::new(None, None).unwrap(), zones);
    }

    #[test]
    fn test_invalid_output_zone() {
        let err = TimezonePair::new(None, Some("foobar")).unwrap_err();
        assert!(matches!(err, FormError::InvalidArgument(_)));
        assert_eq!(err.message(), "Output timezone is invalid: foobar.");
    }

    #[test]
    fn test_round_trip_between_zones() {
        let zones = TimezonePair::new(Some("America/New_York"), Some("Asia/Hong_Kong")).unwrap();
        let model = Tz::America__New_York
            .with_ymd_and_hms(2010, 2, 3, 4, 5, 6)
            .unwrap();
        let view = zones.to_output(&model);
        assert_eq!(view.hour(), 17);
        let back = zones.from_output_local(view.naive_local());
        assert_eq!(back, model);
        assert_eq!(back.timezone(), Tz::America__New_York);
    }

    #[test]
    fn test_check_date() {
        assert!(check_date("2010", "02", "28").is_ok());
        let err = check_date("2010", "02", "31").unwrap_err();
        assert_eq!(err.message(), "The date \"2010-02-31\" is not a valid date.");
    }
}
