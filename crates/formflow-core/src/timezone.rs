//! Time-zone helpers.
//!
//! Transformers receive their zones explicitly, as IANA names resolved
//! through `chrono-tz`. This module parses those names and turns naive local
//! wall-clock times into zoned date-times.
//!
//! ## Local time resolution
//!
//! - A local time inside a DST gap moves forward by the gap's length, so
//!   `02:30` on a spring-forward night becomes `03:30`.
//! - An ambiguous local time during a fall-back hour resolves to the earlier
//!   instant.
//!
//! ```
//! use chrono::{NaiveDate, Timelike};
//! use formflow_core::timezone::{parse_timezone, resolve_local};
//!
//! let tz = parse_timezone("Europe/Berlin").unwrap();
//! let gap = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap().and_hms_opt(2, 30, 0).unwrap();
//! assert_eq!(resolve_local(tz, gap).hour(), 3);
//! ```

use chrono::{DateTime, Days, LocalResult, NaiveDateTime, Offset, TimeZone};
use chrono_tz::Tz;

use crate::error::{FormError, FormResult};

/// Parses an IANA time-zone name such as `America/New_York`.
pub fn parse_timezone(name: &str) -> FormResult<Tz> {
    name.parse::<Tz>()
        .map_err(|_| FormError::InvalidArgument(format!("Unknown timezone identifier \"{name}\".")))
}

/// Interprets a naive wall-clock time in `tz`.
pub fn resolve_local(tz: Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            // Apply the offset in effect before the gap, as if the clocks
            // had not yet moved.
            let before = naive.checked_sub_days(Days::new(1)).unwrap_or(naive);
            let offset = tz.offset_from_utc_datetime(&before).fix();
            let utc = naive - offset;
            tz.from_utc_datetime(&utc)
        }
    }
}

/// Converts a zoned date-time to another zone.
pub fn convert<Z: TimeZone>(dt: &DateTime<Z>, tz: Tz) -> DateTime<Tz> {
    dt.with_timezone(&tz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    fn naive(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_timezone() {
        assert_eq!(parse_timezone("UTC").unwrap(), chrono_tz::UTC);
        assert_eq!(parse_timezone("Asia/Hong_Kong").unwrap(), chrono_tz::Asia::Hong_Kong);
        let err = parse_timezone("Mars/Olympus").unwrap_err();
        assert_eq!(err.message(), "Unknown timezone identifier \"Mars/Olympus\".");
    }

    #[test]
    fn test_resolve_single() {
        let tz = chrono_tz::America::New_York;
        let dt = resolve_local(tz, naive(2024, 6, 15, 12, 0));
        assert_eq!(dt.naive_local(), naive(2024, 6, 15, 12, 0));
        assert_eq!(dt.offset().fix().local_minus_utc(), -4 * 3600);
    }

    #[test]
    fn test_resolve_gap_moves_forward() {
        let tz = chrono_tz::America::New_York;
        let dt = resolve_local(tz, naive(2024, 3, 10, 2, 30));
        assert_eq!(dt.hour(), 3);
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn test_resolve_ambiguous_takes_earliest() {
        let tz = chrono_tz::Europe::Berlin;
        let dt = resolve_local(tz, naive(2024, 10, 27, 2, 30));
        assert_eq!(dt.offset().fix().local_minus_utc(), 2 * 3600);
    }

    #[test]
    fn test_convert() {
        let utc = chrono_tz::UTC.with_ymd_and_hms(2010, 2, 3, 4, 5, 6).unwrap();
        let hk = convert(&utc, chrono_tz::Asia::Hong_Kong);
        assert_eq!(hk.hour(), 12);
    }
}
