//! Calendar intervals.
//!
//! [`DateInterval`] stores an unnormalized amount of years, months, days and
//! time units plus a sign flag. It reads and writes ISO-8601 durations and
//! supports `%`-placeholder formatting.

use std::fmt;
use std::str::FromStr;

use crate::error::FormError;

/// A calendar interval such as "1 year, 2 months and 3 days".
///
/// Components are kept exactly as given: 90 seconds stays 90 seconds and is
/// never carried into minutes.
///
/// # Examples
///
/// ```
/// use formflow_core::interval::DateInterval;
///
/// let interval: DateInterval = "P1Y2M3DT4H5M6S".parse().unwrap();
/// assert_eq!(interval.years, 1);
/// assert_eq!(interval.seconds, 6);
/// assert_eq!(interval.format("%y-%M-%D"), "1-02-03");
/// assert_eq!(interval.to_string(), "P1Y2M3DT4H5M6S");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DateInterval {
    pub years: u32,
    pub months: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    /// Whether the interval points backwards in time.
    pub invert: bool,
}

impl DateInterval {
    /// Creates an interval from its date and time components.
    pub const fn new(
        years: u32,
        months: u32,
        days: u32,
        hours: u32,
        minutes: u32,
        seconds: u32,
    ) -> Self {
        Self {
            years,
            months,
            days,
            hours,
            minutes,
            seconds,
            invert: false,
        }
    }

    /// Sets the sign flag.
    #[must_use]
    pub const fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Renders the interval with `%` placeholders.
    ///
    /// | placeholder | meaning |
    /// |---|---|
    /// | `%y` / `%Y` | years / years, at least two digits |
    /// | `%m` / `%M` | months |
    /// | `%d` / `%D` | days |
    /// | `%h` / `%H` | hours |
    /// | `%i` / `%I` | minutes |
    /// | `%s` / `%S` | seconds |
    /// | `%a` | total days, unknown for constructed intervals |
    /// | `%R` | `-` when inverted, `+` otherwise |
    /// | `%r` | `-` when inverted, empty otherwise |
    /// | `%%` | a literal `%` |
    ///
    /// Any other `%x` sequence is copied unchanged.
    pub fn format(&self, pattern: &str) -> String {
        let mut out = String::with_capacity(pattern.len());
        let mut chars = pattern.chars();

        while let Some(c) = chars.next() {
            if c != '%' {
                out.push(c);
                continue;
            }
            let Some(spec) = chars.next() else {
                out.push('%');
                break;
            };
            match spec {
                'y' => out.push_str(&self.years.to_string()),
                'Y' => out.push_str(&format!("{:02}", self.years)),
                'm' => out.push_str(&self.months.to_string()),
                'M' => out.push_str(&format!("{:02}", self.months)),
                'd' => out.push_str(&self.days.to_string()),
                'D' => out.push_str(&format!("{:02}", self.days)),
                'h' => out.push_str(&self.hours.to_string()),
                'H' => out.push_str(&format!("{:02}", self.hours)),
                'i' => out.push_str(&self.minutes.to_string()),
                'I' => out.push_str(&format!("{:02}", self.minutes)),
                's' => out.push_str(&self.seconds.to_string()),
                'S' => out.push_str(&format!("{:02}", self.seconds)),
                'a' => out.push_str("(unknown)"),
                'R' => out.push(if self.invert { '-' } else { '+' }),
                'r' => {
                    if self.invert {
                        out.push('-');
                    }
                }
                '%' => out.push('%'),
                other => {
                    out.push('%');
                    out.push(other);
                }
            }
        }

        out
    }
}

impl fmt::Display for DateInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.invert {
            write!(f, "-")?;
        }
        write!(f, "P")?;
        let date = [(self.years, 'Y'), (self.months, 'M'), (self.days, 'D')];
        let time = [(self.hours, 'H'), (self.minutes, 'M'), (self.seconds, 'S')];

        for (amount, unit) in date {
            if amount > 0 {
                write!(f, "{amount}{unit}")?;
            }
        }
        if time.iter().any(|(amount, _)| *amount > 0) {
            write!(f, "T")?;
            for (amount, unit) in time {
                if amount > 0 {
                    write!(f, "{amount}{unit}")?;
                }
            }
        } else if date.iter().all(|(amount, _)| *amount == 0) {
            write!(f, "T0S")?;
        }
        Ok(())
    }
}

impl FromStr for DateInterval {
    type Err = FormError;

    /// Parses an ISO-8601 duration such as `P1Y2M3DT4H5M6S` or `P2W`.
    ///
    /// Weeks are added to the day count.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || FormError::InvalidArgument(format!("Unknown or bad format ({s})"));

        let body = s.strip_prefix('P').ok_or_else(bad)?;
        let (date_part, time_part) = match body.split_once('T') {
            Some((date, time)) => (date, Some(time)),
            None => (body, None),
        };

        let mut interval = Self::default();
        let mut seen = false;

        for (amount, unit) in components(date_part).ok_or_else(bad)? {
            seen = true;
            match unit {
                'Y' => interval.years = amount,
                'M' => interval.months = amount,
                'W' => interval.days = interval.days.saturating_add(amount.saturating_mul(7)),
                'D' => interval.days = interval.days.saturating_add(amount),
                _ => return Err(bad()),
            }
        }

        if let Some(time_part) = time_part {
            let time = components(time_part).ok_or_else(bad)?;
            if time.is_empty() {
                return Err(bad());
            }
            for (amount, unit) in time {
                seen = true;
                match unit {
                    'H' => interval.hours = amount,
                    'M' => interval.minutes = amount,
                    'S' => interval.seconds = amount,
                    _ => return Err(bad()),
                }
            }
        }

        if seen {
            Ok(interval)
        } else {
            Err(bad())
        }
    }
}

/// Splits `1Y2M` into `[(1, 'Y'), (2, 'M')]`. Returns `None` on a unit
/// without digits or trailing digits without a unit.
fn components(part: &str) -> Option<Vec<(u32, char)>> {
    let mut out = Vec::new();
    let mut digits = String::new();

    for c in part.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
        } else {
            if digits.is_empty() {
                return None;
            }
            out.push((digits.parse().ok()?, c));
            digits.clear();
        }
    }

    digits.is_empty().then_some(out)
}
