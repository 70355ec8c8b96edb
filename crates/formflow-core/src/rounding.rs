//! Rounding modes for number formatting and parsing.
//!
//! Formatting rounds the decimal digits of a number directly, so `123.45`
//! rounded half-even to one digit gives `123.4` even though the nearest
//! binary double sits slightly below the half. Parsing rounds floats after
//! normalizing them to 14 significant digits, which absorbs the error that
//! scaling by powers of ten introduces.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FormError;

/// How to round a number that has more fraction digits than allowed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Towards positive infinity.
    Ceiling,
    /// Towards negative infinity.
    Floor,
    /// Away from zero.
    Up,
    /// Towards zero.
    Down,
    /// Halves go to the nearest even digit.
    HalfEven,
    /// Halves go away from zero.
    #[default]
    HalfUp,
    /// Halves go towards zero.
    HalfDown,
}

impl RoundingMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ceiling => "ceiling",
            Self::Floor => "floor",
            Self::Up => "up",
            Self::Down => "down",
            Self::HalfEven => "half_even",
            Self::HalfUp => "half_up",
            Self::HalfDown => "half_down",
        }
    }

    /// Decides whether a truncated magnitude must be bumped by one unit.
    ///
    /// `first_dropped` is the first discarded digit, `rest_nonzero` tells
    /// whether any later discarded digit is non-zero and `last_kept_odd` is
    /// the parity of the last kept digit.
    const fn rounds_up(
        self,
        negative: bool,
        first_dropped: u8,
        rest_nonzero: bool,
        last_kept_odd: bool,
    ) -> bool {
        let any_dropped = first_dropped != 0 || rest_nonzero;
        match self {
            Self::Ceiling => any_dropped && !negative,
            Self::Floor => any_dropped && negative,
            Self::Up => any_dropped,
            Self::Down => false,
            Self::HalfUp => first_dropped >= 5,
            Self::HalfDown => first_dropped > 5 || (first_dropped == 5 && rest_nonzero),
            Self::HalfEven => {
                first_dropped > 5 || (first_dropped == 5 && (rest_nonzero || last_kept_odd))
            }
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoundingMode {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "ceiling" => Ok(Self::Ceiling),
            "floor" => Ok(Self::Floor),
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "halfeven" => Ok(Self::HalfEven),
            "halfup" => Ok(Self::HalfUp),
            "halfdown" => Ok(Self::HalfDown),
            _ => Err(FormError::InvalidArgument(format!(
                "Unknown rounding mode \"{s}\"."
            ))),
        }
    }
}

/// Rounds a plain decimal string (`-123.45`, no exponent) to exactly
/// `scale` fraction digits.
///
/// The result keeps a leading `-` only when it is non-zero.
///
/// ```
/// use formflow_core::rounding::{round_decimal_str, RoundingMode};
///
/// assert_eq!(round_decimal_str("123.45", 1, RoundingMode::HalfEven), "123.4");
/// assert_eq!(round_decimal_str("-1234.5", 0, RoundingMode::Floor), "-1235");
/// assert_eq!(round_decimal_str("1234.5", 2, RoundingMode::Down), "1234.50");
/// ```
pub fn round_decimal_str(repr: &str, scale: usize, mode: RoundingMode) -> String {
    let (negative, body) = match repr.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, repr),
    };
    let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(scale))
        .map(|b| b - b'0')
        .collect();
    let kept_frac = frac_part.len().min(scale);
    digits.extend(std::iter::repeat(0).take(scale - kept_frac));

    if frac_part.len() > scale {
        let dropped = &frac_part.as_bytes()[scale..];
        let first_dropped = dropped[0] - b'0';
        let rest_nonzero = dropped[1..].iter().any(|&b| b != b'0');
        let last_kept_odd = digits.last().is_some_and(|d| d % 2 == 1);

        if mode.rounds_up(negative, first_dropped, rest_nonzero, last_kept_odd) {
            increment(&mut digits);
        }
    }

    let int_len = digits.len() - scale;
    let mut out = String::with_capacity(digits.len() + 2);
    if negative && digits.iter().any(|&d| d != 0) {
        out.push('-');
    }
    for (i, d) in digits.iter().enumerate() {
        if i == int_len {
            out.push('.');
        }
        out.push(char::from(b'0' + d));
    }
    if int_len == 0 {
        out.insert(usize::from(out.starts_with('-')), '0');
    }
    out
}

/// Adds one unit in the last place, carrying leftwards.
fn increment(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d == 9 {
            *d = 0;
        } else {
            *d += 1;
            return;
        }
    }
    digits.insert(0, 1);
}

/// Normalizes a float to 14 significant digits.
pub fn normalize_precision(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.13e}").parse().unwrap_or(value)
}

/// Rounds `value * coefficient` to an integer with `mode` and divides the
/// coefficient back out.
///
/// ```
/// use formflow_core::rounding::{round_f64, RoundingMode};
///
/// assert_eq!(round_f64(123.45, 10.0, RoundingMode::HalfUp), 123.5);
/// assert_eq!(round_f64(37.37, 100.0, RoundingMode::Down), 37.37);
/// ```
pub fn round_f64(value: f64, coefficient: f64, mode: RoundingMode) -> f64 {
    let scaled = normalize_precision(value * coefficient);
    let is_half = (scaled - scaled.trunc()).abs() == 0.5;

    let rounded = match mode {
        RoundingMode::Ceiling => scaled.ceil(),
        RoundingMode::Floor => scaled.floor(),
        RoundingMode::Up => {
            if scaled > 0.0 {
                scaled.ceil()
            } else {
                scaled.floor()
            }
        }
        RoundingMode::Down => scaled.trunc(),
        RoundingMode::HalfUp => scaled.round(),
        RoundingMode::HalfDown => {
            if is_half {
                scaled.trunc()
            } else {
                scaled.round()
            }
        }
        RoundingMode::HalfEven => {
            if is_half {
                let floor = scaled.floor();
                if floor % 2.0 == 0.0 {
                    floor
                } else {
                    floor + 1.0
                }
            } else {
                scaled.round()
            }
        }
    };

    rounded / coefficient
}
