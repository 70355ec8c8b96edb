//! Settings for transformer construction.
//!
//! [`Settings`] holds the defaults a transformer factory applies: locale,
//! time zone, grouping, rounding, and the signing secret. There is no global
//! instance; load a value with [`settings_loader`](crate::settings_loader)
//! and pass it where it is needed.

use serde::{Deserialize, Serialize};

use crate::rounding::RoundingMode;
use crate::signing::HmacAlgorithm;

/// The complete set of formflow settings.
///
/// # Examples
///
/// ```
/// use formflow_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert_eq!(settings.locale, "en");
/// assert_eq!(settings.time_zone, "UTC");
/// assert!(!settings.grouping);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled. Selects pretty log output.
    pub debug: bool,
    /// The log filter directive (e.g. "info", "formflow_transform=trace").
    pub log_level: String,

    // ── Localization ─────────────────────────────────────────────────

    /// The locale used for number symbols (e.g. "de_AT").
    pub locale: String,
    /// The default IANA time zone for date-time transformers.
    pub time_zone: String,
    /// Whether number transformers group thousands by default.
    pub grouping: bool,
    /// The default rounding mode for number transformers.
    pub rounding_mode: RoundingMode,

    // ── Signing ──────────────────────────────────────────────────────

    /// The secret used to sign values.
    pub secret_key: String,
    /// Previous secrets still accepted when verifying.
    pub fallback_keys: Vec<String>,
    /// The HMAC hash function.
    pub hmac_algorithm: HmacAlgorithm,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: false,
            log_level: "info".to_string(),
            locale: "en".to_string(),
            time_zone: "UTC".to_string(),
            grouping: false,
            rounding_mode: RoundingMode::HalfUp,
            secret_key: String::new(),
            fallback_keys: Vec::new(),
            hmac_algorithm: HmacAlgorithm::Sha256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(!settings.debug);
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.rounding_mode, RoundingMode::HalfUp);
        assert_eq!(settings.hmac_algorithm, HmacAlgorithm::Sha256);
        assert!(settings.secret_key.is_empty());
        assert!(settings.fallback_keys.is_empty());
    }

    #[test]
    fn test_serde_round_trip() {
        let settings = Settings {
            locale: "de_AT".into(),
            rounding_mode: RoundingMode::HalfEven,
            ..Settings::default()
        };
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["rounding_mode"], "half_even");
        assert_eq!(json["hmac_algorithm"], "sha256");
        let back: Settings = serde_json::from_value(json).unwrap();
        assert_eq!(back, settings);
    }
}
