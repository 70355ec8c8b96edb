//! Builds transformers from loaded [`Settings`].
//!
//! The factory reads the settings once and hands their locale, time zone,
//! grouping, rounding mode, and signing secret to each transformer it
//! builds. Nothing is read from process-wide state afterwards.
//!
//! The configured grouping applies to every number transformer the factory
//! builds, percentages included, even though a hand-built
//! [`PercentToLocalizedString`] groups by default.
//!
//! ```
//! use formflow_core::Settings;
//! use formflow_core::Value;
//! use formflow_transform::factory::TransformerFactory;
//! use formflow_transform::transformer::DataTransformer;
//!
//! let settings = Settings {
//!     locale: "de_AT".to_string(),
//!     ..Settings::default()
//! };
//! let factory = TransformerFactory::from_settings(&settings).unwrap();
//! let t = factory.number().with_scale(2);
//! assert_eq!(t.transform(&Value::Float(1.5)).unwrap(), Value::from("1,50"));
//! ```

use chrono_tz::Tz;

use formflow_core::locale::Locale;
use formflow_core::signing::Signer;
use formflow_core::timezone::parse_timezone;
use formflow_core::{FormError, FormResult, RoundingMode, Settings};

use crate::datetime::{
    DateTimeToArray, DateTimeToHtml5LocalDateTime, DateTimeToRfc3339, DateTimeToString,
    DateTimeToTimestamp,
};
use crate::number::{
    IntegerToLocalizedString, MoneyToLocalizedString, NumberToLocalizedString,
    PercentToLocalizedString,
};
use crate::signed::ValueToSigned;

/// Creates transformers preconfigured from settings.
#[derive(Debug, Clone)]
pub struct TransformerFactory {
    locale: Locale,
    time_zone: Tz,
    grouping: bool,
    rounding_mode: RoundingMode,
    signer: Option<Signer>,
}

impl TransformerFactory {
    /// Validates the settings and captures what transformers need from them.
    pub fn from_settings(settings: &Settings) -> FormResult<Self> {
        let time_zone = parse_timezone(&settings.time_zone).map_err(|_| {
            FormError::ConfigurationError(format!(
                "Unknown time zone \"{}\" in settings.",
                settings.time_zone
            ))
        })?;
        let locale = Locale::new(&settings.locale);

        let signer = (!settings.secret_key.is_empty()).then(|| {
            Signer::new(settings.secret_key.clone())
                .with_algorithm(settings.hmac_algorithm)
                .with_fallback_keys(settings.fallback_keys.clone())
        });

        tracing::debug!(
            locale = locale.tag(),
            time_zone = time_zone.name(),
            grouping = settings.grouping,
            rounding_mode = settings.rounding_mode.as_str(),
            signing = signer.is_some(),
            "transformer factory configured"
        );

        Ok(Self {
            locale,
            time_zone,
            grouping: settings.grouping,
            rounding_mode: settings.rounding_mode,
            signer,
        })
    }

    pub const fn locale(&self) -> &Locale {
        &self.locale
    }

    pub const fn time_zone(&self) -> Tz {
        self.time_zone
    }

    // ── Numbers ─────────────────────────────────────────────────────

    pub fn number(&self) -> NumberToLocalizedString {
        NumberToLocalizedString::new(self.locale.clone())
            .with_grouping(self.grouping)
            .with_rounding_mode(self.rounding_mode)
    }

    pub fn integer(&self) -> IntegerToLocalizedString {
        IntegerToLocalizedString::new(self.locale.clone()).with_grouping(self.grouping)
    }

    pub fn money(&self) -> MoneyToLocalizedString {
        MoneyToLocalizedString::new(self.locale.clone())
            .with_grouping(self.grouping)
            .with_rounding_mode(self.rounding_mode)
    }

    /// A percent transformer with the configured grouping and rounding.
    ///
    /// Grouping follows the settings (off by default), not the
    /// transformer's own default.
    pub fn percent(&self) -> PercentToLocalizedString {
        PercentToLocalizedString::new(self.locale.clone())
            .with_grouping(self.grouping)
            .with_rounding_mode(Some(self.rounding_mode))
    }

    // ── Date-times ──────────────────────────────────────────────────
    //
    // Model and view both use the configured zone.

    fn zone(&self) -> Option<&'static str> {
        Some(self.time_zone.name())
    }

    pub fn date_time_to_string(&self, format: Option<&str>) -> FormResult<DateTimeToString> {
        DateTimeToString::new(self.zone(), self.zone(), format)
    }

    pub fn date_time_to_array(&self) -> FormResult<DateTimeToArray> {
        DateTimeToArray::new(self.zone(), self.zone())
    }

    pub fn date_time_to_rfc3339(&self) -> FormResult<DateTimeToRfc3339> {
        DateTimeToRfc3339::new(self.zone(), self.zone())
    }

    pub fn date_time_to_timestamp(&self) -> FormResult<DateTimeToTimestamp> {
        DateTimeToTimestamp::new(self.zone(), self.zone())
    }

    pub fn date_time_to_html5(&self) -> FormResult<DateTimeToHtml5LocalDateTime> {
        DateTimeToHtml5LocalDateTime::new(self.zone(), self.zone())
    }

    // ── Signing ─────────────────────────────────────────────────────

    /// A signed-value transformer using the configured secret.
    ///
    /// Fails when the settings carry no secret key.
    pub fn signed(&self, data_key: &str, signature_key: &str) -> FormResult<ValueToSigned> {
        let signer = self.signer.clone().ok_or_else(|| {
            FormError::ConfigurationError("A secret key is required to sign values.".to_string())
        })?;
        Ok(ValueToSigned::new(data_key, signature_key, signer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transformer::DataTransformer;
    use chrono::TimeZone;
    use formflow_core::Value;

    #[test]
    fn test_defaults() {
        let factory = TransformerFactory::from_settings(&Settings::default()).unwrap();
        assert_eq!(factory.locale().tag(), "en");
        assert_eq!(factory.time_zone(), Tz::UTC);
        assert!(factory.signed("data", "signature").is_err());
    }

    #[test]
    fn test_invalid_time_zone() {
        let settings = Settings {
            time_zone: "Mars/Olympus".to_string(),
            ..Settings::default()
        };
        let err = TransformerFactory::from_settings(&settings).unwrap_err();
        assert!(matches!(err, FormError::ConfigurationError(_)));
        assert_eq!(err.message(), "Unknown time zone \"Mars/Olympus\" in settings.");
    }

    #[test]
    fn test_number_uses_grouping_and_locale() {
        let settings = Settings {
            locale: "de_DE".to_string(),
            grouping: true,
            ..Settings::default()
        };
        let factory = TransformerFactory::from_settings(&settings).unwrap();
        let t = factory.number().with_scale(2);
        assert_eq!(t.transform(&Value::Float(1234.5)).unwrap(), Value::from("1.234,50"));
    }

    #[test]
    fn test_percent_grouping_follows_settings() {
        let hand_built = PercentToLocalizedString::new(Locale::new("en"));
        assert_eq!(hand_built.transform(&Value::Float(12.5)).unwrap(), Value::from("1,250"));

        let factory = TransformerFactory::from_settings(&Settings::default()).unwrap();
        let t = factory.percent();
        assert_eq!(t.transform(&Value::Float(12.5)).unwrap(), Value::from("1250"));
        assert_eq!(t.reverse_transform(&Value::from("1250")).unwrap(), Value::Float(12.5));

        let settings = Settings {
            grouping: true,
            ..Settings::default()
        };
        let factory = TransformerFactory::from_settings(&settings).unwrap();
        assert_eq!(factory.percent().transform(&Value::Float(12.5)).unwrap(), Value::from("1,250"));
    }

    #[test]
    fn test_date_time_uses_time_zone() {
        let settings = Settings {
            time_zone: "America/New_York".to_string(),
            ..Settings::default()
        };
        let factory = TransformerFactory::from_settings(&settings).unwrap();
        let t = factory.date_time_to_string(None).unwrap();
        let dt = Tz::UTC.with_ymd_and_hms(2010, 2, 3, 16, 5, 6).unwrap();
        assert_eq!(t.transform(&Value::DateTime(dt)).unwrap(), Value::from("2010-02-03 11:05:06"));
    }

    #[test]
    fn test_signed_uses_secret() {
        let settings = Settings {
            secret_key: "ThisIsSecret".to_string(),
            fallback_keys: vec!["OldSecret".to_string()],
            hmac_algorithm: formflow_core::signing::HmacAlgorithm::Sha512,
            ..Settings::default()
        };
        let factory = TransformerFactory::from_settings(&settings).unwrap();
        let t = factory.signed("data", "signature").unwrap();
        let signed = t.transform(&Value::from("foobar")).unwrap();
        assert_eq!(t.reverse_transform(&signed).unwrap(), Value::from("foobar"));

        let old = ValueToSigned::from_secret("data", "signature", "OldSecret", "sha512").unwrap();
        let legacy = old.transform(&Value::from("foobar")).unwrap();
        assert_eq!(t.reverse_transform(&legacy).unwrap(), Value::from("foobar"));
    }
}
