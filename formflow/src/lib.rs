//! # formflow
//!
//! Two-way data transformers for form handling.
//!
//! This is the meta-crate that re-exports the formflow crates. Depend on
//! `formflow` for everything, or on `formflow-core` and `formflow-transform`
//! individually.

/// Errors, values, intervals, locales, rounding, signing, settings, and logging.
pub use formflow_core as core;

/// The transformer trait, chains, and every concrete transformer.
pub use formflow_transform as transform;

pub use formflow_core::{FormError, FormResult, Settings, Value};
pub use formflow_transform::prelude;

// Third-party crates that appear in the public API or in logging setup.
pub use chrono;
pub use chrono_tz;
pub use tracing;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn test_reexports_cover_dates_and_logging() {
        use crate::chrono::TimeZone;

        let dt = chrono_tz::Tz::UTC.with_ymd_and_hms(2010, 2, 3, 4, 5, 6).unwrap();
        let t = DateTimeToString::new(None, None, Some("%Y-%m")).unwrap();
        let view = tracing::debug_span!("transform").in_scope(|| t.transform(&Value::DateTime(dt)));
        assert_eq!(view.unwrap(), Value::from("2010-02"));
        assert!(tracing::Level::DEBUG > tracing::Level::INFO);
    }
}
