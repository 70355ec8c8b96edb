//! Logging integration for formflow.
//!
//! Provides helpers for configuring [`tracing`]-based logging from
//! [`Settings`](crate::settings::Settings) and for creating per-transformer
//! spans.

use crate::settings::Settings;

/// Sets up the global tracing subscriber based on the given settings.
///
/// The filter is read from `settings.log_level` (e.g. "debug",
/// "formflow_transform=trace"). In debug mode a pretty, human-readable
/// format is used; otherwise a structured JSON format is used. Installing a
/// second subscriber is a no-op.
pub fn setup_logging(settings: &Settings) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
            .ok();
    }
}

/// The direction a transformer is applied in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Model to view.
    Transform,
    /// View to model.
    Reverse,
}

impl Direction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transform => "transform",
            Self::Reverse => "reverse_transform",
        }
    }
}

/// Creates a tracing span for one transformer application.
///
/// # Examples
///
/// ```
/// use formflow_core::logging::{transformer_span, Direction};
///
/// let span = transformer_span("NumberToLocalizedString", Direction::Reverse);
/// let _guard = span.enter();
/// tracing::trace!("parsing number");
/// ```
pub fn transformer_span(name: &str, direction: Direction) -> tracing::Span {
    tracing::trace_span!("transformer", transformer = name, direction = direction.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_logging_is_idempotent() {
        let settings = Settings {
            log_level: "not a [valid filter".into(),
            ..Settings::default()
        };
        setup_logging(&settings);
        setup_logging(&Settings::default());
    }

    #[test]
    fn test_direction_names() {
        assert_eq!(Direction::Transform.as_str(), "transform");
        assert_eq!(Direction::Reverse.as_str(), "reverse_transform");
    }

    #[test]
    fn test_transformer_span_enters() {
        let span = transformer_span("Chain", Direction::Transform);
        let _guard = span.enter();
        tracing::trace!("inside span");
    }
}
