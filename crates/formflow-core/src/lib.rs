//! # formflow-core
//!
//! Core types shared by every formflow crate. This crate has no knowledge of
//! individual transformers and provides the foundation for them.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`value`] - The dynamic [`Value`] passed between model and view
//! - [`interval`] - Calendar-aware [`DateInterval`]
//! - [`locale`] - Locale number symbols
//! - [`rounding`] - Rounding modes for number formatting
//! - [`timezone`] - IANA time zone lookup and local time resolution
//! - [`signing`] - HMAC signatures with key rotation
//! - [`settings`] / [`settings_loader`] - Configuration and its loaders
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod interval;
pub mod locale;
pub mod logging;
pub mod rounding;
pub mod settings;
pub mod settings_loader;
pub mod signing;
pub mod timezone;
pub mod value;

// Re-export the most commonly used types at the crate root.
pub use error::{FormError, FormResult, TransformationFailed};
pub use interval::DateInterval;
pub use locale::{Locale, NumberSymbols};
pub use rounding::RoundingMode;
pub use settings::Settings;
pub use value::Value;
