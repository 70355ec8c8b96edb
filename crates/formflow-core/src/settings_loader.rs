//! Settings loading from configuration files.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `FORMFLOW_DEBUG` | `debug` |
//! | `FORMFLOW_LOG_LEVEL` | `log_level` |
//! | `FORMFLOW_LOCALE` | `locale` |
//! | `FORMFLOW_TIME_ZONE` | `time_zone` |
//! | `FORMFLOW_GROUPING` | `grouping` |
//! | `FORMFLOW_ROUNDING_MODE` | `rounding_mode` |
//! | `FORMFLOW_SECRET_KEY` | `secret_key` |
//! | `FORMFLOW_FALLBACK_KEYS` | `fallback_keys` (comma-separated) |
//! | `FORMFLOW_HMAC_ALGORITHM` | `hmac_algorithm` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use formflow_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file("config/formflow.toml").unwrap();
//! let settings = settings_loader::from_toml_file_with_env("config/formflow.toml").unwrap();
//! ```

use std::path::Path;

use crate::error::FormError;
use crate::settings::Settings;

/// Loads settings from a TOML string.
///
/// Fields not present in the TOML keep their default values.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or cannot be deserialized.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, FormError> {
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| FormError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;

    merge_over_defaults(toml_to_json(toml_value), "TOML")
}

/// Loads settings from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, FormError> {
    from_toml_str(&read_file(path.as_ref(), "TOML")?)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, FormError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or cannot be deserialized.
pub fn from_json_str(json_str: &str) -> Result<Settings, FormError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| FormError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;

    merge_over_defaults(json_value, "JSON")
}

/// Loads settings from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the JSON is malformed.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, FormError> {
    from_json_str(&read_file(path.as_ref(), "JSON")?)
}

/// Loads settings from a JSON file and then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the JSON is malformed.
pub fn from_json_file_with_env(path: impl AsRef<Path>) -> Result<Settings, FormError> {
    let mut settings = from_json_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies `FORMFLOW_*` environment variable overrides to a settings struct.
///
/// Boolean variables accept "true"/"1"/"yes". Values that fail to parse
/// (an unknown rounding mode, say) are logged and ignored.
pub fn apply_env_overrides(settings: &mut Settings) {
    apply_overrides_from(settings, |name| std::env::var(name).ok());
}

fn apply_overrides_from<F>(settings: &mut Settings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("FORMFLOW_DEBUG") {
        settings.debug = parse_bool(&val);
    }

    if let Some(val) = lookup("FORMFLOW_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Some(val) = lookup("FORMFLOW_LOCALE") {
        settings.locale = val;
    }

    if let Some(val) = lookup("FORMFLOW_TIME_ZONE") {
        settings.time_zone = val;
    }

    if let Some(val) = lookup("FORMFLOW_GROUPING") {
        settings.grouping = parse_bool(&val);
    }

    if let Some(val) = lookup("FORMFLOW_ROUNDING_MODE") {
        match val.parse() {
            Ok(mode) => settings.rounding_mode = mode,
            Err(e) => tracing::warn!(value = %val, error = %e, "Ignoring FORMFLOW_ROUNDING_MODE"),
        }
    }

    if let Some(val) = lookup("FORMFLOW_SECRET_KEY") {
        settings.secret_key = val;
    }

    if let Some(val) = lookup("FORMFLOW_FALLBACK_KEYS") {
        settings.fallback_keys = val
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }

    if let Some(val) = lookup("FORMFLOW_HMAC_ALGORITHM") {
        match val.parse() {
            Ok(algorithm) => settings.hmac_algorithm = algorithm,
            Err(e) => tracing::warn!(value = %val, error = %e, "Ignoring FORMFLOW_HMAC_ALGORITHM"),
        }
    }
}

// ============================================================
// Helpers
// ============================================================

fn parse_bool(val: &str) -> bool {
    matches!(val.to_lowercase().as_str(), "true" | "1" | "yes")
}

fn read_file(path: &Path, kind: &str) -> Result<String, FormError> {
    std::fs::read_to_string(path).map_err(|e| {
        FormError::ConfigurationError(format!(
            "Failed to read {kind} file '{}': {e}",
            path.display()
        ))
    })
}

fn merge_over_defaults(value: serde_json::Value, kind: &str) -> Result<Settings, FormError> {
    let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
        FormError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, value);
    serde_json::from_value(merged).map_err(|e| {
        FormError::ConfigurationError(format!("Failed to deserialize settings from {kind}: {e}"))
    })
}

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => serde_json::Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = match base_map.remove(&key) {
                    Some(base_v) => merge_json(base_v, override_v),
                    None => override_v,
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}
