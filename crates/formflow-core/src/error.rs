//! Error types for formflow.
//!
//! This module provides [`FormError`], the single error enum returned by every
//! transformer, and [`TransformationFailed`], the payload carried when input
//! does not have the expected shape or fails domain validation.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// Details of a failed transformation.
///
/// `message` describes the failure for developers and logs. The optional
/// `invalid_message` and its parameters form a user-facing message that a
/// form layer may display next to the offending field instead.
///
/// # Examples
///
/// ```
/// use formflow_core::error::TransformationFailed;
///
/// let failure = TransformationFailed::new("Expected a string.")
///     .with_invalid_message("Please enter a valid number.")
///     .with_param("{{ value }}", "foo");
/// assert_eq!(failure.to_string(), "Expected a string.");
/// assert_eq!(failure.invalid_message_parameters.get("{{ value }}").unwrap(), "foo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformationFailed {
    /// The developer-facing failure message.
    pub message: String,
    /// An optional user-facing message.
    pub invalid_message: Option<String>,
    /// Placeholder values for `invalid_message`.
    pub invalid_message_parameters: HashMap<String, String>,
}

impl TransformationFailed {
    /// Creates a new failure with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            invalid_message: None,
            invalid_message_parameters: HashMap::new(),
        }
    }

    /// Sets the user-facing message.
    #[must_use]
    pub fn with_invalid_message(mut self, message: impl Into<String>) -> Self {
        self.invalid_message = Some(message.into());
        self
    }

    /// Adds a placeholder parameter for the user-facing message.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.invalid_message_parameters
            .insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for TransformationFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TransformationFailed {}

/// The error type returned by transformers, the signer, and the settings loader.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    /// The input did not match the expected shape or failed validation.
    #[error("Transformation failed: {0}")]
    TransformationFailed(TransformationFailed),

    /// The input's basic type did not match what the transformer requires.
    #[error("Expected argument of type \"{expected}\", \"{given}\" given")]
    UnexpectedType {
        /// The type the transformer accepts.
        expected: String,
        /// The type that was passed.
        given: String,
    },

    /// A transformer was constructed with invalid options.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Settings could not be loaded or are inconsistent.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl FormError {
    /// Shorthand for a [`FormError::TransformationFailed`] with only a message.
    pub fn transformation_failed(message: impl Into<String>) -> Self {
        Self::TransformationFailed(TransformationFailed::new(message))
    }

    /// Shorthand for a [`FormError::UnexpectedType`].
    pub fn unexpected_type(expected: impl Into<String>, given: impl Into<String>) -> Self {
        Self::UnexpectedType {
            expected: expected.into(),
            given: given.into(),
        }
    }

    /// Returns `true` for [`FormError::TransformationFailed`].
    pub const fn is_transformation_failed(&self) -> bool {
        matches!(self, Self::TransformationFailed(_))
    }

    /// Returns `true` for [`FormError::UnexpectedType`].
    pub const fn is_unexpected_type(&self) -> bool {
        matches!(self, Self::UnexpectedType { .. })
    }

    /// Attaches a user-facing message and the offending `{{ value }}` to a
    /// failed transformation. Other variants are returned unchanged.
    ///
    /// ```
    /// use formflow_core::FormError;
    ///
    /// let err = FormError::transformation_failed("Number parsing failed.")
    ///     .with_invalid_message("Please enter a valid number.", "12a");
    /// assert_eq!(err.message(), "Number parsing failed.");
    /// assert_eq!(err.invalid_message(), Some("Please enter a valid number."));
    /// ```
    #[must_use]
    pub fn with_invalid_message(self, message: impl Into<String>, value: impl Into<String>) -> Self {
        match self {
            Self::TransformationFailed(failure) => Self::TransformationFailed(
                failure
                    .with_invalid_message(message)
                    .with_param("{{ value }}", value),
            ),
            other => other,
        }
    }

    /// The user-facing message, if one was attached.
    pub fn invalid_message(&self) -> Option<&str> {
        match self {
            Self::TransformationFailed(failure) => failure.invalid_message.as_deref(),
            _ => None,
        }
    }

    /// Returns the bare failure message, without the variant prefix.
    pub fn message(&self) -> String {
        match self {
            Self::TransformationFailed(failure) => failure.message.clone(),
            Self::InvalidArgument(msg) | Self::ConfigurationError(msg) => msg.clone(),
            Self::UnexpectedType { .. } => self.to_string(),
        }
    }
}

impl From<TransformationFailed> for FormError {
    fn from(failure: TransformationFailed) -> Self {
        Self::TransformationFailed(failure)
    }
}

/// A convenience type alias for `Result<T, FormError>`.
pub type FormResult<T> = Result<T, FormError>;
