//! HMAC signing of form values.
//!
//! [`Signer`] computes a lowercase hex HMAC of a string with a secret key and
//! verifies signatures in constant time. Fallback keys are tried after the
//! primary key so secrets can be rotated without invalidating values signed
//! with the previous key.

use std::fmt;
use std::str::FromStr;

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::{Sha256, Sha384, Sha512};

use crate::error::FormError;

type HmacSha256 = Hmac<Sha256>;
type HmacSha384 = Hmac<Sha384>;
type HmacSha512 = Hmac<Sha512>;

/// The hash function behind the HMAC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HmacAlgorithm {
    #[default]
    Sha256,
    Sha384,
    Sha512,
}

impl HmacAlgorithm {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for HmacAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HmacAlgorithm {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sha256" => Ok(Self::Sha256),
            "sha384" => Ok(Self::Sha384),
            "sha512" => Ok(Self::Sha512),
            _ => Err(FormError::InvalidArgument(format!(
                "The hashing algorithm \"{s}\" is not supported."
            ))),
        }
    }
}

// ============================================================
// Signer
// ============================================================

/// Signs and verifies strings with an HMAC.
///
/// # Examples
///
/// ```
/// use formflow_core::signing::{HmacAlgorithm, Signer};
///
/// let signer = Signer::new("ThisIsSecret").with_algorithm(HmacAlgorithm::Sha512);
/// let sig = signer.signature("foobar");
/// assert!(sig.starts_with("e643b257"));
/// assert!(signer.verify("foobar", &sig));
/// assert!(!signer.verify("foobaz", &sig));
/// ```
#[derive(Clone)]
pub struct Signer {
    key: String,
    fallback_keys: Vec<String>,
    algorithm: HmacAlgorithm,
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("key", &"<redacted>")
            .field("fallback_keys", &self.fallback_keys.len())
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

impl Signer {
    /// Creates a SHA-256 signer with the given secret key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            fallback_keys: Vec::new(),
            algorithm: HmacAlgorithm::default(),
        }
    }

    /// Sets the hash function.
    #[must_use]
    pub const fn with_algorithm(mut self, algorithm: HmacAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Sets fallback keys for key rotation.
    #[must_use]
    pub fn with_fallback_keys(mut self, keys: Vec<String>) -> Self {
        self.fallback_keys = keys;
        self
    }

    pub const fn algorithm(&self) -> HmacAlgorithm {
        self.algorithm
    }

    /// Computes the hex signature of a value using the given key.
    fn make_signature(&self, value: &str, key: &str) -> String {
        let bytes = match self.algorithm {
            HmacAlgorithm::Sha256 => {
                let mut mac =
                    HmacSha256::new_from_slice(key.as_bytes()).expect("HMAC accepts any key size");
                mac.update(value.as_bytes());
                mac.finalize().into_bytes().to_vec()
            }
            HmacAlgorithm::Sha384 => {
                let mut mac =
                    HmacSha384::new_from_slice(key.as_bytes()).expect("HMAC accepts any key size");
                mac.update(value.as_bytes());
                mac.finalize().into_bytes().to_vec()
            }
            HmacAlgorithm::Sha512 => {
                let mut mac =
                    HmacSha512::new_from_slice(key.as_bytes()).expect("HMAC accepts any key size");
                mac.update(value.as_bytes());
                mac.finalize().into_bytes().to_vec()
            }
        };
        hex::encode(bytes)
    }

    /// Signs a value with the primary key.
    pub fn signature(&self, value: &str) -> String {
        self.make_signature(value, &self.key)
    }

    /// Verifies a signature against the primary key, then each fallback key.
    pub fn verify(&self, value: &str, signature: &str) -> bool {
        std::iter::once(&self.key)
            .chain(&self.fallback_keys)
            .any(|key| constant_time_eq(signature, &self.make_signature(value, key)))
    }
}

/// Compares two strings without short-circuiting on the first difference.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
