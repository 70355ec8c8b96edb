//! Signed values that survive a round trip through the client untampered.

use formflow_core::signing::{HmacAlgorithm, Signer};
use formflow_core::{FormError, FormResult, Value};

use crate::transformer::DataTransformer;

/// Transforms a value into a map carrying the value and its HMAC signature.
///
/// The signature covers the string cast of the value, so the model value
/// `42` and the view value `"42"` verify alike. Reading the map back
/// verifies the signature against the primary key and each fallback key,
/// then returns the data unchanged.
///
/// ```
/// use formflow_core::signing::Signer;
/// use formflow_core::Value;
/// use formflow_transform::signed::ValueToSigned;
/// use formflow_transform::transformer::DataTransformer;
///
/// let t = ValueToSigned::new("data", "signature", Signer::new("secret"));
/// let signed = t.transform(&Value::from("foobar")).unwrap();
/// assert_eq!(signed.get("data"), Some(&Value::from("foobar")));
/// assert_eq!(t.reverse_transform(&signed).unwrap(), Value::from("foobar"));
/// ```
#[derive(Debug, Clone)]
pub struct ValueToSigned {
    data_key: String,
    signature_key: String,
    signer: Signer,
}

impl ValueToSigned {
    pub fn new(data_key: impl Into<String>, signature_key: impl Into<String>, signer: Signer) -> Self {
        Self {
            data_key: data_key.into(),
            signature_key: signature_key.into(),
            signer,
        }
    }

    /// Builds a transformer from a secret and an algorithm name such as
    /// `"sha512"`.
    pub fn from_secret(
        data_key: impl Into<String>,
        signature_key: impl Into<String>,
        secret: impl Into<String>,
        algorithm: &str,
    ) -> FormResult<Self> {
        let algorithm: HmacAlgorithm = algorithm.parse()?;
        Ok(Self::new(
            data_key,
            signature_key,
            Signer::new(secret).with_algorithm(algorithm),
        ))
    }

    /// Accepts signatures made with previous secrets.
    #[must_use]
    pub fn with_fallback_keys(mut self, keys: Vec<String>) -> Self {
        self.signer = self.signer.with_fallback_keys(keys);
        self
    }

    pub const fn signer(&self) -> &Signer {
        &self.signer
    }
}

impl DataTransformer for ValueToSigned {
    fn transform(&self, value: &Value) -> FormResult<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        let signature = self.signer.signature(&value.to_string());
        Ok(Value::map([
            (self.data_key.clone(), value.clone()),
            (self.signature_key.clone(), Value::String(signature)),
        ]))
    }

    fn reverse_transform(&self, value: &Value) -> FormResult<Value> {
        let map = match value {
            Value::Null => return Ok(Value::Null),
            Value::Map(map) => map,
            _ => return Err(FormError::transformation_failed("Expected an array.")),
        };

        let field = |key: &str| {
            map.get(key).ok_or_else(|| {
                FormError::transformation_failed(format!("The key \"{key}\" is missing."))
            })
        };
        let data = field(&self.data_key)?;
        let signature = field(&self.signature_key)?;

        if !self.signer.verify(&data.to_string(), &signature.to_string()) {
            tracing::warn!(data_key = %self.data_key, "rejected a value with an invalid signature");
            return Err(FormError::transformation_failed("The signature is invalid."));
        }
        Ok(data.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOOBAR_SHA512: &str = "e643b257dce7856e96027a0df2e58fa91d9a3d01517a3010af7adcc212aa286eb1e13ad62c441367c8a55f7970e078d1998dfbeab6ebf1d80990e27cd98cb81c";

    fn transformer() -> ValueToSigned {
        ValueToSigned::from_secret("data", "signature", "ThisIsSecret", "sha512").unwrap()
    }

    #[test]
    fn test_transform() {
        let signed = transformer().transform(&Value::from("foobar")).unwrap();
        assert_eq!(
            signed,
            Value::map([("data", "foobar"), ("signature", FOOBAR_SHA512)])
        );
        assert_eq!(transformer().transform(&Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn test_reverse_transform() {
        let input = Value::map([("data", "foobar"), ("signature", FOOBAR_SHA512)]);
        assert_eq!(transformer().reverse_transform(&input).unwrap(), Value::from("foobar"));
        assert_eq!(transformer().reverse_transform(&Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn test_signature_covers_string_cast() {
        let t = transformer();
        let signed = t.transform(&Value::Int(42)).unwrap();
        let view = Value::map([("data", Value::from("42")), ("signature", signed.get("signature").cloned().unwrap())]);
        assert_eq!(t.reverse_transform(&view).unwrap(), Value::from("42"));
    }

    #[test]
    fn test_tampered_data() {
        let input = Value::map([("data", "foobaz"), ("signature", FOOBAR_SHA512)]);
        let err = transformer().reverse_transform(&input).unwrap_err();
        assert!(err.is_transformation_failed());
        assert_eq!(err.message(), "The signature is invalid.");
    }

    #[test]
    fn test_wrong_secret() {
        let other = ValueToSigned::from_secret("data", "signature", "OtherSecret", "sha512").unwrap();
        let signed = other.transform(&Value::from("foobar")).unwrap();
        assert!(transformer().reverse_transform(&signed).is_err());
    }

    #[test]
    fn test_fallback_key() {
        let old = ValueToSigned::from_secret("data", "signature", "OldSecret", "sha512").unwrap();
        let signed = old.transform(&Value::from("foobar")).unwrap();
        let rotated = transformer().with_fallback_keys(vec!["OldSecret".to_string()]);
        assert_eq!(rotated.reverse_transform(&signed).unwrap(), Value::from("foobar"));
    }

    #[test]
    fn test_missing_keys() {
        let err = transformer()
            .reverse_transform(&Value::map([("signature", FOOBAR_SHA512)]))
            .unwrap_err();
        assert_eq!(err.message(), "The key \"data\" is missing.");
        let err = transformer()
            .reverse_transform(&Value::map([("data", "foobar")]))
            .unwrap_err();
        assert_eq!(err.message(), "The key \"signature\" is missing.");
    }

    #[test]
    fn test_reverse_transform_requires_array() {
        let err = transformer().reverse_transform(&Value::from("foobar")).unwrap_err();
        assert_eq!(err.message(), "Expected an array.");
    }

    #[test]
    fn test_unsupported_algorithm() {
        let err = ValueToSigned::from_secret("data", "signature", "secret", "md5").unwrap_err();
        assert_eq!(err.message(), "The hashing algorithm \"md5\" is not supported.");
    }
}
