//! Error types for the hash and verify paths.

use std::num::ParseIntError;

use thiserror::Error;

use phcpass_core::error::{AppError, ErrorKind};

use crate::phc::FormatError;

/// The parameter list does not follow the `m, t, p` schema.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Wrong number of parameters.
    #[error("invalid parameter count: {found}")]
    ParamCount {
        /// Number of parameters found.
        found: usize,
    },

    /// Parameters misnamed or out of order.
    #[error("parameters should be in the order: m, t, p (found: {})", .found.join(", "))]
    ParamOrder {
        /// Names found, in order.
        found: Vec<String>,
    },

    /// A value is not an unsigned integer of the expected width.
    #[error("{field} parameter decode error: {value:?}")]
    ParamValue {
        /// Offending field (`memory`, `time`, `parallelism`).
        field: &'static str,
        /// The raw value.
        value: String,
        /// Integer parse failure, absent when the value has non-digit characters.
        #[source]
        source: Option<ParseIntError>,
    },
}

/// A decoded binary field does not fit the parameter model.
#[derive(Debug, Error)]
pub enum EncodingError {
    /// The hash length does not fit a 32-bit key length.
    #[error("hash is too long: {length}")]
    HashTooLong {
        /// Decoded hash length in bytes.
        length: usize,
    },
}

/// Salt generation failed.
#[derive(Debug, Error)]
#[error("salt generation error: {message}")]
pub struct SaltError {
    message: String,
}

impl SaltError {
    /// Creates a salt error with the given cause.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The key derivation function rejected its inputs.
#[derive(Debug, Error)]
pub enum KdfError {
    /// Error reported by the Argon2 implementation.
    #[error("argon2: {0}")]
    Argon2(#[from] argon2::Error),

    /// Error reported by another KDF implementation.
    #[error("{0}")]
    Other(String),
}

/// Errors on the hash path.
#[derive(Debug, Error)]
pub enum HashError {
    /// The salt generator failed.
    #[error(transparent)]
    SaltGeneration(#[from] SaltError),

    /// The KDF failed.
    #[error("derivation error: {0}")]
    Derivation(#[from] KdfError),

    /// The KDF reported an identifier that is not valid PHC.
    #[error("PHC encode error: {0}")]
    Format(#[from] FormatError),
}

/// Errors on the verify path. A wrong password is `Ok(false)`, not an error.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// The stored string is not valid PHC.
    #[error("PHC decode error: {0}")]
    Format(#[from] FormatError),

    /// The stored string names another algorithm.
    #[error("unsupported hashing function: {found}")]
    UnsupportedAlgorithm {
        /// Identifier found in the string.
        found: String,
    },

    /// The stored string carries another version.
    #[error("unsupported version: {found:?} (expected {expected:?})")]
    UnsupportedVersion {
        /// Version found, empty when absent.
        found: String,
        /// Version this hasher produces.
        expected: String,
    },

    /// The parameter list does not match the schema.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The decoded hash cannot be described by the parameters.
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// The string has no salt segment.
    #[error("missing salt")]
    MissingSalt,

    /// The string has no hash segment.
    #[error("missing hash")]
    MissingHash,

    /// Re-deriving the hash failed.
    #[error(transparent)]
    Hash(#[from] HashError),
}

impl From<HashError> for AppError {
    fn from(err: HashError) -> Self {
        let kind = match err {
            HashError::Format(_) => ErrorKind::Internal,
            _ => ErrorKind::Crypto,
        };
        Self::with_source(kind, format!("Password hashing failed: {err}"), err)
    }
}

impl From<VerifyError> for AppError {
    fn from(err: VerifyError) -> Self {
        let kind = match err {
            VerifyError::UnsupportedAlgorithm { .. } | VerifyError::UnsupportedVersion { .. } => {
                ErrorKind::Unsupported
            }
            VerifyError::Hash(_) => ErrorKind::Crypto,
            _ => ErrorKind::Validation,
        };
        Self::with_source(kind, format!("Password verification failed: {err}"), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_maps_to_unsupported_kind() {
        let err: AppError = VerifyError::UnsupportedAlgorithm {
            found: "bcrypt".to_string(),
        }
        .into();
        assert_eq!(err.kind, ErrorKind::Unsupported);
        assert!(err.message.contains("bcrypt"));
    }

    #[test]
    fn test_salt_error_maps_to_crypto_kind() {
        let err: AppError = HashError::from(SaltError::new("no entropy")).into();
        assert_eq!(err.kind, ErrorKind::Crypto);
    }

    #[test]
    fn test_param_order_lists_found_names() {
        let err = ValidationError::ParamOrder {
            found: vec!["t".into(), "m".into(), "p".into()],
        };
        assert_eq!(
            err.to_string(),
            "parameters should be in the order: m, t, p (found: t, m, p)"
        );
    }
}
