//! PHC codec errors.

use std::fmt;

use thiserror::Error;

use phcpass_core::error::{AppError, ErrorKind};

/// Binary segment of a PHC string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// The salt segment.
    Salt,
    /// The hash segment.
    Hash,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Salt => write!(f, "salt"),
            Self::Hash => write!(f, "hash"),
        }
    }
}

/// Errors raised while decoding or building a PHC record.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The text does not match the PHC grammar.
    #[error("phc: not a valid format: {0:?}")]
    Malformed(String),

    /// A salt or hash segment is not valid unpadded base64.
    #[error("phc: {segment} decoding error: {source}")]
    Encoding {
        /// Which segment failed.
        segment: Segment,
        /// The underlying base64 error.
        #[source]
        source: base64::DecodeError,
    },

    /// A field handed to the record builder violates the grammar.
    #[error("phc: invalid {field}: {value:?}")]
    InvalidField {
        /// Field name (`id`, `version`, `param name`, `param value`,
        /// `leading param`).
        field: &'static str,
        /// The rejected value.
        value: String,
    },
}

impl From<FormatError> for AppError {
    fn from(err: FormatError) -> Self {
        Self::with_source(ErrorKind::Validation, format!("Invalid PHC string: {err}"), err)
    }
}
