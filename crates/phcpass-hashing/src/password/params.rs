//! Binding between Argon2id parameters and the PHC parameter list.

use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use phcpass_core::config::hasher::HasherConfig;

use super::error::{EncodingError, ValidationError};
use crate::phc::PhcParam;

/// Parameter names, in wire order.
pub const PARAM_ORDER: [&str; 3] = ["m", "t", "p"];

/// Typed Argon2id tuning parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameters {
    /// Memory cost in KiB.
    pub memory: u32,
    /// Number of passes.
    pub time: u32,
    /// Number of lanes.
    pub parallelism: u8,
    /// Derived key length in bytes. Not part of the parameter list.
    pub key_length: u32,
}

impl Default for Parameters {
    fn default() -> Self {
        Self::from(&HasherConfig::default())
    }
}

impl From<&HasherConfig> for Parameters {
    fn from(config: &HasherConfig) -> Self {
        Self {
            memory: config.memory_cost,
            time: config.time_cost,
            parallelism: config.parallelism,
            key_length: config.key_length,
        }
    }
}

impl Parameters {
    /// Binds an `m, t, p` parameter list.
    ///
    /// The key length is not carried by the list and is supplied by the
    /// caller, usually from [`key_length_for`].
    pub fn from_pairs(pairs: &[PhcParam], key_length: u32) -> Result<Self, ValidationError> {
        if pairs.len() != PARAM_ORDER.len() {
            return Err(ValidationError::ParamCount { found: pairs.len() });
        }

        if pairs.iter().map(PhcParam::name).ne(PARAM_ORDER) {
            return Err(ValidationError::ParamOrder {
                found: pairs.iter().map(|p| p.name().to_string()).collect(),
            });
        }

        Ok(Self {
            memory: parse_field("memory", pairs[0].value())?,
            time: parse_field("time", pairs[1].value())?,
            parallelism: parse_field("parallelism", pairs[2].value())?,
            key_length,
        })
    }

    /// Emits the `m, t, p` list in canonical decimal form.
    pub fn to_pairs(&self) -> Vec<PhcParam> {
        vec![
            PhcParam::from_uint("m", u64::from(self.memory)),
            PhcParam::from_uint("t", u64::from(self.time)),
            PhcParam::from_uint("p", u64::from(self.parallelism)),
        ]
    }
}

/// Key length described by a decoded hash.
pub fn key_length_for(hash: &[u8]) -> Result<u32, EncodingError> {
    u32::try_from(hash.len()).map_err(|_| EncodingError::HashTooLong { length: hash.len() })
}

fn parse_field<T>(field: &'static str, value: &str) -> Result<T, ValidationError>
where
    T: FromStr<Err = ParseIntError>,
{
    // `FromStr` for integers accepts a leading `+`, which the PHC value
    // charset allows; only bare digits are valid here.
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::ParamValue {
            field,
            value: value.to_string(),
            source: None,
        });
    }

    value.parse().map_err(|e| ValidationError::ParamValue {
        field,
        value: value.to_string(),
        source: Some(e),
    })
}
