//! Key derivation seam and the Argon2id implementation.

use argon2::{Algorithm, Argon2, Params, Version};

use super::error::KdfError;
use super::params::Parameters;

/// PHC identifier of Argon2id.
pub const ARGON2ID: &str = "argon2id";

/// A deterministic password-to-key function.
pub trait KeyDerivation: Send + Sync {
    /// PHC identifier written into encoded strings.
    fn algorithm_id(&self) -> &str;

    /// Algorithm version written into encoded strings.
    fn version(&self) -> u32;

    /// Derives `params.key_length` bytes from `password` and `salt`.
    fn derive(&self, password: &[u8], salt: &[u8], params: &Parameters)
    -> Result<Vec<u8>, KdfError>;
}

/// Argon2id v1.3 from the `argon2` crate.
///
/// Input bounds (salt at least 8 bytes, output at least 4 bytes, memory at
/// least 8 KiB per lane, ...) are enforced by the crate and reported as
/// [`KdfError::Argon2`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2idKdf;

impl KeyDerivation for Argon2idKdf {
    fn algorithm_id(&self) -> &str {
        ARGON2ID
    }

    fn version(&self) -> u32 {
        Version::V0x13 as u32
    }

    fn derive(
        &self,
        password: &[u8],
        salt: &[u8],
        params: &Parameters,
    ) -> Result<Vec<u8>, KdfError> {
        let output_len = params.key_length as usize;
        let argon_params = Params::new(
            params.memory,
            params.time,
            u32::from(params.parallelism),
            Some(output_len),
        )?;

        let mut output = vec![0u8; output_len];
        Argon2::new(Algorithm::Argon2id, Version::V0x13, argon_params)
            .hash_password_into(password, salt, &mut output)?;

        Ok(output)
    }
}
