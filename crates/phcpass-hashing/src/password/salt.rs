//! Salt generation.

use argon2::password_hash::rand_core::{OsRng, RngCore};

use super::error::SaltError;

/// Default salt length in bytes.
pub const DEFAULT_SALT_LENGTH: usize = 16;

/// Source of per-hash salt bytes.
///
/// Production generators must draw from a cryptographically secure source.
/// Any `Fn() -> Result<Vec<u8>, SaltError>` closure is also a generator,
/// which is how tests inject fixed salts.
pub trait SaltGenerator: Send + Sync {
    /// Produces a fresh salt.
    fn generate(&self) -> Result<Vec<u8>, SaltError>;
}

impl<F> SaltGenerator for F
where
    F: Fn() -> Result<Vec<u8>, SaltError> + Send + Sync,
{
    fn generate(&self) -> Result<Vec<u8>, SaltError> {
        self()
    }
}

/// Salt generator backed by the operating system CSPRNG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OsSaltGenerator {
    length: usize,
}

impl OsSaltGenerator {
    /// Creates a generator producing `length` bytes per salt.
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    /// Salt length in bytes.
    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for OsSaltGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SALT_LENGTH)
    }
}

impl SaltGenerator for OsSaltGenerator {
    fn generate(&self) -> Result<Vec<u8>, SaltError> {
        let mut salt = vec![0u8; self.length];
        OsRng
            .try_fill_bytes(&mut salt)
            .map_err(|e| SaltError::new(e.to_string()))?;
        Ok(salt)
    }
}
