//! Argon2id password hashing and verification.

pub mod error;
pub mod hasher;
pub mod kdf;
pub mod params;
pub mod salt;

pub use error::{EncodingError, HashError, KdfError, SaltError, ValidationError, VerifyError};
pub use hasher::{Argon2idHasher, Argon2idHasherBuilder, PasswordHasher, derive_with_salt};
pub use kdf::{ARGON2ID, Argon2idKdf, KeyDerivation};
pub use params::{Parameters, key_length_for};
pub use salt::{OsSaltGenerator, SaltGenerator};
