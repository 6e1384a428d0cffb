//! # phcpass-hashing
//!
//! Password hashing for phcpass, encoded in the PHC string format.
//!
//! ## Modules
//!
//! - `phc` — algorithm-agnostic PHC string codec
//! - `password` — Argon2id parameter binding, salt generation, key
//!   derivation and the hasher that ties them together

pub mod phc;
pub mod password;

pub use password::{
    Argon2idHasher, Argon2idKdf, HashError, KeyDerivation, OsSaltGenerator, Parameters,
    PasswordHasher, SaltGenerator, VerifyError,
};
pub use phc::{FormatError, PhcParam, PhcRecord};
