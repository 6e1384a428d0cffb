//! # phcpass-core
//!
//! Core crate for phcpass. Contains the configuration schemas and the
//! unified error system shared by the hashing library and the CLI.
//!
//! This crate has **no** internal dependencies on other phcpass crates.

pub mod config;
pub mod error;
pub mod result;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
