//! Convenience result type alias for phcpass.

use crate::error::AppError;

/// A specialized `Result` type for phcpass operations.
pub type AppResult<T> = Result<T, AppError>;
