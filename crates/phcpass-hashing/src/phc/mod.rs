//! PHC string format codec.
//!
//! Format reference: <https://github.com/P-H-C/phc-string-format>

pub mod error;
pub mod format;

pub use error::{FormatError, Segment};
pub use format::{PhcParam, PhcRecord, decode, encode};
