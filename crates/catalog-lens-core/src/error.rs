//! Error types for catalog-lens
//!
//! The search and filter engines never fail; these errors cover configuration
//! values decoded from outside input.

use thiserror::Error;

/// Result type alias for catalog-lens operations
pub type Result<T> = std::result::Result<T, LensError>;

#[derive(Debug, Error)]
pub enum LensError {
    /// A grouping mode string that is neither `mod` nor `tag:<key>`
    #[error("Invalid group-by mode: {0:?} (expected \"mod\" or \"tag:<key>\")")]
    InvalidGroupBy(String),
}

impl LensError {
    /// Returns the error type string (for JSON responses)
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::InvalidGroupBy(_) => "INVALID_GROUP_BY",
        }
    }
}
