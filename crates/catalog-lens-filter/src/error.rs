//! Filter validation issues
//!
//! An invalid filter is never a failure of the editor: the issue is surfaced
//! as a reason next to a `valid: false` flag and simply blocks commit.

use thiserror::Error;

/// Result type alias for filter checks
pub type Result<T> = std::result::Result<T, FilterIssue>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterIssue {
    /// An `and` group with no children
    #[error("filter group must contain at least one expression")]
    EmptyGroup,

    #[error("filter is missing a type")]
    MissingType,

    #[error("filter is missing a value")]
    MissingValue,

    /// Any operator other than `and` / `equal`
    #[error("unsupported filter operator")]
    UnsupportedOperator,

    /// A root expression that is not an `and` group
    #[error("filter root must be an `and` group")]
    NotAGroup,
}

impl FilterIssue {
    /// Returns the error type string (for JSON responses)
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::EmptyGroup => "EMPTY_GROUP",
            Self::MissingType => "MISSING_TYPE",
            Self::MissingValue => "MISSING_VALUE",
            Self::UnsupportedOperator => "UNSUPPORTED_OPERATOR",
            Self::NotAGroup => "NOT_A_GROUP",
        }
    }
}
