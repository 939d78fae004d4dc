//! Error types and result handling for registry operations.
//!
//! Control-plane callers translate these into HTTP statuses: `NotFound`
//! maps to 404, `InvalidInput` and `Store` to 400. The delivery engine
//! treats `NotFound` during lookup as an empty subscriber set.

use thiserror::Error;

/// Result type alias using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for registry and store operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Referenced bucket, rule, or subscription is absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed input: bad URL, bad UUID, missing required field.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Underlying store operation failed.
    #[error("store error: {0}")]
    Store(String),
}

impl CoreError {
    /// Creates a not-found error for the given resource description.
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }

    /// Creates a validation error from a message.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates a store error from a message.
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    /// Returns `true` for the not-found variant.
    ///
    /// The delivery engine uses this to distinguish "no subscribers"
    /// from genuine lookup failures.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_identified() {
        assert!(CoreError::not_found("bucket b1").is_not_found());
        assert!(!CoreError::invalid_input("bad url").is_not_found());
        assert!(!CoreError::store("io failure").is_not_found());
    }

    #[test]
    fn error_display_format() {
        assert_eq!(CoreError::not_found("rule r1").to_string(), "not found: rule r1");
        assert_eq!(CoreError::invalid_input("empty url").to_string(), "invalid input: empty url");
    }
}
