//! Error types for coursetable

use thiserror::Error;

/// Main error type for model and grid operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoursetableError {
    /// The instance references unknown entities or has inconsistent dimensions
    #[error("Invalid instance: {0}")]
    InvalidInstance(String),

    /// Grid, empty-positions set and pending events disagree.
    ///
    /// Never recoverable: the state that produced it is corrupt.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

impl CoursetableError {
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation(message.into())
    }

    pub fn invalid_instance(message: impl Into<String>) -> Self {
        Self::InvalidInstance(message.into())
    }

    /// Returns true for errors that signal a programming defect.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::InvariantViolation(_))
    }
}

/// Result type alias for coursetable operations
pub type Result<T> = std::result::Result<T, CoursetableError>;
