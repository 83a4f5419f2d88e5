//! Solver errors.

use coursetable_config::ConfigError;
use coursetable_core::CoursetableError;
use thiserror::Error;

/// Errors that abort a solve.
///
/// Rejected moves are not errors; see [`MoveOutcome`](crate::moves::MoveOutcome).
#[derive(Debug, Error)]
pub enum SolverError {
    #[error(transparent)]
    Core(#[from] CoursetableError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The working state became inconsistent.
    ///
    /// `dump` is a rendering of the grid and pending events at the moment
    /// the check failed.
    #[error("Invariant violation in {phase} phase: {message}")]
    InvariantViolation {
        phase: &'static str,
        message: String,
        dump: String,
    },
}

impl SolverError {
    pub fn is_invariant_violation(&self) -> bool {
        match self {
            Self::Core(err) => err.is_invariant_violation(),
            Self::InvariantViolation { .. } => true,
            Self::Config(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, SolverError>;
