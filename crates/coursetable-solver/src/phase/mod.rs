//! Solver phases.
//!
//! A solve runs up to three phases on one [`SolverContext`]:
//! - [`ConstructionPhase`]: greedy placement of every pending lecture
//! - [`RepairPhase`]: local search on the number of pending lectures
//! - [`ImprovementPhase`]: local search on the soft cost

pub mod construction;
pub mod improvement;
pub mod repair;


use std::fmt::Debug;

use crate::context::SolverContext;
use crate::error::Result;
use crate::stats::PhaseStats;

pub use construction::ConstructionPhase;
pub use improvement::ImprovementPhase;
pub use repair::{reseat_pending, RepairPhase};

/// A phase of the solve.
pub trait Phase: Debug {
    /// Runs the phase, leaving its best state in the context.
    fn solve(&mut self, ctx: &mut SolverContext<'_>) -> Result<PhaseOutcome>;

    fn phase_type_name(&self) -> &'static str;
}

/// What a phase reports when it ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseOutcome {
    pub stats: PhaseStats,
    /// Score when the phase started: distance for construction and repair,
    /// soft cost for improvement.
    pub initial_score: i64,
    /// Score of the state the phase left behind.
    pub best_score: i64,
    /// Best score sampled at the phase's sampling period.
    pub series: Vec<i64>,
}
