//! Coursetable Solver Engine
//!
//! This crate provides the search that turns an [`Instance`] into a
//! timetable:
//! - Solver context owning the grid, pending lectures and random generator
//! - Neighborhood moves with a feasibility-preserving and a relaxed mode
//! - Acceptors (simulated annealing, tabu search)
//! - Phases (construction heuristic, hard-constraint repair, soft-constraint
//!   improvement)
//! - Time terminations on a pluggable clock
//! - The [`Solver`] pipeline and its [`SolveResult`]
//!
//! [`Instance`]: coursetable_core::Instance

pub mod acceptor;
pub mod clock;
pub mod context;
pub mod error;
pub mod moves;
pub mod phase;
pub mod solver;
pub mod state;
pub mod stats;
pub mod termination;

pub use acceptor::{
    Acceptor, AcceptorBuilder, SimulatedAnnealingAcceptor, TabuSearchAcceptor,
};
pub use clock::{Clock, MonotonicClock, TickClock};
pub use context::SolverContext;
pub use error::{Result, SolverError};
pub use moves::{Feasibility, Move, MoveBackup, MoveKind, MoveOutcome, Rejection};
pub use phase::{ConstructionPhase, ImprovementPhase, Phase, PhaseOutcome, RepairPhase};
pub use solver::{SolveResult, Solver};
pub use state::SolverState;
pub use stats::{PhaseStats, ScoreSeries, SolverStats};
pub use termination::TimeTermination;
