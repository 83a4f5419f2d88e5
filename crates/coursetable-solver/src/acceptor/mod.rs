//! Acceptors for local search move acceptance.
//!
//! Both search phases share one loop: draw a move, ask the acceptor
//! whether it may be tried, apply it, then ask whether the resulting score
//! change is accepted. Rejected moves are rolled back by the phase.

mod simulated_annealing;
mod tabu_search;

#[cfg(test)]
mod tests;

use std::fmt::Debug;

use coursetable_config::AcceptorConfig;
use rand::rngs::StdRng;

use crate::moves::Move;

pub use simulated_annealing::SimulatedAnnealingAcceptor;
pub use tabu_search::{TabuList, TabuSearchAcceptor};

/// Decides which moves are tried and which score changes are kept.
///
/// Scores are costs: a negative `delta` is an improvement.
pub trait Acceptor: Send + Debug {
    /// Short label used in logs and run records.
    fn name(&self) -> &'static str;

    /// Returns false if `mv` must not be tried at this step.
    fn is_move_allowed(&mut self, _mv: &Move) -> bool {
        true
    }

    /// Returns true if a move changing the score by `delta` is kept.
    fn is_accepted(&mut self, delta: i64, rng: &mut StdRng) -> bool;

    /// Called when a phase starts.
    fn phase_started(&mut self) {}

    /// Called before each move is drawn.
    fn step_started(&mut self) {}

    /// Called after each step; `accepted` is false for rejected, disallowed
    /// and ineffective moves alike.
    fn step_ended(&mut self, _accepted: bool) {}
}

/// Builds acceptors from configuration.
pub struct AcceptorBuilder;

impl AcceptorBuilder {
    pub fn build(config: &AcceptorConfig) -> Box<dyn Acceptor> {
        match config {
            AcceptorConfig::SimulatedAnnealing(sa) => Box::new(SimulatedAnnealingAcceptor::new(
                sa.starting_temperature,
                sa.minimum_temperature,
                sa.cooling_steps,
                sa.reheat_after,
            )),
            AcceptorConfig::TabuSearch(tabu) => Box::new(TabuSearchAcceptor::new(tabu.tabu_length)),
        }
    }
}
