//! Solver context threaded through every phase.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use coursetable_config::SolverConfig;
use coursetable_core::{CourseId, CoursetableError, Instance};
use coursetable_scoring::{CostBreakdown, CostDirector};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::clock::{Clock, MonotonicClock};
use crate::error::SolverError;
use crate::state::SolverState;
use crate::termination::TimeTermination;

/// Everything a phase reads or mutates during a solve.
///
/// Owns the working [`SolverState`], the random generator, the clock and
/// the cost director. Phases borrow the context mutably one after the
/// other; nothing is shared between solves.
#[derive(Debug)]
pub struct SolverContext<'a> {
    instance: &'a Instance,
    config: SolverConfig,
    pub(crate) state: SolverState,
    pub(crate) rng: StdRng,
    pub(crate) director: CostDirector,
    clock: Arc<dyn Clock>,
    terminate_early_flag: Option<Arc<AtomicBool>>,
}

fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

fn director_for(instance: &Instance, config: &SolverConfig) -> CostDirector {
    CostDirector::new(instance, config.weights).with_incremental(config.incremental_scoring)
}

impl<'a> SolverContext<'a> {
    /// Creates a context with an empty grid and every event pending.
    pub fn new(instance: &'a Instance, config: &SolverConfig) -> Self {
        Self {
            instance,
            config: config.clone(),
            state: SolverState::new(instance),
            rng: rng_for(config.seed()),
            director: director_for(instance, config),
            clock: Arc::new(MonotonicClock::new()),
            terminate_early_flag: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the working state, e.g. to resume from a given grid.
    ///
    /// Fails if `state` does not match the context's instance.
    pub fn with_state(mut self, state: SolverState) -> Result<Self, SolverError> {
        state.check_consistency(self.instance)?;
        self.state = state;
        self.director.reset();
        Ok(self)
    }

    /// Rebuilds the initial state: empty grid, every event pending in
    /// instance order, generator reseeded.
    ///
    /// The clock keeps running.
    pub fn reset(&mut self, seed: Option<u64>, config: &SolverConfig) {
        self.config = config.clone();
        self.state = SolverState::new(self.instance);
        self.rng = rng_for(seed.or(config.seed()));
        self.director = director_for(self.instance, config);
    }

    #[inline]
    pub fn instance(&self) -> &'a Instance {
        self.instance
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn state(&self) -> &SolverState {
        &self.state
    }

    pub fn into_state(self) -> SolverState {
        self.state
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.elapsed()
    }

    pub fn set_terminate_early_flag(&mut self, flag: Arc<AtomicBool>) {
        self.terminate_early_flag = Some(flag);
    }

    pub fn is_terminate_early(&self) -> bool {
        self.terminate_early_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// True if `termination` has expired at `now` or an early stop was
    /// requested.
    pub fn is_terminated_at(&self, termination: &TimeTermination, now: Duration) -> bool {
        self.is_terminate_early() || termination.is_terminated(now)
    }

    #[inline]
    pub fn distance(&self) -> usize {
        self.state.distance()
    }

    /// Current soft cost of the grid.
    pub fn cost(&mut self) -> i64 {
        self.director.calculate_cost(self.instance, self.state.grid())
    }

    pub fn breakdown(&mut self) -> CostBreakdown {
        self.director.calculate_breakdown(self.instance, self.state.grid())
    }

    pub(crate) fn courses_changed<I>(&mut self, courses: I)
    where
        I: IntoIterator<Item = CourseId>,
    {
        for course in courses {
            self.director.course_changed(course);
        }
    }

    /// Number of cost calculations so far.
    pub fn cost_calculations(&self) -> u64 {
        self.director.calculation_count()
    }

    /// Verifies the working state, attaching a dump on failure.
    pub fn check_consistency(&self, phase: &'static str) -> Result<(), SolverError> {
        self.state
            .check_consistency(self.instance)
            .map_err(|err| self.in_phase(phase, SolverError::Core(err)))
    }

    /// Attaches `phase` and a dump of the working state to an invariant
    /// violation; other errors pass through.
    pub(crate) fn in_phase(&self, phase: &'static str, err: SolverError) -> SolverError {
        match err {
            SolverError::Core(CoursetableError::InvariantViolation(message)) => {
                SolverError::InvariantViolation {
                    phase,
                    message,
                    dump: self.state.dump(self.instance),
                }
            }
            other => other,
        }
    }

    /// Consistency check after a move, in full assert mode.
    pub(crate) fn assert_move(&self, phase: &'static str) -> Result<(), SolverError> {
        if self.config.environment_mode.asserts_moves() {
            self.check_consistency(phase)?;
        }
        Ok(())
    }

    /// Consistency check at a phase boundary, in either assert mode.
    pub(crate) fn assert_phase(&self, phase: &'static str) -> Result<(), SolverError> {
        if self.config.environment_mode.asserts_phases() {
            self.check_consistency(phase)?;
        }
        Ok(())
    }
}
