//! The construction → repair → improvement pipeline.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use coursetable_config::{SearchPhase, SolverConfig};
use coursetable_core::{Event, Instance, Timetable};
use coursetable_scoring::CostBreakdown;
use tracing::info;

use crate::acceptor::AcceptorBuilder;
use crate::clock::{Clock, MonotonicClock};
use crate::context::SolverContext;
use crate::error::Result;
use crate::phase::{ConstructionPhase, ImprovementPhase, Phase, PhaseOutcome, RepairPhase};
use crate::stats::{PhaseStats, SolverStats};
use crate::termination::TimeTermination;

/// Runs the three phases on an instance.
///
/// The overall budget from the configuration bounds the whole solve; each
/// search phase additionally stops at its own budget.
///
/// # Example
///
/// ```
/// use coursetable_config::{EnvironmentMode, SolverConfig};
/// use coursetable_core::Instance;
/// use coursetable_solver::Solver;
///
/// let instance = Instance::builder("single", 1, 1)
///     .course("c1", "t1", 1, 1, 10, false)
///     .room("r1", 20, 0)
///     .build()
///     .unwrap();
/// let config = SolverConfig::new()
///     .with_environment_mode(EnvironmentMode::Reproducible)
///     .with_termination_seconds(1);
///
/// let result = Solver::new(config).solve(&instance).unwrap();
/// assert!(result.is_feasible());
/// assert_eq!(result.cost, 0);
/// ```
#[derive(Debug)]
pub struct Solver {
    config: SolverConfig,
    clock: Option<Arc<dyn Clock>>,
    terminate_early_flag: Arc<AtomicBool>,
    solving: Arc<AtomicBool>,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            clock: None,
            terminate_early_flag: Arc::new(AtomicBool::new(false)),
            solving: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Uses `clock` instead of the wall clock; every solve then shares it.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Shares an externally owned stop flag.
    pub fn with_terminate_early_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.terminate_early_flag = flag;
        self
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Requests early termination of the running solve.
    ///
    /// Thread-safe; returns false if no solve is running.
    pub fn terminate_early(&self) -> bool {
        if self.solving.load(Ordering::SeqCst) {
            self.terminate_early_flag.store(true, Ordering::SeqCst);
            true
        } else {
            false
        }
    }

    pub fn is_solving(&self) -> bool {
        self.solving.load(Ordering::SeqCst)
    }

    /// Solves `instance` from an empty timetable.
    pub fn solve(&self, instance: &Instance) -> Result<SolveResult> {
        self.config.validate()?;
        let clock = self
            .clock
            .clone()
            .unwrap_or_else(|| Arc::new(MonotonicClock::new()));
        let mut ctx = SolverContext::new(instance, &self.config).with_clock(clock);

        self.terminate_early_flag.store(false, Ordering::SeqCst);
        self.solving.store(true, Ordering::SeqCst);
        ctx.set_terminate_early_flag(self.terminate_early_flag.clone());
        let result = self.solve_context(&mut ctx);
        self.solving.store(false, Ordering::SeqCst);
        result
    }

    /// Runs the pipeline on a prepared context, starting from its state.
    pub fn solve_context(&self, ctx: &mut SolverContext<'_>) -> Result<SolveResult> {
        let config = &self.config;
        let started = ctx.elapsed();
        let overall = TimeTermination::starting_at(started, config.time_limit());
        info!(
            event = "solve_start",
            instance = ctx.instance().name(),
            lectures = ctx.instance().event_count(),
            time_limit_ms = config.time_limit().as_millis() as u64,
            seed = ?config.seed(),
        );

        let construction_budget = match config.construction.time_limit() {
            Some(limit) => overall.sub_budget(started, limit),
            None => overall,
        };
        let construction =
            ConstructionPhase::new(config.construction.passes, construction_budget).solve(ctx)?;
        let distance_after_construction = ctx.distance();

        let feasibility = if ctx.distance() > 0 && config.feasibility.enabled {
            let now = ctx.elapsed();
            let mut phase = RepairPhase::new(
                AcceptorBuilder::build(&config.feasibility.acceptor),
                overall.sub_budget(now, config.phase_time_limit(SearchPhase::Feasibility)),
                config.sample_interval(SearchPhase::Feasibility),
            );
            Some(phase.solve(ctx)?)
        } else {
            None
        };

        let improvement = if config.improvement.enabled && ctx.cost() > 0 {
            let now = ctx.elapsed();
            let mut phase = ImprovementPhase::new(
                AcceptorBuilder::build(&config.improvement.acceptor),
                overall.sub_budget(now, config.phase_time_limit(SearchPhase::Improvement)),
                config.sample_interval(SearchPhase::Improvement),
            );
            Some(phase.solve(ctx)?)
        } else {
            None
        };

        let breakdown = ctx.breakdown();
        let mut stats = SolverStats::default();
        stats.absorb(&construction.stats);
        let (feasibility_stats, distance_series) = split(feasibility, 1, "Hard Constraint Repair");
        let (improvement_stats, cost_series) = split(improvement, 2, "Soft Constraint Improvement");
        stats.absorb(&feasibility_stats);
        stats.absorb(&improvement_stats);

        let result = SolveResult {
            timetable: ctx.state().grid().clone(),
            pending: ctx.state().pending().to_vec(),
            distance_after_construction,
            distance: ctx.distance(),
            cost: breakdown.total(),
            breakdown,
            construction: construction.stats,
            feasibility: feasibility_stats,
            improvement: improvement_stats,
            stats,
            distance_series,
            cost_series,
            feasibility_strategy: config.feasibility.acceptor.short_name(),
            improvement_strategy: config.improvement.acceptor.short_name(),
            total_time: ctx.elapsed().saturating_sub(started),
        };

        info!(
            event = "solve_end",
            duration_ms = result.total_time.as_millis() as u64,
            steps = result.stats.step_count,
            distance = result.distance,
            cost = result.cost,
            best_effort = result.is_best_effort(),
        );
        Ok(result)
    }
}

fn split(
    outcome: Option<PhaseOutcome>,
    phase_index: usize,
    phase_type: &'static str,
) -> (PhaseStats, Vec<i64>) {
    match outcome {
        Some(outcome) => (outcome.stats, outcome.series),
        None => (PhaseStats::skipped(phase_index, phase_type), Vec::new()),
    }
}

/// Outcome of a solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveResult {
    pub timetable: Timetable,
    /// Lectures left off the grid.
    pub pending: Vec<Event>,
    pub distance_after_construction: usize,
    /// Pending lectures at the end of the solve.
    pub distance: usize,
    /// Total soft cost of the final grid.
    pub cost: i64,
    pub breakdown: CostBreakdown,
    pub construction: PhaseStats,
    /// Zeroed when the repair phase did not run.
    pub feasibility: PhaseStats,
    /// Zeroed when the improvement phase did not run.
    pub improvement: PhaseStats,
    pub stats: SolverStats,
    /// Best distance sampled during repair.
    pub distance_series: Vec<i64>,
    /// Best cost sampled during improvement.
    pub cost_series: Vec<i64>,
    pub feasibility_strategy: &'static str,
    pub improvement_strategy: &'static str,
    pub total_time: Duration,
}

impl SolveResult {
    pub fn is_feasible(&self) -> bool {
        self.distance == 0
    }

    /// True when lectures are still pending, so the cost covers only the
    /// placed ones.
    pub fn is_best_effort(&self) -> bool {
        !self.is_feasible()
    }
}
