//! Soft-constraint improvement.

use std::time::Duration;

use rand::Rng;
use tracing::{debug, info, trace};

use super::{Phase, PhaseOutcome};
use crate::acceptor::Acceptor;
use crate::context::SolverContext;
use crate::error;
use crate::moves::{reverse, Feasibility, MoveKind, MoveOutcome};
use crate::stats::{PhaseStats, ScoreSeries};
use crate::termination::TimeTermination;

const PHASE_TYPE: &str = "Improvement";
const PHASE: &str = "Soft Constraint Improvement";

/// Local search on the soft cost.
///
/// Moves are drawn among timeslot, position and room swaps and applied
/// only when they keep every hard constraint, so the number of pending
/// lectures never changes. Courses touched by a move are marked in the
/// cost director before the cost is read; a rejected move is reversed from
/// its backup. The phase ends at cost zero or when the budget expires, and
/// leaves the lowest-cost grid it saw.
#[derive(Debug)]
pub struct ImprovementPhase {
    acceptor: Box<dyn Acceptor>,
    termination: TimeTermination,
    sample_interval: Duration,
}

impl ImprovementPhase {
    pub fn new(
        acceptor: Box<dyn Acceptor>,
        termination: TimeTermination,
        sample_interval: Duration,
    ) -> Self {
        Self {
            acceptor,
            termination,
            sample_interval,
        }
    }

    fn step(
        &mut self,
        ctx: &mut SolverContext<'_>,
        stats: &mut PhaseStats,
        last: &mut i64,
    ) -> error::Result<bool> {
        let instance = ctx.instance();
        let kinds = MoveKind::IMPROVEMENT;
        let kind = kinds[ctx.rng.random_range(0..kinds.len())];
        let Some(mv) = kind.select(&mut ctx.rng, ctx.state.grid()) else {
            return Ok(false);
        };
        if !self.acceptor.is_move_allowed(&mv) {
            trace!(event = "step", kind = kind.name(), tabu = true, accepted = false);
            return Ok(false);
        }

        let backup = match mv.apply(instance, &mut ctx.state, Feasibility::Preserve)? {
            MoveOutcome::Applied(backup) => backup,
            MoveOutcome::Rejected(reason) => {
                trace!(event = "step", kind = kind.name(), rejection = ?reason, accepted = false);
                return Ok(false);
            }
        };
        ctx.courses_changed(backup.touched_courses());
        ctx.assert_move(PHASE)?;

        let cost = ctx.cost();
        let delta = cost - *last;
        let accepted = self.acceptor.is_accepted(delta, &mut ctx.rng);
        stats.record_move(accepted);
        trace!(
            event = "step",
            kind = kind.name(),
            cost = cost,
            delta = delta,
            accepted = accepted,
        );

        if accepted {
            *last = cost;
        } else {
            reverse(&mut ctx.state, &backup)?;
            ctx.courses_changed(backup.touched_courses());
        }
        Ok(accepted)
    }
}

impl Phase for ImprovementPhase {
    fn solve(&mut self, ctx: &mut SolverContext<'_>) -> error::Result<PhaseOutcome> {
        self.run(ctx).map_err(|err| ctx.in_phase(PHASE, err))
    }

    fn phase_type_name(&self) -> &'static str {
        PHASE_TYPE
    }
}

impl ImprovementPhase {
    fn run(&mut self, ctx: &mut SolverContext<'_>) -> error::Result<PhaseOutcome> {
        let started = ctx.elapsed();
        let mut stats = PhaseStats::new(2, PHASE, started);
        let mut series = ScoreSeries::new(self.sample_interval, started);
        ctx.director.reset();
        let initial = ctx.cost();
        let mut last = initial;
        let mut best_cost = initial;
        let mut best = ctx.state.clone();
        let mut last_progress = started;

        info!(
            event = "phase_start",
            phase = PHASE,
            phase_index = 2,
            acceptor = self.acceptor.name(),
            cost = initial,
        );

        self.acceptor.phase_started();
        while best_cost > 0 {
            let now = ctx.elapsed();
            if ctx.is_terminated_at(&self.termination, now) {
                break;
            }
            series.observe(now, best_cost);
            if now.saturating_sub(last_progress) >= Duration::from_secs(1) {
                debug!(
                    event = "progress",
                    steps = stats.step_count,
                    cost = last,
                    best = best_cost,
                );
                last_progress = now;
            }

            self.acceptor.step_started();
            stats.record_step();
            let accepted = self.step(ctx, &mut stats, &mut last)?;
            if accepted && last < best_cost {
                best_cost = last;
                best = ctx.state.clone();
                debug!(event = "new_best", steps = stats.step_count, cost = best_cost);
            }
            self.acceptor.step_ended(accepted);
        }

        ctx.state = best;
        ctx.director.reset();
        ctx.assert_phase(PHASE)?;
        stats.finish(ctx.elapsed());
        info!(
            event = "phase_end",
            phase = PHASE,
            phase_index = 2,
            duration_ms = stats.duration_ms(),
            steps = stats.step_count,
            speed = stats.speed(),
            calculations = ctx.cost_calculations(),
            score = best_cost,
        );

        Ok(PhaseOutcome {
            stats,
            initial_score: initial,
            best_score: best_cost,
            series: series.into_samples(),
        })
    }
}
