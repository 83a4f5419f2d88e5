//! Hard-constraint repair.

use std::time::Duration;

use coursetable_core::{Instance, Result};
use coursetable_scoring::course_fits_into_timeslot;
use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, info, trace};

use super::{Phase, PhaseOutcome};
use crate::acceptor::Acceptor;
use crate::context::SolverContext;
use crate::error;
use crate::moves::{Feasibility, MoveKind, MoveOutcome};
use crate::state::SolverState;
use crate::stats::{PhaseStats, ScoreSeries};
use crate::termination::TimeTermination;

const PHASE_TYPE: &str = "Repair";
const PHASE: &str = "Hard Constraint Repair";

/// Tries to seat every pending lecture in the first empty position whose
/// timeslot it fits, in random order. Returns how many were seated.
pub fn reseat_pending(
    instance: &Instance,
    state: &mut SolverState,
    rng: &mut StdRng,
) -> Result<usize> {
    state.shuffle_pending(rng);
    let mut seated = 0;
    for event in state.take_pending() {
        let grid = state.grid();
        let target = grid.empty_positions().iter().find(|p| {
            course_fits_into_timeslot(instance, grid, event.course, p.timeslot)
        });
        match target {
            Some(position) => {
                state.place(instance, event, position)?;
                seated += 1;
            }
            None => state.push_pending(instance, event)?,
        }
    }
    Ok(seated)
}

/// Local search that drives the number of pending lectures to zero.
///
/// Every step swaps two timeslots or two positions with hard constraints
/// relaxed, then re-seats the pending lectures. The acceptor judges the
/// change in pending lectures; a rejected step restores a snapshot of the
/// state taken before the move. The phase ends when nothing is pending or
/// the time budget expires, and leaves the best state it saw.
#[derive(Debug)]
pub struct RepairPhase {
    acceptor: Box<dyn Acceptor>,
    termination: TimeTermination,
    sample_interval: Duration,
}

impl RepairPhase {
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

    /// One step; returns whether a move was applied and kept.
    fn step(
        &mut self,
        ctx: &mut SolverContext<'_>,
        stats: &mut PhaseStats,
        last: &mut usize,
    ) -> error::Result<bool> {
        let instance = ctx.instance();
        let kind = MoveKind::REPAIR[ctx.rng.random_range(0..MoveKind::REPAIR.len())];
        let Some(mv) = kind.select(&mut ctx.rng, ctx.state.grid()) else {
            return Ok(false);
        };
        if !self.acceptor.is_move_allowed(&mv) {
            trace!(event = "step", kind = kind.name(), tabu = true, accepted = false);
            return Ok(false);
        }

        let snapshot = ctx.state.clone();
        let outcome = mv.apply(instance, &mut ctx.state, Feasibility::Relax)?;
        if let MoveOutcome::Rejected(reason) = outcome {
            trace!(event = "step", kind = kind.name(), rejection = ?reason, accepted = false);
            return Ok(false);
        }
        reseat_pending(instance, &mut ctx.state, &mut ctx.rng)?;
        ctx.assert_move(PHASE)?;

        let distance = ctx.distance();
        let delta = distance as i64 - *last as i64;
        let accepted = self.acceptor.is_accepted(delta, &mut ctx.rng);
        stats.record_move(accepted);
        trace!(
            event = "step",
            kind = kind.name(),
            distance = distance,
            delta = delta,
            accepted = accepted,
        );

        if accepted {
            *last = distance;
        } else {
            ctx.state = snapshot;
        }
        Ok(accepted)
    }
}

impl Phase for RepairPhase {
    fn solve(&mut self, ctx: &mut SolverContext<'_>) -> error::Result<PhaseOutcome> {
        self.run(ctx).map_err(|err| ctx.in_phase(PHASE, err))
    }

    fn phase_type_name(&self) -> &'static str {
        PHASE_TYPE
    }
}

impl RepairPhase {
    fn run(&mut self, ctx: &mut SolverContext<'_>) -> error::Result<PhaseOutcome> {
        let started = ctx.elapsed();
        let mut stats = PhaseStats::new(1, PHASE, started);
        let mut series = ScoreSeries::new(self.sample_interval, started);
        let initial = ctx.distance();
        let mut last = initial;
        let mut best_distance = initial;
        let mut best = ctx.state.clone();
        let mut last_progress = started;

        info!(
            event = "phase_start",
            phase = PHASE,
            phase_index = 1,
            acceptor = self.acceptor.name(),
            distance = initial,
        );

        self.acceptor.phase_started();
        while best_distance > 0 {
            let now = ctx.elapsed();
            if ctx.is_terminated_at(&self.termination, now) {
                break;
            }
            series.observe(now, best_distance as i64);
            if now.saturating_sub(last_progress) >= Duration::from_secs(1) {
                debug!(
                    event = "progress",
                    steps = stats.step_count,
                    distance = last,
                    best = best_distance,
                );
                last_progress = now;
            }

            self.acceptor.step_started();
            stats.record_step();
            let accepted = self.step(ctx, &mut stats, &mut last)?;
            if accepted && last < best_distance {
                best_distance = last;
                best = ctx.state.clone();
                debug!(event = "new_best", steps = stats.step_count, distance = best_distance);
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
            phase_index = 1,
            duration_ms = stats.duration_ms(),
            steps = stats.step_count,
            speed = stats.speed(),
            score = best_distance,
        );

        Ok(PhaseOutcome {
            stats,
            initial_score: initial as i64,
            best_score: best_distance as i64,
            series: series.into_samples(),
        })
    }
}
