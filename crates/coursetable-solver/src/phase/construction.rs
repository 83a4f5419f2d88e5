//! Greedy construction heuristic.

use std::cmp::Ordering;

use coursetable_core::{CourseId, Event, Instance, PenaltyWeights, Position, Result, Timetable};
use coursetable_scoring::course_fits_into_timeslot;
use coursetable_scoring::soft::room_capacity;
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use tracing::{debug, info, trace};

use super::{Phase, PhaseOutcome};
use crate::context::SolverContext;
use crate::error;
use crate::stats::PhaseStats;
use crate::state::SolverState;
use crate::termination::TimeTermination;

const PHASE_TYPE: &str = "Construction";
const PHASE: &str = "Construction Heuristic";

/// Builds an initial timetable from the pending lectures.
///
/// Each pass ranks the pending lectures, most constrained first, and puts
/// each one into a random empty position that breaks no hard constraint
/// and fits its students, falling back to the hard-feasible position with
/// the smallest capacity excess. Lectures without any feasible position
/// are then offered positions vacated at random from the grid; the
/// lectures evicted that way are pending again for the next pass. The
/// last pass skips the eviction, as nothing would place the evicted
/// lectures afterwards.
///
/// Passes repeat until nothing is pending, the pass budget is spent or the
/// time budget expires.
#[derive(Debug, Clone)]
pub struct ConstructionPhase {
    passes: usize,
    termination: TimeTermination,
}

impl ConstructionPhase {
    pub fn new(passes: usize, termination: TimeTermination) -> Self {
        Self {
            passes,
            termination,
        }
    }
}

/// Priority of a pending lecture; smaller sorts first.
#[derive(Debug, Clone, Copy)]
struct Rank {
    timeslots: f64,
    positions: f64,
    conflicts: usize,
}

impl Rank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.timeslots
            .total_cmp(&other.timeslots)
            .then(self.positions.total_cmp(&other.positions))
            .then(other.conflicts.cmp(&self.conflicts))
    }
}

fn feasible_timeslots(instance: &Instance, grid: &Timetable, course: CourseId) -> Vec<bool> {
    (0..grid.timeslots())
        .map(|ts| course_fits_into_timeslot(instance, grid, course, ts))
        .collect()
}

/// Orders the pending lectures for placement and takes them out of the
/// pending collection.
///
/// A lecture ranks by (a) its feasible timeslots divided by the square root
/// of its course's pending lectures, (b) its capacity-respecting feasible
/// empty positions times that square root, both ascending, then (c) the
/// number of other pending lectures it conflicts with, descending.
pub(crate) fn rank_pending(
    instance: &Instance,
    state: &mut SolverState,
    weights: &PenaltyWeights,
) -> Vec<Event> {
    let grid = state.grid();
    let mut ranks: Vec<Option<Rank>> = vec![None; instance.course_count()];
    for event in state.pending() {
        let course = event.course;
        if ranks[course.0].is_some() {
            continue;
        }
        let remaining = (state.pending_of(course) as f64).sqrt();
        let fits = feasible_timeslots(instance, grid, course);
        let timeslots = fits.iter().filter(|&&f| f).count() as f64;
        let positions = grid
            .empty_positions()
            .iter()
            .filter(|p| {
                fits[p.timeslot] && room_capacity(instance, weights, course, p.room) == 0
            })
            .count() as f64;
        let conflicts = instance
            .course_ids()
            .filter(|&other| instance.conflicts(course, other))
            .map(|other| state.pending_of(other))
            .sum::<usize>()
            - 1;
        ranks[course.0] = Some(Rank {
            timeslots: timeslots / remaining,
            positions: positions * remaining,
            conflicts,
        });
    }

    let mut order = state.take_pending();
    order.sort_by(|a, b| match (ranks[a.course.0], ranks[b.course.0]) {
        (Some(ra), Some(rb)) => ra.cmp(&rb),
        _ => Ordering::Equal,
    });
    order
}

/// Picks the empty position for a lecture of `course`.
///
/// Positions with no capacity excess are equally good and one is drawn at
/// random; otherwise the position with the smallest excess wins, ties
/// going to the lowest position.
pub(crate) fn choose_position(
    instance: &Instance,
    grid: &Timetable,
    weights: &PenaltyWeights,
    course: CourseId,
    rng: &mut StdRng,
) -> Option<Position> {
    let fits = feasible_timeslots(instance, grid, course);
    let mut good = Vec::new();
    let mut fallback: Option<(i64, Position)> = None;
    for position in grid.empty_positions().iter() {
        if !fits[position.timeslot] {
            continue;
        }
        let excess = room_capacity(instance, weights, course, position.room);
        if excess == 0 {
            good.push(position);
        } else if fallback.map_or(true, |best| (excess, position) < best) {
            fallback = Some((excess, position));
        }
    }
    good.choose(rng)
        .copied()
        .or(fallback.map(|(_, position)| position))
}

/// Evicts random placed lectures to make room for `unplaced` ones.
///
/// As many positions are vacated as there are unplaced lectures (or as
/// there are placed ones, if fewer); their lectures go to pending. Each
/// unplaced lecture then takes the first vacated position whose timeslot
/// it fits, or goes to pending.
pub(crate) fn displace(
    instance: &Instance,
    state: &mut SolverState,
    rng: &mut StdRng,
    mut unplaced: Vec<Event>,
) -> Result<()> {
    let occupied: Vec<Position> = state.grid().occupied().map(|(p, _)| p).collect();
    let count = unplaced.len().min(occupied.len());
    let mut vacated: Vec<Position> = occupied.choose_multiple(rng, count).copied().collect();
    for &position in &vacated {
        state.unplace_to_pending(instance, position)?;
    }

    unplaced.shuffle(rng);
    for event in unplaced {
        let slot = vacated.iter().position(|p| {
            course_fits_into_timeslot(instance, state.grid(), event.course, p.timeslot)
        });
        match slot {
            Some(i) => {
                let position = vacated.remove(i);
                state.place(instance, event, position)?;
            }
            None => state.push_pending(instance, event)?,
        }
    }
    Ok(())
}

impl Phase for ConstructionPhase {
    fn solve(&mut self, ctx: &mut SolverContext<'_>) -> error::Result<PhaseOutcome> {
        self.run(ctx).map_err(|err| ctx.in_phase(PHASE, err))
    }

    fn phase_type_name(&self) -> &'static str {
        PHASE_TYPE
    }
}

impl ConstructionPhase {
    fn run(&mut self, ctx: &mut SolverContext<'_>) -> error::Result<PhaseOutcome> {
        let instance = ctx.instance();
        let weights = ctx.config().weights;
        let mut stats = PhaseStats::new(0, PHASE, ctx.elapsed());
        let initial = ctx.distance();

        info!(
            event = "phase_start",
            phase = PHASE,
            phase_index = 0,
            pending = initial,
        );

        let mut pass = 0;
        while ctx.distance() > 0 && pass < self.passes {
            if ctx.is_terminated_at(&self.termination, ctx.elapsed()) {
                break;
            }
            pass += 1;

            let order = rank_pending(instance, &mut ctx.state, &weights);
            let mut unplaced = Vec::new();
            for event in order {
                let position =
                    choose_position(instance, ctx.state.grid(), &weights, event.course, &mut ctx.rng);
                stats.record_step();
                stats.record_move(position.is_some());
                match position {
                    Some(position) => {
                        ctx.state.place(instance, event, position)?;
                        trace!(event = "step", lecture = event.id.0, position = %position, accepted = true);
                    }
                    None => {
                        trace!(event = "step", lecture = event.id.0, accepted = false);
                        unplaced.push(event);
                    }
                }
            }

            let unplaced_count = unplaced.len();
            if pass == self.passes {
                for event in unplaced {
                    ctx.state.push_pending(instance, event)?;
                }
            } else if !unplaced.is_empty() {
                displace(instance, &mut ctx.state, &mut ctx.rng, unplaced)?;
            }
            ctx.assert_move(PHASE)?;

            debug!(
                event = "progress",
                pass = pass,
                unplaced = unplaced_count,
                distance = ctx.distance(),
            );
        }

        ctx.assert_phase(PHASE)?;
        stats.finish(ctx.elapsed());
        let distance = ctx.distance();
        info!(
            event = "phase_end",
            phase = PHASE,
            phase_index = 0,
            duration_ms = stats.duration_ms(),
            steps = stats.step_count,
            speed = stats.speed(),
            passes = pass,
            score = distance,
        );

        Ok(PhaseOutcome {
            stats,
            initial_score: initial as i64,
            best_score: distance as i64,
            series: Vec::new(),
        })
    }
}
