//! Neighborhood moves.
//!
//! Three move families work on the shared [`SolverState`]:
//!
//! - [`swap_timeslots`] exchanges two whole timeslot columns,
//! - [`swap_positions`] exchanges the contents of two cells in different
//!   timeslots,
//! - [`swap_rooms`] exchanges two cells within one timeslot.
//!
//! In [`Feasibility::Preserve`] mode a move is checked before anything is
//! written, so a rejected move leaves the state untouched and an applied
//! move can be undone exactly with [`reverse`]. In [`Feasibility::Relax`]
//! mode the moved lectures are re-checked at their destination and any
//! that no longer fit go to the pending collection; such a move is undone
//! by restoring a snapshot of the whole state instead.

mod selector;

#[cfg(test)]
mod tests;

use coursetable_core::{CourseId, Event, Instance, Position, Result};
use coursetable_scoring::{course_fits_into_timeslot, course_fits_replacing};
use smallvec::SmallVec;

use crate::state::SolverState;

pub use selector::{random_position_pair, random_room_pair, random_timeslot_pair, MoveKind};

/// How a move treats hard constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feasibility {
    /// Reject any move that would break a hard constraint.
    Preserve,
    /// Apply the move and send lectures that no longer fit to pending.
    Relax,
}

/// Why a move was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Both endpoints are empty or hold the same lecture.
    NoEffect,
    /// The move would break a hard constraint.
    Infeasible,
}

/// Grid cells as they were before a move.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MoveBackup {
    cells: SmallVec<[(Position, Option<Event>); 4]>,
}

impl MoveBackup {
    fn capture<I>(state: &SolverState, positions: I) -> Self
    where
        I: IntoIterator<Item = Position>,
    {
        Self {
            cells: positions
                .into_iter()
                .map(|p| (p, state.grid().get(p)))
                .collect(),
        }
    }

    pub fn cells(&self) -> &[(Position, Option<Event>)] {
        &self.cells
    }

    /// Courses with a lecture in one of the backed-up cells.
    pub fn touched_courses(&self) -> impl Iterator<Item = CourseId> + '_ {
        self.cells
            .iter()
            .filter_map(|(_, event)| event.map(|e| e.course))
    }
}

/// Result of applying a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Applied(MoveBackup),
    Rejected(Rejection),
}

impl MoveOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// A concrete move, as drawn by the selectors and remembered by tabu lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    SwapTimeslots {
        first: usize,
        second: usize,
    },
    SwapPositions {
        first: Position,
        second: Position,
    },
    SwapRooms {
        first: usize,
        second: usize,
        timeslot: usize,
    },
}

impl Move {
    pub fn kind(&self) -> MoveKind {
        match self {
            Self::SwapTimeslots { .. } => MoveKind::SwapTimeslots,
            Self::SwapPositions { .. } => MoveKind::SwapPositions,
            Self::SwapRooms { .. } => MoveKind::SwapRooms,
        }
    }

    /// Applies the move. Room swaps ignore `mode`: they never change a
    /// lecture's timeslot.
    pub fn apply(
        &self,
        instance: &Instance,
        state: &mut SolverState,
        mode: Feasibility,
    ) -> Result<MoveOutcome> {
        match *self {
            Self::SwapTimeslots { first, second } => {
                swap_timeslots(instance, state, first, second, mode)
            }
            Self::SwapPositions { first, second } => {
                swap_positions(instance, state, first, second, mode)
            }
            Self::SwapRooms {
                first,
                second,
                timeslot,
            } => swap_rooms(state, first, second, timeslot),
        }
    }
}

/// Exchanges the lectures of timeslots `first` and `second`, room by room.
///
/// In preserve mode the move is rejected if any lecture is unavailable
/// in its new timeslot. Conflicts among lectures cannot arise: each column
/// moves as a whole.
pub fn swap_timeslots(
    instance: &Instance,
    state: &mut SolverState,
    first: usize,
    second: usize,
    mode: Feasibility,
) -> Result<MoveOutcome> {
    let grid = state.grid();
    let from_first: SmallVec<[(usize, Event); 8]> = grid.events_in_timeslot(first).collect();
    let from_second: SmallVec<[(usize, Event); 8]> = grid.events_in_timeslot(second).collect();
    if first == second || (from_first.is_empty() && from_second.is_empty()) {
        return Ok(MoveOutcome::Rejected(Rejection::NoEffect));
    }

    let rooms = grid.rooms();
    let backup = MoveBackup::capture(
        state,
        (0..rooms).flat_map(|room| [Position::new(room, first), Position::new(room, second)]),
    );

    match mode {
        Feasibility::Preserve => {
            let unavailable = from_first
                .iter()
                .any(|(_, e)| instance.is_unavailable(e.course, second))
                || from_second
                    .iter()
                    .any(|(_, e)| instance.is_unavailable(e.course, first));
            if unavailable {
                return Ok(MoveOutcome::Rejected(Rejection::Infeasible));
            }
            let swapped: SmallVec<[(Position, Option<Event>); 16]> = backup
                .cells()
                .iter()
                .map(|&(p, event)| {
                    let target = if p.timeslot == first { second } else { first };
                    (Position::new(p.room, target), event)
                })
                .collect();
            state.rewrite(&swapped)?;
        }
        Feasibility::Relax => {
            for &(room, _) in &from_first {
                state.unplace(Position::new(room, first));
            }
            for &(room, _) in &from_second {
                state.unplace(Position::new(room, second));
            }
            relocate(instance, state, &from_first, second)?;
            relocate(instance, state, &from_second, first)?;
        }
    }
    Ok(MoveOutcome::Applied(backup))
}

/// Places each lecture in its room at `timeslot` if it fits there, else
/// sends it to pending.
fn relocate(
    instance: &Instance,
    state: &mut SolverState,
    events: &[(usize, Event)],
    timeslot: usize,
) -> Result<()> {
    for &(room, event) in events {
        let target = Position::new(room, timeslot);
        if course_fits_into_timeslot(instance, state.grid(), event.course, timeslot) {
            state.place(instance, event, target)?;
        } else {
            state.push_pending(instance, event)?;
        }
    }
    Ok(())
}

/// Exchanges the contents of two cells.
///
/// Cells in the same timeslot are handed to [`swap_rooms`]. In preserve
/// mode each lecture is checked against the other cell's timeslot as if
/// that cell were already vacated.
pub fn swap_positions(
    instance: &Instance,
    state: &mut SolverState,
    first: Position,
    second: Position,
    mode: Feasibility,
) -> Result<MoveOutcome> {
    if first.timeslot == second.timeslot {
        return swap_rooms(state, first.room, second.room, first.timeslot);
    }
    let grid = state.grid();
    let (a, b) = (grid.get(first), grid.get(second));
    if a == b {
        return Ok(MoveOutcome::Rejected(Rejection::NoEffect));
    }
    let backup = MoveBackup::capture(state, [first, second]);

    match mode {
        Feasibility::Preserve => {
            let fits = |event: Option<Event>, target: Position| {
                event.map_or(true, |e| course_fits_replacing(instance, grid, e.course, target))
            };
            if !fits(a, second) || !fits(b, first) {
                return Ok(MoveOutcome::Rejected(Rejection::Infeasible));
            }
            state.rewrite(&[(first, b), (second, a)])?;
        }
        Feasibility::Relax => {
            state.unplace(first);
            state.unplace(second);
            for (event, target) in [(a, second), (b, first)] {
                let Some(event) = event else { continue };
                if course_fits_into_timeslot(instance, state.grid(), event.course, target.timeslot) {
                    state.place(instance, event, target)?;
                } else {
                    state.push_pending(instance, event)?;
                }
            }
        }
    }
    Ok(MoveOutcome::Applied(backup))
}

/// Exchanges the lectures in rooms `first` and `second` at `timeslot`.
///
/// Never infeasible: no lecture changes timeslot.
pub fn swap_rooms(
    state: &mut SolverState,
    first: usize,
    second: usize,
    timeslot: usize,
) -> Result<MoveOutcome> {
    let p1 = Position::new(first, timeslot);
    let p2 = Position::new(second, timeslot);
    let (a, b) = (state.grid().get(p1), state.grid().get(p2));
    if first == second || a == b {
        return Ok(MoveOutcome::Rejected(Rejection::NoEffect));
    }
    let backup = MoveBackup::capture(state, [p1, p2]);
    state.rewrite(&[(p1, b), (p2, a)])?;
    Ok(MoveOutcome::Applied(backup))
}

/// Restores the cells captured by a preserve-mode move.
///
/// Relax-mode moves may have sent lectures to pending; undo those by
/// restoring a snapshot of the state instead.
pub fn reverse(state: &mut SolverState, backup: &MoveBackup) -> Result<()> {
    state.rewrite(backup.cells())
}
