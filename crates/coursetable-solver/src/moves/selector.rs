//! Uniform random move selection.

use coursetable_core::{Position, Timetable};
use rand::rngs::StdRng;
use rand::Rng;

use super::Move;

/// The three move families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    SwapTimeslots,
    SwapPositions,
    SwapRooms,
}

impl MoveKind {
    /// Families available while repairing hard constraints.
    pub const REPAIR: [MoveKind; 2] = [MoveKind::SwapTimeslots, MoveKind::SwapPositions];

    /// Families available while improving soft constraints.
    pub const IMPROVEMENT: [MoveKind; 3] = [
        MoveKind::SwapTimeslots,
        MoveKind::SwapPositions,
        MoveKind::SwapRooms,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::SwapTimeslots => "swap_timeslots",
            Self::SwapPositions => "swap_positions",
            Self::SwapRooms => "swap_rooms",
        }
    }

    /// Draws a random move of this family, or `None` if the grid is too
    /// small to hold one.
    pub fn select(self, rng: &mut StdRng, grid: &Timetable) -> Option<Move> {
        let (rooms, timeslots) = (grid.rooms(), grid.timeslots());
        match self {
            Self::SwapTimeslots => random_timeslot_pair(rng, timeslots)
                .map(|(first, second)| Move::SwapTimeslots { first, second }),
            Self::SwapPositions => random_position_pair(rng, rooms, timeslots)
                .map(|(first, second)| Move::SwapPositions { first, second }),
            Self::SwapRooms => {
                random_room_pair(rng, rooms, timeslots).map(|(first, second, timeslot)| {
                    Move::SwapRooms {
                        first,
                        second,
                        timeslot,
                    }
                })
            }
        }
    }
}

fn distinct_pair(rng: &mut StdRng, n: usize) -> Option<(usize, usize)> {
    if n < 2 {
        return None;
    }
    let first = rng.random_range(0..n);
    let mut second = rng.random_range(0..n - 1);
    if second >= first {
        second += 1;
    }
    Some((first, second))
}

/// Two distinct timeslots.
pub fn random_timeslot_pair(rng: &mut StdRng, timeslots: usize) -> Option<(usize, usize)> {
    distinct_pair(rng, timeslots)
}

/// Two positions in distinct timeslots; rooms are drawn independently.
pub fn random_position_pair(
    rng: &mut StdRng,
    rooms: usize,
    timeslots: usize,
) -> Option<(Position, Position)> {
    if rooms == 0 {
        return None;
    }
    let (t1, t2) = distinct_pair(rng, timeslots)?;
    let r1 = rng.random_range(0..rooms);
    let r2 = rng.random_range(0..rooms);
    Some((Position::new(r1, t1), Position::new(r2, t2)))
}

/// Two distinct rooms and a timeslot.
pub fn random_room_pair(
    rng: &mut StdRng,
    rooms: usize,
    timeslots: usize,
) -> Option<(usize, usize, usize)> {
    if timeslots == 0 {
        return None;
    }
    let (r1, r2) = distinct_pair(rng, rooms)?;
    Some((r1, r2, rng.random_range(0..timeslots)))
}
