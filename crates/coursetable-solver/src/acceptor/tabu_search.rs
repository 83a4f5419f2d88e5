//! Tabu search acceptor.

use std::collections::VecDeque;

use coursetable_core::Position;
use rand::rngs::StdRng;

use super::Acceptor;
use crate::moves::Move;

/// A bounded list of recently tried moves; the oldest entry is evicted
/// first.
#[derive(Debug, Clone)]
pub struct TabuList<K> {
    capacity: usize,
    entries: VecDeque<K>,
}

impl<K: PartialEq> TabuList<K> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains(key)
    }

    pub fn push(&mut self, key: K) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(key);
    }

    /// Records `key` unless it is already listed; returns whether it was new.
    pub fn try_insert(&mut self, key: K) -> bool {
        if self.contains(&key) {
            return false;
        }
        self.push(key);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

fn ordered<T: Ord>(a: T, b: T) -> (T, T) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Forbids repeating a recently tried move and accepts only moves that do
/// not worsen the score.
///
/// Each move family has its own list. Pairs are stored unordered, so a
/// move is tabu in either direction: swapping timeslots 3 and 7 also
/// forbids swapping 7 and 3. Room swaps are keyed by both rooms and the
/// timeslot.
///
/// # Example
///
/// ```
/// use coursetable_solver::acceptor::{Acceptor, TabuSearchAcceptor};
/// use coursetable_solver::moves::Move;
///
/// let mut acceptor = TabuSearchAcceptor::new(300);
/// let mv = Move::SwapTimeslots { first: 3, second: 7 };
/// assert!(acceptor.is_move_allowed(&mv));
/// assert!(!acceptor.is_move_allowed(&Move::SwapTimeslots { first: 7, second: 3 }));
/// ```
#[derive(Debug, Clone)]
pub struct TabuSearchAcceptor {
    tabu_length: usize,
    timeslots: TabuList<(usize, usize)>,
    positions: TabuList<(Position, Position)>,
    rooms: TabuList<(usize, usize, usize)>,
}

impl TabuSearchAcceptor {
    pub fn new(tabu_length: usize) -> Self {
        Self {
            tabu_length,
            timeslots: TabuList::new(tabu_length),
            positions: TabuList::new(tabu_length),
            rooms: TabuList::new(tabu_length),
        }
    }

    pub fn tabu_length(&self) -> usize {
        self.tabu_length
    }
}

impl Acceptor for TabuSearchAcceptor {
    fn name(&self) -> &'static str {
        "TS"
    }

    fn is_move_allowed(&mut self, mv: &Move) -> bool {
        match *mv {
            Move::SwapTimeslots { first, second } => {
                self.timeslots.try_insert(ordered(first, second))
            }
            Move::SwapPositions { first, second } => {
                self.positions.try_insert(ordered(first, second))
            }
            Move::SwapRooms {
                first,
                second,
                timeslot,
            } => {
                let (a, b) = ordered(first, second);
                self.rooms.try_insert((a, b, timeslot))
            }
        }
    }

    fn is_accepted(&mut self, delta: i64, _rng: &mut StdRng) -> bool {
        delta <= 0
    }

    fn phase_started(&mut self) {
        self.timeslots.clear();
        self.positions.clear();
        self.rooms.clear();
    }
}
