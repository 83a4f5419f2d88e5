use crate::domain::Position;

/// Set of grid positions with O(1) insert, remove, membership and
/// indexed access.
///
/// Removal swaps the last element into the vacated slot, so iteration
/// order depends on the history of operations but is deterministic.
#[derive(Debug, Clone)]
pub struct PositionSet {
    timeslots: usize,
    items: Vec<Position>,
    slots: Vec<Option<usize>>,
}

impl PositionSet {
    /// Creates an empty set over a `rooms x timeslots` domain.
    pub fn new(rooms: usize, timeslots: usize) -> Self {
        Self {
            timeslots,
            items: Vec::with_capacity(rooms * timeslots),
            slots: vec![None; rooms * timeslots],
        }
    }

    /// Creates a set holding every position of the domain, room-major.
    pub fn full(rooms: usize, timeslots: usize) -> Self {
        let mut set = Self::new(rooms, timeslots);
        for room in 0..rooms {
            for timeslot in 0..timeslots {
                set.insert(Position::new(room, timeslot));
            }
        }
        set
    }

    #[inline]
    fn key(&self, position: Position) -> usize {
        position.room * self.timeslots + position.timeslot
    }

    /// Inserts `position`; returns false if it was already present.
    pub fn insert(&mut self, position: Position) -> bool {
        let key = self.key(position);
        if self.slots[key].is_some() {
            return false;
        }
        self.slots[key] = Some(self.items.len());
        self.items.push(position);
        true
    }

    /// Removes `position`; returns false if it was absent.
    pub fn remove(&mut self, position: Position) -> bool {
        let key = self.key(position);
        let Some(slot) = self.slots[key].take() else {
            return false;
        };
        self.items.swap_remove(slot);
        if let Some(&moved) = self.items.get(slot) {
            let moved_key = self.key(moved);
            self.slots[moved_key] = Some(slot);
        }
        true
    }

    #[inline]
    pub fn contains(&self, position: Position) -> bool {
        self.slots[self.key(position)].is_some()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the element stored at `index`, for uniform sampling.
    #[inline]
    pub fn get(&self, index: usize) -> Option<Position> {
        self.items.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        self.items.iter().copied()
    }

    pub fn as_slice(&self) -> &[Position] {
        &self.items
    }
}
