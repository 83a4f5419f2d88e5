//! The timetable grid.
//!
//! A [`Timetable`] maps every `(room, timeslot)` position to at most one
//! [`Event`]. It owns the set of empty positions and a per-course index of
//! occupied positions; all three are updated together by every mutation,
//! so the empty-positions set is always the exact complement of the
//! occupied cells.

mod position_set;

#[cfg(test)]
mod tests;

use smallvec::SmallVec;

use crate::domain::{CourseId, Event, Instance, Position};
use crate::error::{CoursetableError, Result};

pub use position_set::PositionSet;

/// Rooms x timeslots grid of optional events.
#[derive(Debug, Clone)]
pub struct Timetable {
    rooms: usize,
    timeslots: usize,
    cells: Vec<Option<Event>>,
    empty: PositionSet,
    course_positions: Vec<SmallVec<[Position; 8]>>,
    placed: usize,
}

impl Timetable {
    /// Creates an empty grid.
    pub fn new(rooms: usize, timeslots: usize, courses: usize) -> Self {
        Self {
            rooms,
            timeslots,
            cells: vec![None; rooms * timeslots],
            empty: PositionSet::full(rooms, timeslots),
            course_positions: vec![SmallVec::new(); courses],
            placed: 0,
        }
    }

    /// Creates an empty grid sized for `instance`.
    pub fn for_instance(instance: &Instance) -> Self {
        Self::new(
            instance.room_count(),
            instance.timeslot_count(),
            instance.course_count(),
        )
    }

    #[inline]
    pub fn rooms(&self) -> usize {
        self.rooms
    }

    #[inline]
    pub fn timeslots(&self) -> usize {
        self.timeslots
    }

    #[inline]
    pub fn position_count(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    fn index(&self, position: Position) -> usize {
        position.room * self.timeslots + position.timeslot
    }

    #[inline]
    pub fn contains_position(&self, position: Position) -> bool {
        position.room < self.rooms && position.timeslot < self.timeslots
    }

    #[inline]
    pub fn get(&self, position: Position) -> Option<Event> {
        self.cells[self.index(position)]
    }

    #[inline]
    pub fn is_free(&self, position: Position) -> bool {
        self.get(position).is_none()
    }

    /// Events placed in `timeslot`, with their room.
    pub fn events_in_timeslot(&self, timeslot: usize) -> impl Iterator<Item = (usize, Event)> + '_ {
        (0..self.rooms).filter_map(move |room| {
            self.cells[room * self.timeslots + timeslot].map(|event| (room, event))
        })
    }

    /// Occupied positions in room-major order.
    pub fn occupied(&self) -> impl Iterator<Item = (Position, Event)> + '_ {
        self.cells.iter().enumerate().filter_map(|(i, cell)| {
            cell.map(|event| {
                (
                    Position::new(i / self.timeslots, i % self.timeslots),
                    event,
                )
            })
        })
    }

    pub fn empty_positions(&self) -> &PositionSet {
        &self.empty
    }

    /// Positions currently holding lectures of `course`.
    pub fn positions_of(&self, course: CourseId) -> &[Position] {
        &self.course_positions[course.0]
    }

    pub fn placed_count(&self) -> usize {
        self.placed
    }

    pub fn placed_of(&self, course: CourseId) -> usize {
        self.course_positions[course.0].len()
    }

    /// Places `event` at an empty `position`.
    ///
    /// # Errors
    ///
    /// Returns an invariant violation if the position lies outside the grid
    /// or is already occupied.
    pub fn assign(&mut self, event: Event, position: Position) -> Result<()> {
        if !self.contains_position(position) {
            return Err(CoursetableError::invariant(format!(
                "position {position} lies outside the {}x{} grid",
                self.rooms, self.timeslots
            )));
        }
        let index = self.index(position);
        if let Some(occupant) = self.cells[index] {
            return Err(CoursetableError::invariant(format!(
                "cannot place event {} at {position}: occupied by event {}",
                event.id, occupant.id
            )));
        }
        self.cells[index] = Some(event);
        self.empty.remove(position);
        self.course_positions[event.course.0].push(position);
        self.placed += 1;
        Ok(())
    }

    /// Clears `position`, returning the event it held.
    pub fn remove(&mut self, position: Position) -> Option<Event> {
        let index = self.index(position);
        let event = self.cells[index].take()?;
        self.empty.insert(position);
        let positions = &mut self.course_positions[event.course.0];
        if let Some(i) = positions.iter().position(|&p| p == position) {
            positions.swap_remove(i);
        }
        self.placed -= 1;
        Some(event)
    }

    /// Writes a set of cells at once.
    ///
    /// Every listed position is cleared first, then the listed events are
    /// placed, so the entries may permute events among themselves.
    pub fn rewrite(&mut self, cells: &[(Position, Option<Event>)]) -> Result<()> {
        for &(position, _) in cells {
            if !self.contains_position(position) {
                return Err(CoursetableError::invariant(format!(
                    "rewrite of {position} lies outside the grid"
                )));
            }
            self.remove(position);
        }
        for &(position, event) in cells {
            if let Some(event) = event {
                self.assign(event, position)?;
            }
        }
        Ok(())
    }

    /// Verifies that cells, the empty-positions set and the course index
    /// agree, and that no event occupies two cells.
    pub fn check_consistency(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        let mut per_course = vec![0usize; self.course_positions.len()];
        let mut placed = 0;

        for (i, cell) in self.cells.iter().enumerate() {
            let position = Position::new(i / self.timeslots, i % self.timeslots);
            match cell {
                Some(event) => {
                    placed += 1;
                    if self.empty.contains(position) {
                        return Err(CoursetableError::invariant(format!(
                            "occupied position {position} is listed as empty"
                        )));
                    }
                    if !seen.insert(event.id) {
                        return Err(CoursetableError::invariant(format!(
                            "event {} occupies more than one position",
                            event.id
                        )));
                    }
                    if !self.course_positions[event.course.0].contains(&position) {
                        return Err(CoursetableError::invariant(format!(
                            "course index misses {position} for course {}",
                            event.course
                        )));
                    }
                    per_course[event.course.0] += 1;
                }
                None => {
                    if !self.empty.contains(position) {
                        return Err(CoursetableError::invariant(format!(
                            "free position {position} is missing from the empty set"
                        )));
                    }
                }
            }
        }

        if self.empty.len() + placed != self.cells.len() || placed != self.placed {
            return Err(CoursetableError::invariant(format!(
                "{} empty + {placed} occupied != {} positions (counter says {})",
                self.empty.len(),
                self.cells.len(),
                self.placed
            )));
        }
        for (course, positions) in self.course_positions.iter().enumerate() {
            if positions.len() != per_course[course] {
                return Err(CoursetableError::invariant(format!(
                    "course index lists {} positions for course {course}, grid holds {}",
                    positions.len(),
                    per_course[course]
                )));
            }
        }
        Ok(())
    }
}

impl PartialEq for Timetable {
    fn eq(&self, other: &Self) -> bool {
        self.rooms == other.rooms && self.timeslots == other.timeslots && self.cells == other.cells
    }
}

impl Eq for Timetable {}
