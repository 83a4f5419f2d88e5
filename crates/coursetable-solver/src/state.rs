//! The mutable working state of a solve.

use std::fmt::Write as _;

use coursetable_core::{
    CourseId, CoursetableError, Event, Instance, Position, Result, Timetable,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// The grid, its empty positions and the pending events, as one unit.
///
/// Every event of the instance is either on the grid or pending, never
/// both. Placing and pending operations check the lecture count of the
/// course, so an event that is duplicated anywhere surfaces as an
/// invariant violation at the mutation that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverState {
    grid: Timetable,
    pending: Vec<Event>,
    pending_per_course: Vec<usize>,
}

impl SolverState {
    /// Empty grid, every event pending in instance order.
    pub fn new(instance: &Instance) -> Self {
        let mut pending_per_course = vec![0; instance.course_count()];
        for event in instance.events() {
            pending_per_course[event.course.0] += 1;
        }
        Self {
            grid: Timetable::for_instance(instance),
            pending: instance.events().to_vec(),
            pending_per_course,
        }
    }

    /// Wraps an existing grid; events not on it become pending.
    pub fn from_timetable(instance: &Instance, grid: Timetable) -> Result<Self> {
        let mut on_grid = vec![false; instance.event_count()];
        for (_, event) in grid.occupied() {
            on_grid[event.id.0] = true;
        }
        let mut state = Self {
            grid,
            pending: Vec::new(),
            pending_per_course: vec![0; instance.course_count()],
        };
        for event in instance.events() {
            if !on_grid[event.id.0] {
                state.push_pending(instance, *event)?;
            }
        }
        state.check_consistency(instance)?;
        Ok(state)
    }

    #[inline]
    pub fn grid(&self) -> &Timetable {
        &self.grid
    }

    #[inline]
    pub fn pending(&self) -> &[Event] {
        &self.pending
    }

    /// Distance to feasibility: the number of pending events.
    #[inline]
    pub fn distance(&self) -> usize {
        self.pending.len()
    }

    pub fn pending_of(&self, course: CourseId) -> usize {
        self.pending_per_course[course.0]
    }

    /// Adds `event` to the pending collection.
    ///
    /// # Errors
    ///
    /// Fails if the course would then have more lectures placed or pending
    /// than it has in total.
    pub fn push_pending(&mut self, instance: &Instance, event: Event) -> Result<()> {
        self.check_lecture_count(instance, event, "pend")?;
        self.pending_per_course[event.course.0] += 1;
        self.pending.push(event);
        Ok(())
    }

    pub fn pop_pending(&mut self) -> Option<Event> {
        let event = self.pending.pop()?;
        self.pending_per_course[event.course.0] -= 1;
        Some(event)
    }

    /// Removes and returns every pending event.
    pub fn take_pending(&mut self) -> Vec<Event> {
        self.pending_per_course.iter_mut().for_each(|n| *n = 0);
        std::mem::take(&mut self.pending)
    }

    pub fn shuffle_pending(&mut self, rng: &mut StdRng) {
        self.pending.shuffle(rng);
    }

    /// Places an event that is neither on the grid nor pending.
    pub fn place(&mut self, instance: &Instance, event: Event, position: Position) -> Result<()> {
        self.check_lecture_count(instance, event, "place")?;
        self.grid.assign(event, position)
    }

    /// Clears `position`; the returned event is in neither collection
    /// until it is placed or pushed to pending again.
    pub fn unplace(&mut self, position: Position) -> Option<Event> {
        self.grid.remove(position)
    }

    /// Moves the event at `position` to the pending collection.
    pub fn unplace_to_pending(
        &mut self,
        instance: &Instance,
        position: Position,
    ) -> Result<Option<Event>> {
        match self.grid.remove(position) {
            Some(event) => {
                self.push_pending(instance, event)?;
                Ok(Some(event))
            }
            None => Ok(None),
        }
    }

    /// Rewrites grid cells among events already on the grid.
    pub fn rewrite(&mut self, cells: &[(Position, Option<Event>)]) -> Result<()> {
        self.grid.rewrite(cells)
    }

    fn check_lecture_count(&self, instance: &Instance, event: Event, action: &str) -> Result<()> {
        let course = instance.course(event.course);
        let accounted =
            self.grid.placed_of(event.course) + self.pending_per_course[event.course.0];
        if accounted >= course.lectures {
            return Err(CoursetableError::invariant(format!(
                "cannot {action} event {}: course {} already has {accounted} of {} lectures accounted for",
                event.id, course.name, course.lectures
            )));
        }
        Ok(())
    }

    /// Checks the grid and that every event is on the grid or pending
    /// exactly once.
    pub fn check_consistency(&self, instance: &Instance) -> Result<()> {
        if self.grid.rooms() != instance.room_count()
            || self.grid.timeslots() != instance.timeslot_count()
            || self.pending_per_course.len() != instance.course_count()
        {
            return Err(CoursetableError::invariant(format!(
                "state has {} rooms, {} timeslots and {} courses; instance has {}, {} and {}",
                self.grid.rooms(),
                self.grid.timeslots(),
                self.pending_per_course.len(),
                instance.room_count(),
                instance.timeslot_count(),
                instance.course_count(),
            )));
        }
        self.grid.check_consistency()?;

        let mut seen = vec![false; instance.event_count()];
        let mut pending_per_course = vec![0usize; instance.course_count()];
        let placed = self.grid.occupied().map(|(_, event)| event);
        for (event, pending) in placed
            .map(|e| (e, false))
            .chain(self.pending.iter().map(|e| (*e, true)))
        {
            if event.id.0 >= seen.len() || instance.event(event.id) != event {
                return Err(CoursetableError::invariant(format!(
                    "event {} does not belong to the instance",
                    event.id
                )));
            }
            if std::mem::replace(&mut seen[event.id.0], true) {
                return Err(CoursetableError::invariant(format!(
                    "event {} is accounted for twice",
                    event.id
                )));
            }
            if pending {
                pending_per_course[event.course.0] += 1;
            }
        }
        if let Some(missing) = seen.iter().position(|s| !s) {
            return Err(CoursetableError::invariant(format!(
                "event {missing} is neither placed nor pending"
            )));
        }
        if pending_per_course != self.pending_per_course {
            return Err(CoursetableError::invariant(
                "pending counters disagree with the pending events",
            ));
        }
        Ok(())
    }

    /// Renders the grid and the pending events for diagnostics.
    pub fn dump(&self, instance: &Instance) -> String {
        let mut out = String::new();
        for room in 0..self.grid.rooms() {
            let name = instance.rooms().get(room).map_or("?", |r| r.name.as_str());
            let _ = write!(out, "{name:>12} |");
            for ts in 0..self.grid.timeslots() {
                match self.grid.get(Position::new(room, ts)) {
                    Some(event) => {
                        let _ = write!(out, " {:>5}", event.id.0);
                    }
                    None => out.push_str("     ."),
                }
            }
            out.push('\n');
        }
        let pending: Vec<String> = self.pending.iter().map(|e| e.id.0.to_string()).collect();
        let _ = write!(out, "pending: [{}]", pending.join(", "));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursetable_core::EventId;
    use coursetable_test::fixtures;

    #[test]
    fn test_new_state_has_every_event_pending() {
        let instance = fixtures::toy();
        let state = SolverState::new(&instance);

        assert_eq!(state.distance(), 16);
        assert_eq!(state.grid().placed_count(), 0);
        state.check_consistency(&instance).unwrap();
    }

    #[test]
    fn test_from_timetable_pends_missing_events() {
        let instance = fixtures::toy();
        let grid = fixtures::toy_partial_timetable(&instance);
        let state = SolverState::from_timetable(&instance, grid).unwrap();

        assert_eq!(state.distance(), 7);
        let tec = instance.course_by_name("TecCos").unwrap();
        assert_eq!(state.pending_of(tec), 3);
    }

    #[test]
    fn test_duplicate_event_is_an_invariant_violation() {
        let instance = fixtures::single_lecture();
        let mut state = SolverState::new(&instance);
        let event = instance.event(EventId(0));

        let err = state.push_pending(&instance, event).unwrap_err();
        assert!(err.is_invariant_violation());

        let err = state.place(&instance, event, Position::new(0, 0)).unwrap_err();
        assert!(err.is_invariant_violation());
        assert_eq!(state.grid().placed_count(), 0);
    }

    #[test]
    fn test_place_and_unplace_round_trip() {
        let instance = fixtures::toy();
        let mut state = SolverState::new(&instance);
        let event = state.pop_pending().unwrap();

        state.place(&instance, event, Position::new(2, 7)).unwrap();
        state.check_consistency(&instance).unwrap();

        let back = state
            .unplace_to_pending(&instance, Position::new(2, 7))
            .unwrap();
        assert_eq!(back, Some(event));
        assert_eq!(state.distance(), 16);
        state.check_consistency(&instance).unwrap();
    }

    #[test]
    fn test_consistency_detects_lost_event() {
        let instance = fixtures::toy();
        let mut state = SolverState::new(&instance);
        state.pop_pending();

        let err = state.check_consistency(&instance).unwrap_err();
        assert!(err.to_string().contains("neither placed nor pending"));
    }

    #[test]
    fn test_dump_lists_pending() {
        let instance = fixtures::single_lecture();
        let state = SolverState::new(&instance);
        let dump = state.dump(&instance);

        assert!(dump.contains("r1"));
        assert!(dump.ends_with("pending: [0]"));
    }
}
