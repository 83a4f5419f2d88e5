//! Hard constraints.
//!
//! A lecture of course `c` may go into timeslot `t` only if
//! - `c` is not unavailable at `t`,
//! - no other lecture of `c` is already in `t`,
//! - no course taught by the same teacher is in `t`, and
//! - no course sharing a curriculum with `c` is in `t`.
//!
//! Room occupancy is enforced by the grid itself.

use coursetable_core::{CourseId, Instance, Position, Timetable};

#[inline]
pub fn teacher_is_available(instance: &Instance, course: CourseId, timeslot: usize) -> bool {
    !instance.is_unavailable(course, timeslot)
}

pub fn timeslot_has_same_lecture(grid: &Timetable, course: CourseId, timeslot: usize) -> bool {
    grid.events_in_timeslot(timeslot)
        .any(|(_, event)| event.course == course)
}

pub fn timeslot_has_same_teacher(
    instance: &Instance,
    grid: &Timetable,
    course: CourseId,
    timeslot: usize,
) -> bool {
    grid.events_in_timeslot(timeslot)
        .any(|(_, event)| instance.same_teacher(course, event.course))
}

pub fn timeslot_has_same_curriculum(
    instance: &Instance,
    grid: &Timetable,
    course: CourseId,
    timeslot: usize,
) -> bool {
    grid.events_in_timeslot(timeslot)
        .any(|(_, event)| instance.share_curriculum(course, event.course))
}

/// True if a lecture of `course` can be added to `timeslot` without
/// violating any hard constraint.
///
/// The lecture itself must not already be in that timeslot, otherwise it
/// conflicts with itself.
pub fn course_fits_into_timeslot(
    instance: &Instance,
    grid: &Timetable,
    course: CourseId,
    timeslot: usize,
) -> bool {
    teacher_is_available(instance, course, timeslot)
        && grid
            .events_in_timeslot(timeslot)
            .all(|(_, event)| !instance.conflicts(course, event.course))
}

/// True if a lecture of `course` could take over `position`, judged as if
/// the current occupant of that position were gone.
pub fn course_fits_replacing(
    instance: &Instance,
    grid: &Timetable,
    course: CourseId,
    position: Position,
) -> bool {
    teacher_is_available(instance, course, position.timeslot)
        && grid
            .events_in_timeslot(position.timeslot)
            .filter(|&(room, _)| room != position.room)
            .all(|(_, event)| !instance.conflicts(course, event.course))
}

/// Number of timeslots in which a lecture of `course` could be placed on
/// the current grid, ignoring whether a room is free.
pub fn available_timeslots(instance: &Instance, grid: &Timetable, course: CourseId) -> usize {
    (0..grid.timeslots())
        .filter(|&ts| course_fits_into_timeslot(instance, grid, course, ts))
        .count()
}

/// Counts hard-constraint violations over all placed lectures.
///
/// Each placed lecture contributes one violation for an unavailable
/// timeslot and one for every other lecture in its timeslot it conflicts
/// with, so a conflicting pair counts twice. A grid built only through
/// feasibility-checked placements returns 0.
pub fn count_violations(instance: &Instance, grid: &Timetable) -> usize {
    let mut violations = 0;
    for (position, event) in grid.occupied() {
        if !teacher_is_available(instance, event.course, position.timeslot) {
            violations += 1;
        }
        violations += grid
            .events_in_timeslot(position.timeslot)
            .filter(|&(room, other)| {
                room != position.room && instance.conflicts(event.course, other.course)
            })
            .count();
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursetable_core::{Event, EventId};
    use coursetable_test::fixtures;

    fn place(grid: &mut Timetable, instance: &Instance, event: usize, room: usize, ts: usize) {
        let event: Event = instance.event(EventId(event));
        grid.assign(event, Position::new(room, ts)).unwrap();
    }

    #[test]
    fn test_unavailability_blocks_timeslot() {
        let instance = fixtures::toy();
        let grid = Timetable::for_instance(&instance);
        let tec = instance.course_by_name("TecCos").unwrap();

        assert!(!course_fits_into_timeslot(&instance, &grid, tec, 8));
        assert!(course_fits_into_timeslot(&instance, &grid, tec, 7));
    }

    #[test]
    fn test_same_lecture_and_curriculum_conflicts() {
        let instance = fixtures::toy();
        let mut grid = Timetable::for_instance(&instance);
        let sce = instance.course_by_name("SceCosC").unwrap();
        let arc = instance.course_by_name("ArcTec").unwrap();
        let geo = instance.course_by_name("Geotec").unwrap();

        // event 0 is the first SceCosC lecture
        place(&mut grid, &instance, 0, 0, 3);

        assert!(timeslot_has_same_lecture(&grid, sce, 3));
        assert!(timeslot_has_same_curriculum(&instance, &grid, arc, 3));
        assert!(!course_fits_into_timeslot(&instance, &grid, sce, 3));
        assert!(!course_fits_into_timeslot(&instance, &grid, arc, 3));
        assert!(course_fits_into_timeslot(&instance, &grid, geo, 3));
    }

    #[test]
    fn test_same_teacher_conflict() {
        let instance = fixtures::shared_teacher_single_slot();
        let mut grid = Timetable::for_instance(&instance);
        place(&mut grid, &instance, 0, 0, 0);

        let second = instance.event(EventId(1)).course;
        assert!(timeslot_has_same_teacher(&instance, &grid, second, 0));
        assert!(!course_fits_into_timeslot(&instance, &grid, second, 0));
        assert_eq!(available_timeslots(&instance, &grid, second), 0);
    }

    #[test]
    fn test_count_violations() {
        let instance = fixtures::toy();
        let mut grid = Timetable::for_instance(&instance);
        assert_eq!(count_violations(&instance, &grid), 0);

        // two SceCosC lectures in timeslot 0: a conflicting pair
        place(&mut grid, &instance, 0, 0, 0);
        place(&mut grid, &instance, 1, 1, 0);
        assert_eq!(count_violations(&instance, &grid), 2);

        // an ArcTec lecture on Friday, where it is unavailable
        place(&mut grid, &instance, 3, 0, 16);
        assert_eq!(count_violations(&instance, &grid), 3);
    }

    #[test]
    fn test_fits_replacing_ignores_the_occupant() {
        let instance = fixtures::toy();
        let mut grid = Timetable::for_instance(&instance);
        let arc = instance.course_by_name("ArcTec").unwrap();

        // SceCosC shares Cur1 with ArcTec
        place(&mut grid, &instance, 0, 1, 2);
        assert!(!course_fits_into_timeslot(&instance, &grid, arc, 2));
        assert!(course_fits_replacing(&instance, &grid, arc, Position::new(1, 2)));
        assert!(!course_fits_replacing(&instance, &grid, arc, Position::new(0, 2)));
        // ArcTec is unavailable on day 4
        assert!(!course_fits_replacing(&instance, &grid, arc, Position::new(0, 17)));
    }
}
