//! Soft constraints and their weighted penalties.
//!
//! Every component is non-negative. A course with no placed lectures
//! contributes its full minimum-working-days shortfall and no
//! room-stability penalty.

use std::fmt;
use std::ops::{Add, Sub};

use smallvec::SmallVec;

use coursetable_core::{
    CourseId, CurriculumId, Instance, PenaltyWeights, Position, Timetable,
};

use crate::hard;

/// Soft cost split by constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CostBreakdown {
    pub room_capacity: i64,
    pub min_working_days: i64,
    pub isolated_lectures: i64,
    pub room_stability: i64,
}

impl CostBreakdown {
    #[inline]
    pub fn total(&self) -> i64 {
        self.room_capacity + self.min_working_days + self.isolated_lectures + self.room_stability
    }
}

impl Add for CostBreakdown {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            room_capacity: self.room_capacity + rhs.room_capacity,
            min_working_days: self.min_working_days + rhs.min_working_days,
            isolated_lectures: self.isolated_lectures + rhs.isolated_lectures,
            room_stability: self.room_stability + rhs.room_stability,
        }
    }
}

impl Sub for CostBreakdown {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            room_capacity: self.room_capacity - rhs.room_capacity,
            min_working_days: self.min_working_days - rhs.min_working_days,
            isolated_lectures: self.isolated_lectures - rhs.isolated_lectures,
            room_stability: self.room_stability - rhs.room_stability,
        }
    }
}

impl fmt::Display for CostBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (capacity {}, working days {}, isolated {}, stability {})",
            self.total(),
            self.room_capacity,
            self.min_working_days,
            self.isolated_lectures,
            self.room_stability
        )
    }
}

/// Penalty for teaching `course` in `room`: students beyond the seat count.
#[inline]
pub fn room_capacity(
    instance: &Instance,
    weights: &PenaltyWeights,
    course: CourseId,
    room: usize,
) -> i64 {
    let students = instance.course(course).students as i64;
    let capacity = instance.room(room).capacity as i64;
    (students - capacity).max(0) * weights.room_capacity
}

/// True if a lecture of `course` fits the timeslot of `position` and the
/// room is large enough.
pub fn course_fits_into_position(
    instance: &Instance,
    grid: &Timetable,
    weights: &PenaltyWeights,
    course: CourseId,
    position: Position,
) -> bool {
    hard::course_fits_into_timeslot(instance, grid, course, position.timeslot)
        && room_capacity(instance, weights, course, position.room) == 0
}

/// Room capacity penalty summed over the placed lectures of `course`.
pub fn course_room_capacity(
    instance: &Instance,
    grid: &Timetable,
    weights: &PenaltyWeights,
    course: CourseId,
) -> i64 {
    grid.positions_of(course)
        .iter()
        .map(|p| room_capacity(instance, weights, course, p.room))
        .sum()
}

/// Room capacity penalty over the whole grid.
pub fn room_capacity_all(instance: &Instance, grid: &Timetable, weights: &PenaltyWeights) -> i64 {
    grid.occupied()
        .map(|(position, event)| room_capacity(instance, weights, event.course, position.room))
        .sum()
}

/// Penalty for each day below the minimum working days of `course`.
pub fn min_working_days(
    instance: &Instance,
    grid: &Timetable,
    weights: &PenaltyWeights,
    course: CourseId,
) -> i64 {
    let mut days: SmallVec<[usize; 8]> = SmallVec::new();
    for position in grid.positions_of(course) {
        let day = instance.day_of(position.timeslot);
        if !days.contains(&day) {
            days.push(day);
        }
    }
    let target = instance.course(course).min_working_days as i64;
    (target - days.len() as i64).max(0) * weights.min_working_days
}

/// Penalty for timeslots holding a lecture of `curriculum` with no
/// curriculum lecture in the adjacent period of the same day.
///
/// Counted once per timeslot, however many of its lectures are isolated.
pub fn isolated_lectures(
    instance: &Instance,
    grid: &Timetable,
    weights: &PenaltyWeights,
    curriculum: CurriculumId,
) -> i64 {
    let mut busy = vec![false; instance.timeslot_count()];
    for &course in &instance.curriculum(curriculum).courses {
        for position in grid.positions_of(course) {
            busy[position.timeslot] = true;
        }
    }

    let periods = instance.periods_per_day();
    let mut isolated = 0;
    for day in 0..instance.days() {
        let slots = &busy[instance.day_timeslots(day)];
        for period in 0..periods {
            if !slots[period] {
                continue;
            }
            let before = period > 0 && slots[period - 1];
            let after = period + 1 < periods && slots[period + 1];
            if !before && !after {
                isolated += 1;
            }
        }
    }
    isolated * weights.isolated_lectures
}

/// Penalty for each distinct room beyond the first used by `course`.
pub fn room_stability(grid: &Timetable, weights: &PenaltyWeights, course: CourseId) -> i64 {
    let mut rooms: SmallVec<[usize; 8]> = SmallVec::new();
    for position in grid.positions_of(course) {
        if !rooms.contains(&position.room) {
            rooms.push(position.room);
        }
    }
    (rooms.len() as i64 - 1).max(0) * weights.room_stability
}

/// Components owned by a single course: capacity, working days, stability.
pub fn course_cost(
    instance: &Instance,
    grid: &Timetable,
    weights: &PenaltyWeights,
    course: CourseId,
) -> CostBreakdown {
    CostBreakdown {
        room_capacity: course_room_capacity(instance, grid, weights, course),
        min_working_days: min_working_days(instance, grid, weights, course),
        isolated_lectures: 0,
        room_stability: room_stability(grid, weights, course),
    }
}

/// Full evaluation of the soft cost.
pub fn evaluate(instance: &Instance, grid: &Timetable, weights: &PenaltyWeights) -> CostBreakdown {
    let mut cost = CostBreakdown {
        room_capacity: room_capacity_all(instance, grid, weights),
        ..CostBreakdown::default()
    };
    for course in instance.course_ids() {
        cost.min_working_days += min_working_days(instance, grid, weights, course);
        cost.room_stability += room_stability(grid, weights, course);
    }
    for curriculum in instance.curriculum_ids() {
        cost.isolated_lectures += isolated_lectures(instance, grid, weights, curriculum);
    }
    cost
}

/// Total soft cost of the grid.
pub fn total_cost(instance: &Instance, grid: &Timetable, weights: &PenaltyWeights) -> i64 {
    evaluate(instance, grid, weights).total()
}
