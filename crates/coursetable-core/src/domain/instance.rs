//! Problem instance and its derived lookup tables.

use std::collections::HashMap;
use std::ops::Range;

use super::{
    Course, CourseId, Curriculum, CurriculumId, Event, EventId, Room, RoomConstraint, TeacherId,
};
use crate::error::{CoursetableError, Result};

/// A course that cannot be taught at a given day and period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unavailability {
    pub course: CourseId,
    pub day: usize,
    pub period: usize,
}

/// An immutable timetabling instance.
///
/// Besides the parsed entities it holds the tables every hard-constraint
/// check consults: per-course unavailability by timeslot, and the
/// course-by-course "same teacher" and "shared curriculum" relations.
///
/// Timeslots are numbered `0..days * periods_per_day`, day-major.
#[derive(Debug, Clone)]
pub struct Instance {
    name: String,
    days: usize,
    periods_per_day: usize,
    min_daily_lectures: usize,
    max_daily_lectures: usize,
    courses: Vec<Course>,
    rooms: Vec<Room>,
    curricula: Vec<Curriculum>,
    teachers: Vec<String>,
    unavailabilities: Vec<Unavailability>,
    room_constraints: Vec<RoomConstraint>,
    events: Vec<Event>,
    unavailable: Vec<bool>,
    same_teacher: Vec<bool>,
    shared_curriculum: Vec<bool>,
    course_curricula: Vec<Vec<CurriculumId>>,
}

impl Instance {
    /// Starts building an instance with the given grid dimensions.
    ///
    /// # Example
    ///
    /// ```
    /// use coursetable_core::Instance;
    ///
    /// let instance = Instance::builder("toy", 5, 4)
    ///     .course("SceCosC", "Ocra", 3, 3, 30, true)
    ///     .course("ArcTec", "Indaco", 3, 2, 42, false)
    ///     .room("rA", 32, 1)
    ///     .curriculum("Cur1", ["SceCosC", "ArcTec"])
    ///     .unavailable("ArcTec", 4, 0)
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(instance.timeslot_count(), 20);
    /// assert_eq!(instance.event_count(), 6);
    /// ```
    pub fn builder(name: impl Into<String>, days: usize, periods_per_day: usize) -> InstanceBuilder {
        InstanceBuilder::new(name, days, periods_per_day)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn days(&self) -> usize {
        self.days
    }

    pub fn periods_per_day(&self) -> usize {
        self.periods_per_day
    }

    pub fn min_daily_lectures(&self) -> usize {
        self.min_daily_lectures
    }

    pub fn max_daily_lectures(&self) -> usize {
        self.max_daily_lectures
    }

    #[inline]
    pub fn timeslot_count(&self) -> usize {
        self.days * self.periods_per_day
    }

    #[inline]
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    #[inline]
    pub fn course_count(&self) -> usize {
        self.courses.len()
    }

    #[inline]
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    #[inline]
    pub fn course(&self, id: CourseId) -> &Course {
        &self.courses[id.0]
    }

    pub fn course_ids(&self) -> impl Iterator<Item = CourseId> {
        (0..self.courses.len()).map(CourseId)
    }

    pub fn course_by_name(&self, name: &str) -> Option<CourseId> {
        self.courses.iter().position(|c| c.name == name).map(CourseId)
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    #[inline]
    pub fn room(&self, index: usize) -> &Room {
        &self.rooms[index]
    }

    pub fn room_by_name(&self, name: &str) -> Option<usize> {
        self.rooms.iter().position(|r| r.name == name)
    }

    pub fn curricula(&self) -> &[Curriculum] {
        &self.curricula
    }

    #[inline]
    pub fn curriculum(&self, id: CurriculumId) -> &Curriculum {
        &self.curricula[id.0]
    }

    pub fn curriculum_ids(&self) -> impl Iterator<Item = CurriculumId> {
        (0..self.curricula.len()).map(CurriculumId)
    }

    pub fn teacher_name(&self, id: TeacherId) -> &str {
        &self.teachers[id.0]
    }

    pub fn teacher_count(&self) -> usize {
        self.teachers.len()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    #[inline]
    pub fn event(&self, id: EventId) -> Event {
        self.events[id.0]
    }

    pub fn unavailabilities(&self) -> &[Unavailability] {
        &self.unavailabilities
    }

    pub fn room_constraints(&self) -> &[RoomConstraint] {
        &self.room_constraints
    }

    #[inline]
    pub fn day_of(&self, timeslot: usize) -> usize {
        timeslot / self.periods_per_day
    }

    #[inline]
    pub fn period_of(&self, timeslot: usize) -> usize {
        timeslot % self.periods_per_day
    }

    #[inline]
    pub fn timeslot_of(&self, day: usize, period: usize) -> usize {
        day * self.periods_per_day + period
    }

    /// The timeslots belonging to `day`, in period order.
    pub fn day_timeslots(&self, day: usize) -> Range<usize> {
        let start = day * self.periods_per_day;
        start..start + self.periods_per_day
    }

    /// True if an unavailability constraint forbids `course` at `timeslot`.
    #[inline]
    pub fn is_unavailable(&self, course: CourseId, timeslot: usize) -> bool {
        self.unavailable[course.0 * self.timeslot_count() + timeslot]
    }

    /// True if both courses are taught by the same teacher.
    ///
    /// A course shares its teacher with itself.
    #[inline]
    pub fn same_teacher(&self, a: CourseId, b: CourseId) -> bool {
        self.same_teacher[a.0 * self.courses.len() + b.0]
    }

    /// True if some curriculum contains both courses.
    #[inline]
    pub fn share_curriculum(&self, a: CourseId, b: CourseId) -> bool {
        self.shared_curriculum[a.0 * self.courses.len() + b.0]
    }

    /// True if the two courses may not be taught in the same timeslot.
    #[inline]
    pub fn conflicts(&self, a: CourseId, b: CourseId) -> bool {
        a == b || self.same_teacher(a, b) || self.share_curriculum(a, b)
    }

    pub fn curricula_of(&self, course: CourseId) -> &[CurriculumId] {
        &self.course_curricula[course.0]
    }
}

/// Builder resolving entity names into an [`Instance`].
///
/// Entities are referenced by their string identifiers; `build` resolves
/// them and rejects unknown references or out-of-range timeslots.
#[derive(Debug, Clone)]
pub struct InstanceBuilder {
    name: String,
    days: usize,
    periods_per_day: usize,
    min_daily_lectures: usize,
    max_daily_lectures: usize,
    courses: Vec<CourseSpec>,
    rooms: Vec<Room>,
    curricula: Vec<(String, Vec<String>)>,
    unavailabilities: Vec<(String, usize, usize)>,
    room_constraints: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
struct CourseSpec {
    name: String,
    teacher: String,
    lectures: usize,
    min_working_days: usize,
    students: usize,
    double_lectures: bool,
}

impl InstanceBuilder {
    pub fn new(name: impl Into<String>, days: usize, periods_per_day: usize) -> Self {
        Self {
            name: name.into(),
            days,
            periods_per_day,
            min_daily_lectures: 0,
            max_daily_lectures: periods_per_day,
            courses: Vec::new(),
            rooms: Vec::new(),
            curricula: Vec::new(),
            unavailabilities: Vec::new(),
            room_constraints: Vec::new(),
        }
    }

    pub fn daily_lectures(mut self, min: usize, max: usize) -> Self {
        self.min_daily_lectures = min;
        self.max_daily_lectures = max;
        self
    }

    pub fn course(
        mut self,
        name: impl Into<String>,
        teacher: impl Into<String>,
        lectures: usize,
        min_working_days: usize,
        students: usize,
        double_lectures: bool,
    ) -> Self {
        self.courses.push(CourseSpec {
            name: name.into(),
            teacher: teacher.into(),
            lectures,
            min_working_days,
            students,
            double_lectures,
        });
        self
    }

    pub fn room(mut self, name: impl Into<String>, capacity: usize, site: usize) -> Self {
        self.rooms.push(Room {
            name: name.into(),
            capacity,
            site,
        });
        self
    }

    pub fn curriculum<I, S>(mut self, name: impl Into<String>, courses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.curricula
            .push((name.into(), courses.into_iter().map(Into::into).collect()));
        self
    }

    pub fn unavailable(mut self, course: impl Into<String>, day: usize, period: usize) -> Self {
        self.unavailabilities.push((course.into(), day, period));
        self
    }

    pub fn room_constraint(mut self, course: impl Into<String>, room: impl Into<String>) -> Self {
        self.room_constraints.push((course.into(), room.into()));
        self
    }

    /// Resolves names and computes the derived tables.
    ///
    /// # Errors
    ///
    /// Returns [`CoursetableError::InvalidInstance`] for empty grid
    /// dimensions, duplicate course or room names, unknown course or room
    /// references, and unavailabilities outside the grid.
    pub fn build(self) -> Result<Instance> {
        if self.days == 0 || self.periods_per_day == 0 {
            return Err(CoursetableError::invalid_instance(format!(
                "grid needs at least one day and one period, got {} days x {} periods",
                self.days, self.periods_per_day
            )));
        }

        let mut course_index: HashMap<&str, CourseId> = HashMap::new();
        for (i, spec) in self.courses.iter().enumerate() {
            if course_index.insert(spec.name.as_str(), CourseId(i)).is_some() {
                return Err(CoursetableError::invalid_instance(format!(
                    "duplicate course '{}'",
                    spec.name
                )));
            }
        }
        let mut room_index: HashMap<&str, usize> = HashMap::new();
        for (i, room) in self.rooms.iter().enumerate() {
            if room_index.insert(room.name.as_str(), i).is_some() {
                return Err(CoursetableError::invalid_instance(format!(
                    "duplicate room '{}'",
                    room.name
                )));
            }
        }
        let resolve_course = |name: &str, context: &str| {
            course_index.get(name).copied().ok_or_else(|| {
                CoursetableError::invalid_instance(format!("unknown course '{name}' in {context}"))
            })
        };

        let mut teachers: Vec<String> = Vec::new();
        let mut courses = Vec::with_capacity(self.courses.len());
        for spec in &self.courses {
            let teacher = match teachers.iter().position(|t| *t == spec.teacher) {
                Some(i) => TeacherId(i),
                None => {
                    teachers.push(spec.teacher.clone());
                    TeacherId(teachers.len() - 1)
                }
            };
            courses.push(Course {
                name: spec.name.clone(),
                teacher,
                lectures: spec.lectures,
                min_working_days: spec.min_working_days,
                students: spec.students,
                double_lectures: spec.double_lectures,
            });
        }

        let mut curricula = Vec::with_capacity(self.curricula.len());
        for (name, members) in &self.curricula {
            let context = format!("curriculum '{name}'");
            let courses = members
                .iter()
                .map(|m| resolve_course(m, &context))
                .collect::<Result<Vec<_>>>()?;
            curricula.push(Curriculum {
                name: name.clone(),
                courses,
            });
        }

        let mut unavailabilities = Vec::with_capacity(self.unavailabilities.len());
        for (course, day, period) in &self.unavailabilities {
            let id = resolve_course(course, "unavailability constraints")?;
            if *day >= self.days || *period >= self.periods_per_day {
                return Err(CoursetableError::invalid_instance(format!(
                    "unavailability of '{course}' at day {day} period {period} lies outside the grid"
                )));
            }
            unavailabilities.push(Unavailability {
                course: id,
                day: *day,
                period: *period,
            });
        }

        let mut room_constraints = Vec::with_capacity(self.room_constraints.len());
        for (course, room) in &self.room_constraints {
            let course = resolve_course(course, "room constraints")?;
            let room = room_index.get(room.as_str()).copied().ok_or_else(|| {
                CoursetableError::invalid_instance(format!(
                    "unknown room '{room}' in room constraints"
                ))
            })?;
            room_constraints.push(RoomConstraint { course, room });
        }

        let events = courses
            .iter()
            .enumerate()
            .flat_map(|(c, course)| std::iter::repeat(CourseId(c)).take(course.lectures))
            .enumerate()
            .map(|(i, course)| Event::new(EventId(i), course))
            .collect();

        let n_courses = courses.len();
        let n_timeslots = self.days * self.periods_per_day;

        let mut unavailable = vec![false; n_courses * n_timeslots];
        for u in &unavailabilities {
            unavailable[u.course.0 * n_timeslots + u.day * self.periods_per_day + u.period] = true;
        }

        let mut same_teacher = vec![false; n_courses * n_courses];
        for a in 0..n_courses {
            for b in 0..n_courses {
                same_teacher[a * n_courses + b] = courses[a].teacher == courses[b].teacher;
            }
        }

        let mut course_curricula = vec![Vec::new(); n_courses];
        let mut shared_curriculum = vec![false; n_courses * n_courses];
        for (q, curriculum) in curricula.iter().enumerate() {
            for &a in &curriculum.courses {
                if !course_curricula[a.0].contains(&CurriculumId(q)) {
                    course_curricula[a.0].push(CurriculumId(q));
                }
                for &b in &curriculum.courses {
                    shared_curriculum[a.0 * n_courses + b.0] = true;
                }
            }
        }

        Ok(Instance {
            name: self.name,
            days: self.days,
            periods_per_day: self.periods_per_day,
            min_daily_lectures: self.min_daily_lectures,
            max_daily_lectures: self.max_daily_lectures,
            courses,
            rooms: self.rooms,
            curricula,
            teachers,
            unavailabilities,
            room_constraints,
            events,
            unavailable,
            same_teacher,
            shared_curriculum,
            course_curricula,
        })
    }
}
