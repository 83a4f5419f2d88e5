use super::{CourseId, EventId};

/// One lecture of a course.
///
/// A course with `n` lectures yields `n` events. Two events are the same
/// event only if their ids match; sibling lectures of one course share the
/// `course` field, which is what the "same lecture" checks compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Event {
    pub id: EventId,
    pub course: CourseId,
}

impl Event {
    pub fn new(id: EventId, course: CourseId) -> Self {
        Self { id, course }
    }

    #[inline]
    pub fn is_sibling_of(&self, other: &Event) -> bool {
        self.course == other.course
    }
}
