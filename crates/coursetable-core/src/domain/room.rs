use super::CourseId;

/// A lecture room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub name: String,
    pub capacity: usize,
    pub site: usize,
}

/// A room a course must not use.
///
/// Retained from the instance file; the UD2 formulation does not score it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomConstraint {
    pub course: CourseId,
    pub room: usize,
}
