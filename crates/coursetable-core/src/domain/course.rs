use super::TeacherId;

/// A course taught as a number of weekly lectures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub name: String,
    pub teacher: TeacherId,
    /// Number of lectures, i.e. the number of events generated for the course.
    pub lectures: usize,
    /// Lectures should be spread over at least this many days.
    pub min_working_days: usize,
    pub students: usize,
    /// Whether the course prefers double lectures. Parsed but not scored.
    pub double_lectures: bool,
}
