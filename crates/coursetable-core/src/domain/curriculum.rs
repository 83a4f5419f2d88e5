use super::CourseId;

/// A group of courses sharing students; no two of them may overlap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Curriculum {
    pub name: String,
    pub courses: Vec<CourseId>,
}

impl Curriculum {
    pub fn contains(&self, course: CourseId) -> bool {
        self.courses.contains(&course)
    }
}
