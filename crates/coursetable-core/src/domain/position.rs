use std::fmt;

/// A cell of the timetable grid: a room at a timeslot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub room: usize,
    pub timeslot: usize,
}

impl Position {
    #[inline]
    pub const fn new(room: usize, timeslot: usize) -> Self {
        Self { room, timeslot }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.room, self.timeslot)
    }
}
