//! Domain model of a curriculum-based timetabling instance.
//!
//! Entities reference each other by dense indices ([`CourseId`],
//! [`CurriculumId`], ...) into the vectors held by [`Instance`]. The
//! original string identifiers are kept for output.

mod course;
mod curriculum;
mod event;
mod instance;
mod position;
mod room;

#[cfg(test)]
mod tests;

use std::fmt;

pub use course::Course;
pub use curriculum::Curriculum;
pub use event::Event;
pub use instance::{Instance, InstanceBuilder, Unavailability};
pub use position::Position;
pub use room::{Room, RoomConstraint};

macro_rules! index_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub usize);

        impl $name {
            #[inline]
            pub fn index(self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

index_newtype!(
    /// Index of a course in [`Instance::courses`].
    CourseId
);
index_newtype!(
    /// Index of a curriculum in [`Instance::curricula`].
    CurriculumId
);
index_newtype!(
    /// Index of a lecture event in [`Instance::events`].
    EventId
);
index_newtype!(
    /// Interned teacher identifier.
    TeacherId
);
