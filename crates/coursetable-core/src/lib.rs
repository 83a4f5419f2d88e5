//! Coursetable Core - model types for curriculum-based course timetabling
//!
//! This crate provides the fundamental abstractions shared by the solver:
//! - Domain types (courses, rooms, curricula, events) and the derived
//!   conflict tables of an [`Instance`]
//! - The [`Timetable`] grid and its empty-positions set
//! - Penalty weights for the soft constraints
//! - A parser for the `.ectt` instance format

pub mod domain;
pub mod ectt;
pub mod error;
pub mod timetable;
pub mod weights;

pub use domain::{
    Course, CourseId, Curriculum, CurriculumId, Event, EventId, Instance, InstanceBuilder,
    Position, Room, RoomConstraint, TeacherId, Unavailability,
};
pub use ectt::{parse_instance, read_instance, ParseError};
pub use error::{CoursetableError, Result};
pub use timetable::{PositionSet, Timetable};
pub use weights::PenaltyWeights;
