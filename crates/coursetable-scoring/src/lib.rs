//! Constraint evaluation for curriculum-based course timetabling.
//!
//! - [`hard`]: the four hard predicates that decide whether a lecture may
//!   be placed in a timeslot, and a whole-grid violation count
//! - [`soft`]: the weighted soft penalties and their full evaluation
//! - [`CostDirector`]: cached soft cost that is recomputed only for the
//!   courses a move touched
//!
//! All functions read the grid; none of them mutate it.

pub mod director;
pub mod hard;
pub mod soft;

pub use director::CostDirector;
pub use hard::{count_violations, course_fits_into_timeslot, course_fits_replacing};
pub use soft::{evaluate, total_cost, CostBreakdown};
