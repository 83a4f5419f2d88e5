//! Soft-constraint penalty weights.

use serde::{Deserialize, Serialize};

/// Weight applied to each soft-constraint violation.
///
/// The default corresponds to the UD2 formulation used by the ITC-2007
/// curriculum track: room capacity 1, minimum working days 5, isolated
/// lectures 2, room stability 1.
///
/// # Example
///
/// ```
/// use coursetable_core::PenaltyWeights;
///
/// let weights = PenaltyWeights::default();
/// assert_eq!(weights.min_working_days, 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct PenaltyWeights {
    /// Per student exceeding the seat capacity of a room.
    pub room_capacity: i64,
    /// Per day below a course's minimum working days.
    pub min_working_days: i64,
    /// Per curriculum lecture with no adjacent curriculum lecture.
    pub isolated_lectures: i64,
    /// Per distinct room beyond the first used by a course.
    pub room_stability: i64,
}

impl PenaltyWeights {
    pub const UD2: Self = Self {
        room_capacity: 1,
        min_working_days: 5,
        isolated_lectures: 2,
        room_stability: 1,
    };
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self::UD2
    }
}
