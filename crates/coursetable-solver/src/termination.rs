//! Time-based termination.

use std::time::Duration;

/// A time budget measured on the solver clock.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use coursetable_solver::termination::TimeTermination;
///
/// let term = TimeTermination::starting_at(Duration::from_secs(10), Duration::from_secs(30));
/// assert!(!term.is_terminated(Duration::from_secs(39)));
/// assert!(term.is_terminated(Duration::from_secs(40)));
/// assert_eq!(term.remaining(Duration::from_secs(25)), Duration::from_secs(15));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeTermination {
    started_at: Duration,
    limit: Duration,
}

impl TimeTermination {
    /// A budget counted from the clock's origin.
    pub fn new(limit: Duration) -> Self {
        Self::starting_at(Duration::ZERO, limit)
    }

    pub fn starting_at(started_at: Duration, limit: Duration) -> Self {
        Self { started_at, limit }
    }

    pub fn millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn seconds(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    pub fn is_terminated(&self, elapsed: Duration) -> bool {
        elapsed.saturating_sub(self.started_at) >= self.limit
    }

    pub fn remaining(&self, elapsed: Duration) -> Duration {
        self.limit
            .saturating_sub(elapsed.saturating_sub(self.started_at))
    }

    /// A sub-budget starting at `elapsed` that ends no later than `self`.
    pub fn sub_budget(&self, elapsed: Duration, limit: Duration) -> Self {
        Self::starting_at(elapsed, limit.min(self.remaining(elapsed)))
    }
}
