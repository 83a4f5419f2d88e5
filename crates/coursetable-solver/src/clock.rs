//! Time sources for time-bounded phases.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Elapsed time since the clock was created.
///
/// Every search loop checks its budget against a `Clock`, so tests can
/// swap the wall clock for a [`TickClock`] and get runs of a fixed length.
pub trait Clock: Send + Sync + Debug {
    fn elapsed(&self) -> Duration;
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// A clock that advances by a fixed step on every read.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use coursetable_solver::clock::{Clock, TickClock};
///
/// let clock = TickClock::new(Duration::from_millis(10));
/// assert_eq!(clock.elapsed(), Duration::from_millis(10));
/// assert_eq!(clock.elapsed(), Duration::from_millis(20));
/// assert_eq!(clock.reads(), 2);
/// ```
#[derive(Debug)]
pub struct TickClock {
    step: Duration,
    reads: AtomicU64,
}

impl TickClock {
    pub fn new(step: Duration) -> Self {
        Self {
            step,
            reads: AtomicU64::new(0),
        }
    }

    pub fn millis(step: u64) -> Self {
        Self::new(Duration::from_millis(step))
    }

    /// Number of times the clock has been read.
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }
}

impl Clock for TickClock {
    fn elapsed(&self) -> Duration {
        let reads = self.reads.fetch_add(1, Ordering::Relaxed) + 1;
        self.step.saturating_mul(reads.min(u32::MAX as u64) as u32)
    }
}
