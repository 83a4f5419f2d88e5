//! Phase statistics and best-score sampling.

use std::time::Duration;

/// Phase-level statistics.
///
/// Times are read from the solver clock, so they follow a test clock when
/// one is installed.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use coursetable_solver::stats::PhaseStats;
///
/// let mut stats = PhaseStats::new(1, "Hard Constraint Repair", Duration::ZERO);
/// stats.record_step();
/// stats.record_move(true);
/// stats.record_move(false);
/// stats.finish(Duration::from_millis(500));
///
/// assert_eq!(stats.step_count, 1);
/// assert_eq!(stats.moves_evaluated, 2);
/// assert_eq!(stats.moves_accepted, 1);
/// assert_eq!(stats.duration, Duration::from_millis(500));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseStats {
    /// Index of this phase (0-based).
    pub phase_index: usize,
    /// Type name of the phase.
    pub phase_type: &'static str,
    started_at: Duration,
    /// Number of steps taken in this phase.
    pub step_count: u64,
    /// Number of moves applied and judged by the acceptor.
    pub moves_evaluated: u64,
    /// Number of moves kept.
    pub moves_accepted: u64,
    /// Wall time of the phase; zero until [`finish`](Self::finish).
    pub duration: Duration,
}

impl PhaseStats {
    pub fn new(phase_index: usize, phase_type: &'static str, started_at: Duration) -> Self {
        Self {
            phase_index,
            phase_type,
            started_at,
            step_count: 0,
            moves_evaluated: 0,
            moves_accepted: 0,
            duration: Duration::ZERO,
        }
    }

    /// Statistics of a phase that did not run.
    pub fn skipped(phase_index: usize, phase_type: &'static str) -> Self {
        Self::new(phase_index, phase_type, Duration::ZERO)
    }

    pub fn record_step(&mut self) {
        self.step_count += 1;
    }

    /// Records a move evaluation and whether it was accepted.
    pub fn record_move(&mut self, accepted: bool) {
        self.moves_evaluated += 1;
        if accepted {
            self.moves_accepted += 1;
        }
    }

    pub fn finish(&mut self, now: Duration) {
        self.duration = now.saturating_sub(self.started_at);
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration.as_millis() as u64
    }

    /// Steps per second.
    pub fn speed(&self) -> u64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            (self.step_count as f64 / secs) as u64
        } else {
            0
        }
    }

    /// Returns the acceptance rate (accepted / evaluated).
    pub fn acceptance_rate(&self) -> f64 {
        if self.moves_evaluated == 0 {
            0.0
        } else {
            self.moves_accepted as f64 / self.moves_evaluated as f64
        }
    }
}

/// Totals over all phases of a solve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolverStats {
    pub step_count: u64,
    pub moves_evaluated: u64,
    pub moves_accepted: u64,
}

impl SolverStats {
    pub fn absorb(&mut self, phase: &PhaseStats) {
        self.step_count += phase.step_count;
        self.moves_evaluated += phase.moves_evaluated;
        self.moves_accepted += phase.moves_accepted;
    }
}

/// The best score sampled at a fixed period.
///
/// One sample is taken for every full period that has elapsed since the
/// series started, each holding the best score known when it was taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreSeries {
    interval: Duration,
    next_sample: Duration,
    samples: Vec<i64>,
}

impl ScoreSeries {
    pub fn new(interval: Duration, started_at: Duration) -> Self {
        Self {
            interval,
            next_sample: started_at + interval,
            samples: Vec::new(),
        }
    }

    pub fn observe(&mut self, now: Duration, best: i64) {
        if self.interval.is_zero() {
            return;
        }
        while now >= self.next_sample {
            self.samples.push(best);
            self.next_sample += self.interval;
        }
    }

    pub fn samples(&self) -> &[i64] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<i64> {
        self.samples
    }
}
