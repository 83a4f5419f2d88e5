//! Simulated annealing acceptor.

use rand::rngs::StdRng;
use rand::Rng;

use super::Acceptor;

/// Accepts worsening moves with probability `exp(-delta / T)`.
///
/// The temperature follows an exponential schedule from the starting to
/// the minimum temperature over `cooling_steps` steps:
/// `T = T_max * exp(-ln(T_max / T_min) * step / cooling_steps)`. The step
/// counter stops once `T_min` is reached and is reset to 0, reheating the
/// search, after more than `reheat_after` consecutive unsuccessful steps.
///
/// # Example
///
/// ```
/// use coursetable_solver::acceptor::{Acceptor, SimulatedAnnealingAcceptor};
///
/// let mut acceptor = SimulatedAnnealingAcceptor::new(5.0, 1.3, 5, 10);
/// acceptor.phase_started();
/// acceptor.step_started();
/// assert_eq!(acceptor.temperature(), 5.0);
/// ```
#[derive(Debug, Clone)]
pub struct SimulatedAnnealingAcceptor {
    starting_temperature: f64,
    minimum_temperature: f64,
    cooling_steps: u64,
    reheat_after: u64,
    step: u64,
    failures: u64,
    temperature: f64,
}

impl SimulatedAnnealingAcceptor {
    pub fn new(
        starting_temperature: f64,
        minimum_temperature: f64,
        cooling_steps: u64,
        reheat_after: u64,
    ) -> Self {
        Self {
            starting_temperature,
            minimum_temperature,
            cooling_steps: cooling_steps.max(1),
            reheat_after,
            step: 0,
            failures: 0,
            temperature: starting_temperature,
        }
    }

    /// Temperature of the current step.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Position on the cooling schedule.
    pub fn cooling_step(&self) -> u64 {
        self.step
    }
}

impl Default for SimulatedAnnealingAcceptor {
    fn default() -> Self {
        Self::new(5.0, 1.3, 5, 10)
    }
}

impl Acceptor for SimulatedAnnealingAcceptor {
    fn name(&self) -> &'static str {
        "SA"
    }

    fn is_accepted(&mut self, delta: i64, rng: &mut StdRng) -> bool {
        if delta <= 0 {
            return true;
        }
        if self.temperature <= 0.0 {
            return false;
        }
        let probability = (-(delta as f64) / self.temperature).exp();
        rng.random::<f64>() <= probability
    }

    fn phase_started(&mut self) {
        self.step = 0;
        self.failures = 0;
        self.temperature = self.starting_temperature;
    }

    fn step_started(&mut self) {
        if self.failures > self.reheat_after {
            self.step = 0;
        }
        let factor = -(self.starting_temperature / self.minimum_temperature).ln();
        self.temperature = self.starting_temperature
            * (factor * self.step as f64 / self.cooling_steps as f64).exp();
        if self.temperature > self.minimum_temperature {
            self.step += 1;
        }
    }

    fn step_ended(&mut self, accepted: bool) {
        if accepted {
            self.failures = 0;
        } else {
            self.failures += 1;
        }
    }
}
