//! Configuration system for coursetable.
//!
//! Load solver configuration from TOML or YAML files to choose the search
//! strategy of each phase, tune the acceptors and set time budgets
//! without code changes.
//!
//! # Examples
//!
//! ```
//! use coursetable_config::{AcceptorConfig, SolverConfig};
//! use std::time::Duration;
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     random_seed = 7
//!
//!     [termination]
//!     seconds_spent_limit = 30
//!
//!     [feasibility.acceptor]
//!     type = "simulated_annealing"
//!     starting_temperature = 4.0
//!
//!     [improvement.acceptor]
//!     type = "tabu_search"
//!     tabu_length = 100
//! "#).unwrap();
//!
//! assert_eq!(config.time_limit(), Duration::from_secs(30));
//! assert!(matches!(config.feasibility.acceptor, AcceptorConfig::SimulatedAnnealing(_)));
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use coursetable_config::SolverConfig;
//!
//! let config = SolverConfig::load("coursetable.toml").unwrap_or_default();
//! assert_eq!(config.construction.passes, 5);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use coursetable_core::PenaltyWeights;

/// Overall budget used when no termination limit is configured.
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(200);

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main solver configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SolverConfig {
    /// Environment mode affecting reproducibility and assertions.
    pub environment_mode: EnvironmentMode,

    /// Random seed for reproducible results.
    pub random_seed: Option<u64>,

    /// Overall wall-clock budget.
    pub termination: TerminationConfig,

    /// Construction heuristic settings.
    pub construction: ConstructionConfig,

    /// Hard-constraint repair phase.
    pub feasibility: SearchPhaseConfig,

    /// Soft-constraint improvement phase.
    pub improvement: SearchPhaseConfig,

    /// Soft-constraint penalty weights.
    pub weights: PenaltyWeights,

    /// Recompute only the courses touched by a move.
    pub incremental_scoring: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            environment_mode: EnvironmentMode::default(),
            random_seed: None,
            termination: TerminationConfig::default(),
            construction: ConstructionConfig::default(),
            feasibility: SearchPhaseConfig::default(),
            improvement: SearchPhaseConfig::default(),
            weights: PenaltyWeights::default(),
            incremental_scoring: true,
        }
    }
}

impl SolverConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file.
    ///
    /// Files ending in `.yaml` or `.yml` are read as YAML, anything else as
    /// TOML.
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist, fails to parse or holds
    /// invalid values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the overall time limit in seconds.
    pub fn with_termination_seconds(mut self, seconds: u64) -> Self {
        self.termination = TerminationConfig {
            seconds_spent_limit: Some(seconds),
            ..TerminationConfig::default()
        };
        self
    }

    /// Sets the overall time limit in milliseconds.
    pub fn with_termination_millis(mut self, millis: u64) -> Self {
        self.termination = TerminationConfig {
            millis_spent_limit: Some(millis),
            ..TerminationConfig::default()
        };
        self
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn with_environment_mode(mut self, mode: EnvironmentMode) -> Self {
        self.environment_mode = mode;
        self
    }

    pub fn with_construction_passes(mut self, passes: usize) -> Self {
        self.construction.passes = passes;
        self
    }

    pub fn with_feasibility_acceptor(mut self, acceptor: AcceptorConfig) -> Self {
        self.feasibility.acceptor = acceptor;
        self
    }

    pub fn with_improvement_acceptor(mut self, acceptor: AcceptorConfig) -> Self {
        self.improvement.acceptor = acceptor;
        self
    }

    /// Turns a search phase on or off.
    pub fn with_phase_enabled(mut self, phase: SearchPhase, enabled: bool) -> Self {
        match phase {
            SearchPhase::Feasibility => self.feasibility.enabled = enabled,
            SearchPhase::Improvement => self.improvement.enabled = enabled,
        }
        self
    }

    pub fn with_weights(mut self, weights: PenaltyWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_incremental_scoring(mut self, incremental: bool) -> Self {
        self.incremental_scoring = incremental;
        self
    }

    /// Returns the overall time limit, falling back to
    /// [`DEFAULT_TIME_LIMIT`] when none is configured.
    ///
    /// # Examples
    ///
    /// ```
    /// use coursetable_config::SolverConfig;
    /// use std::time::Duration;
    ///
    /// let config = SolverConfig::from_toml_str(r#"
    ///     [termination]
    ///     minutes_spent_limit = 1
    ///     seconds_spent_limit = 30
    /// "#).unwrap();
    ///
    /// assert_eq!(config.time_limit(), Duration::from_secs(90));
    /// assert_eq!(SolverConfig::default().time_limit(), Duration::from_secs(200));
    /// ```
    pub fn time_limit(&self) -> Duration {
        self.termination.time_limit().unwrap_or(DEFAULT_TIME_LIMIT)
    }

    /// Seed for the solver's random generator; `None` means OS entropy.
    pub fn seed(&self) -> Option<u64> {
        match (self.random_seed, self.environment_mode) {
            (Some(seed), _) => Some(seed),
            (None, EnvironmentMode::NonReproducible) => None,
            (None, _) => Some(0),
        }
    }

    pub fn phase(&self, phase: SearchPhase) -> &SearchPhaseConfig {
        match phase {
            SearchPhase::Feasibility => &self.feasibility,
            SearchPhase::Improvement => &self.improvement,
        }
    }

    /// Budget of a search phase; 60 s for repair and 30 s for improvement
    /// unless configured.
    pub fn phase_time_limit(&self, phase: SearchPhase) -> Duration {
        self.phase(phase)
            .seconds_spent_limit
            .map(Duration::from_secs)
            .unwrap_or_else(|| phase.default_time_limit())
    }

    /// Sampling period of the best score series of a search phase.
    pub fn sample_interval(&self, phase: SearchPhase) -> Duration {
        self.phase(phase)
            .sample_interval_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| phase.default_sample_interval())
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.construction.passes == 0 {
            return Err(ConfigError::Invalid(
                "construction.passes must be at least 1".to_string(),
            ));
        }
        self.feasibility.validate(SearchPhase::Feasibility)?;
        self.improvement.validate(SearchPhase::Improvement)?;
        let weights = &self.weights;
        if [
            weights.room_capacity,
            weights.min_working_days,
            weights.isolated_lectures,
            weights.room_stability,
        ]
        .iter()
        .any(|w| *w < 0)
        {
            return Err(ConfigError::Invalid(
                "penalty weights must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Environment mode affecting solver behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentMode {
    /// Non-reproducible mode with minimal overhead.
    #[default]
    NonReproducible,

    /// Reproducible mode; seeds with 0 unless `random_seed` is set.
    Reproducible,

    /// Checks grid consistency at the end of every phase.
    FastAssert,

    /// Checks grid consistency after every move.
    FullAssert,
}

impl EnvironmentMode {
    pub fn asserts_phases(self) -> bool {
        matches!(self, Self::FastAssert | Self::FullAssert)
    }

    pub fn asserts_moves(self) -> bool {
        self == Self::FullAssert
    }
}

/// Termination configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct TerminationConfig {
    /// Maximum seconds to spend solving.
    pub seconds_spent_limit: Option<u64>,

    /// Maximum minutes to spend solving.
    pub minutes_spent_limit: Option<u64>,

    /// Maximum milliseconds to spend solving.
    pub millis_spent_limit: Option<u64>,
}

impl TerminationConfig {
    /// Returns the time limit as a Duration, if any.
    ///
    /// The parts add up saturating, so huge limits mean "no practical limit".
    pub fn time_limit(&self) -> Option<Duration> {
        let limit = Duration::from_millis(self.millis_spent_limit.unwrap_or(0))
            .saturating_add(Duration::from_secs(self.seconds_spent_limit.unwrap_or(0)))
            .saturating_add(Duration::from_secs(
                self.minutes_spent_limit.unwrap_or(0).saturating_mul(60),
            ));
        if limit.is_zero() {
            None
        } else {
            Some(limit)
        }
    }
}

/// Construction heuristic configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ConstructionConfig {
    /// Rank-and-place passes before handing leftovers to the repair phase.
    pub passes: usize,

    /// Optional cap on construction time; the overall budget always applies.
    pub seconds_spent_limit: Option<u64>,
}

impl Default for ConstructionConfig {
    fn default() -> Self {
        Self {
            passes: 5,
            seconds_spent_limit: None,
        }
    }
}

impl ConstructionConfig {
    pub fn time_limit(&self) -> Option<Duration> {
        self.seconds_spent_limit.map(Duration::from_secs)
    }
}

/// The two local search phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchPhase {
    /// Hard-constraint repair.
    Feasibility,
    /// Soft-constraint improvement.
    Improvement,
}

impl SearchPhase {
    pub fn name(self) -> &'static str {
        match self {
            Self::Feasibility => "feasibility",
            Self::Improvement => "improvement",
        }
    }

    /// Phase budget when none is configured.
    pub fn default_time_limit(self) -> Duration {
        match self {
            Self::Feasibility => Duration::from_secs(60),
            Self::Improvement => Duration::from_secs(30),
        }
    }

    /// Best-score sampling period when none is configured.
    pub fn default_sample_interval(self) -> Duration {
        match self {
            Self::Feasibility => Duration::from_secs(5),
            Self::Improvement => Duration::from_secs(10),
        }
    }
}

/// Settings for one of the two local search phases.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SearchPhaseConfig {
    /// Whether the phase runs at all.
    pub enabled: bool,

    /// Phase budget; the overall budget always applies as well.
    pub seconds_spent_limit: Option<u64>,

    /// Seconds between two samples of the best score series.
    pub sample_interval_secs: Option<u64>,

    /// Acceptance strategy.
    pub acceptor: AcceptorConfig,
}

impl Default for SearchPhaseConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            seconds_spent_limit: None,
            sample_interval_secs: None,
            acceptor: AcceptorConfig::default(),
        }
    }
}

impl SearchPhaseConfig {
    fn validate(&self, phase: SearchPhase) -> Result<(), ConfigError> {
        if self.sample_interval_secs == Some(0) {
            return Err(ConfigError::Invalid(format!(
                "{}.sample_interval_secs must be at least 1",
                phase.name()
            )));
        }
        self.acceptor
            .validate()
            .map_err(|msg| ConfigError::Invalid(format!("{}.acceptor: {msg}", phase.name())))
    }
}

/// Acceptor configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AcceptorConfig {
    /// Simulated annealing acceptor.
    SimulatedAnnealing(SimulatedAnnealingConfig),

    /// Tabu search acceptor.
    TabuSearch(TabuSearchConfig),
}

impl Default for AcceptorConfig {
    fn default() -> Self {
        Self::TabuSearch(TabuSearchConfig::default())
    }
}

impl AcceptorConfig {
    /// Short label used in run logs.
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::SimulatedAnnealing(_) => "SA",
            Self::TabuSearch(_) => "TS",
        }
    }

    fn validate(&self) -> Result<(), String> {
        match self {
            Self::SimulatedAnnealing(sa) => {
                if !(sa.minimum_temperature > 0.0) {
                    return Err("minimum_temperature must be positive".to_string());
                }
                if !(sa.starting_temperature > sa.minimum_temperature) {
                    return Err(
                        "starting_temperature must exceed minimum_temperature".to_string()
                    );
                }
                if sa.cooling_steps == 0 {
                    return Err("cooling_steps must be at least 1".to_string());
                }
                Ok(())
            }
            Self::TabuSearch(ts) => {
                if ts.tabu_length == 0 {
                    return Err("tabu_length must be at least 1".to_string());
                }
                Ok(())
            }
        }
    }
}

/// Simulated annealing configuration.
///
/// The temperature falls exponentially from `starting_temperature` to
/// `minimum_temperature` over `cooling_steps` steps and is reset to the
/// start after `reheat_after` consecutive rejected moves.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SimulatedAnnealingConfig {
    pub starting_temperature: f64,
    pub minimum_temperature: f64,
    pub cooling_steps: u64,
    pub reheat_after: u64,
}

impl Default for SimulatedAnnealingConfig {
    fn default() -> Self {
        Self {
            starting_temperature: 5.0,
            minimum_temperature: 1.3,
            cooling_steps: 5,
            reheat_after: 10,
        }
    }
}

/// Tabu search configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct TabuSearchConfig {
    /// Capacity of each tabu list.
    pub tabu_length: usize,
}

impl Default for TabuSearchConfig {
    fn default() -> Self {
        Self { tabu_length: 300 }
    }
}

#[cfg(test)]
mod tests;
