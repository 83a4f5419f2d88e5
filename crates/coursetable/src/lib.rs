//! Coursetable - curriculum-based course timetabling
//!
//! Re-exports the model, scoring, configuration and solver crates, and
//! adds what a run needs around the solver:
//! - [`output`]: the solution file and the best/last solution store
//! - [`validator`]: running an external validator on a solution
//! - [`run_log`]: one CSV record per run
//! - [`display`]: a text grid of a timetable
//! - `console`: colored tracing output (feature `console`)
//!
//! # Example
//!
//! ```
//! use coursetable::prelude::*;
//!
//! let instance = Instance::builder("single", 1, 1)
//!     .course("c1", "t1", 1, 1, 10, false)
//!     .room("r1", 20, 0)
//!     .build()
//!     .unwrap();
//! let config = SolverConfig::new().with_random_seed(1).with_termination_seconds(1);
//!
//! let result = Solver::new(config).solve(&instance).unwrap();
//! assert_eq!(format_solution(&instance, &result.timetable), "c1 r1 0 0\n");
//! ```

#[cfg(feature = "console")]
pub mod console;
pub mod display;
pub mod output;
pub mod run_log;
pub mod validator;

pub use coursetable_config as config;
pub use coursetable_core as model;
pub use coursetable_scoring as scoring;
pub use coursetable_solver as solver;

pub use display::TimetableDisplay;
pub use output::{
    format_solution, write_solution, write_solution_file, OutputError, RunSummary, SolutionStore,
    StoreOutcome,
};
pub use run_log::{RunLog, RunLogError, RunRecord};
pub use validator::{parse_report, ValidationReport, Validator, ValidatorError};

pub mod prelude {
    pub use coursetable_config::{AcceptorConfig, EnvironmentMode, SearchPhase, SolverConfig};
    pub use coursetable_core::{read_instance, Instance, Position, Timetable};
    pub use coursetable_scoring::CostBreakdown;
    pub use coursetable_solver::{SolveResult, Solver, SolverError};

    pub use crate::output::{format_solution, write_solution};
    pub use crate::validator::{ValidationReport, Validator};
}
