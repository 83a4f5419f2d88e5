use coursetable::config::ConfigError;
use coursetable::model::ParseError;
use coursetable::solver::SolverError;
use coursetable::{OutputError, RunLogError, ValidatorError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read instance: {0}")]
    Instance(#[from] ParseError),

    #[error("cannot load configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error("cannot write solution: {0}")]
    Output(#[from] OutputError),

    #[error(transparent)]
    Validator(#[from] ValidatorError),

    #[error("cannot append run log: {0}")]
    RunLog(#[from] RunLogError),

    #[error("{0}")]
    Usage(&'static str),
}

pub type Result<T> = std::result::Result<T, CliError>;
