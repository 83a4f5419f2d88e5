//! Running an external solution validator.
//!
//! The validator is invoked as `<program> <formulation> <instance>
//! <solution>` and prints a report whose last line holds either the total
//! cost alone (no violations) or the violation count followed by the
//! total cost.

use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::debug;

use crate::output::FORMULATION;

/// Error obtaining a validation report.
#[derive(Debug, Error)]
pub enum ValidatorError {
    #[error("failed to start validator '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("validator exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("validator printed no report")]
    EmptyReport,

    #[error("cannot read scores from validator line '{0}'")]
    Unparseable(String),
}

/// The scores a validator reported, with its full output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub violations: u64,
    pub cost: u64,
    pub lines: Vec<String>,
}

/// Reads the scores from a validator's output.
///
/// Thousands separators are dropped from the last line; the numbers are
/// its whitespace-separated tokens made of digits only.
///
/// ```
/// use coursetable::validator::parse_report;
///
/// let report = parse_report("Violations of Conflicts (hard) : 0\nTotal Cost = 1,234\n").unwrap();
/// assert_eq!((report.violations, report.cost), (0, 1234));
///
/// let report = parse_report("Summary: Violations = 3, Total Cost = 60\n").unwrap();
/// assert_eq!((report.violations, report.cost), (3, 60));
/// ```
pub fn parse_report(output: &str) -> Result<ValidationReport, ValidatorError> {
    let lines: Vec<String> = output.lines().map(str::to_string).collect();
    let last = lines
        .iter()
        .rev()
        .find(|l| !l.trim().is_empty())
        .ok_or(ValidatorError::EmptyReport)?;

    let stripped = last.replace(',', "");
    let numbers: Vec<u64> = stripped
        .split_whitespace()
        .filter(|token| token.bytes().all(|b| b.is_ascii_digit()))
        .filter_map(|token| token.parse().ok())
        .collect();
    let (violations, cost) = match numbers.as_slice() {
        [cost] => (0, *cost),
        [violations, cost] => (*violations, *cost),
        _ => return Err(ValidatorError::Unparseable(last.clone())),
    };
    Ok(ValidationReport {
        violations,
        cost,
        lines,
    })
}

/// An external validator program.
#[derive(Debug, Clone)]
pub struct Validator {
    program: OsString,
    formulation: String,
}

impl Validator {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            formulation: FORMULATION.to_string(),
        }
    }

    pub fn with_formulation(mut self, formulation: impl Into<String>) -> Self {
        self.formulation = formulation.into();
        self
    }

    /// Validates `solution` against `instance` and parses the report.
    pub fn validate(
        &self,
        instance: impl AsRef<Path>,
        solution: impl AsRef<Path>,
    ) -> Result<ValidationReport, ValidatorError> {
        let program = self.program.to_string_lossy().into_owned();
        debug!(event = "validate", program = %program, formulation = %self.formulation);

        let output = Command::new(&self.program)
            .arg(&self.formulation)
            .arg(instance.as_ref())
            .arg(solution.as_ref())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| ValidatorError::Spawn { program, source })?;

        if !output.status.success() {
            return Err(ValidatorError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        parse_report(&String::from_utf8_lossy(&output.stdout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_number_means_no_violations() {
        let report = parse_report("Cost of RoomCapacity (soft) : 12\n\nTotal Cost = 12\n").unwrap();

        assert_eq!(report.violations, 0);
        assert_eq!(report.cost, 12);
        assert_eq!(report.lines.len(), 3);
    }

    #[test]
    fn test_two_numbers_are_violations_then_cost() {
        let report = parse_report("Violations = 2, Total Cost = 1,024").unwrap();

        assert_eq!(report.violations, 2);
        assert_eq!(report.cost, 1024);
    }

    #[test]
    fn test_unreadable_last_line() {
        assert!(matches!(
            parse_report("Total Cost = unknown"),
            Err(ValidatorError::Unparseable(_))
        ));
        assert!(matches!(
            parse_report("1 2 3"),
            Err(ValidatorError::Unparseable(_))
        ));
        assert!(matches!(parse_report("\n\n"), Err(ValidatorError::EmptyReport)));
    }

    #[test]
    fn test_missing_program_is_a_spawn_error() {
        let validator = Validator::new("coursetable-no-such-validator");

        let err = validator.validate("a.ectt", "a.sol").unwrap_err();

        assert!(matches!(err, ValidatorError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_runs_program_with_formulation_and_paths() {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("validator.sh");
        fs::write(&script, "#!/bin/sh\necho \"args: $1 $2 $3\"\necho \"Total Cost = 77\"\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let report = Validator::new(&script).validate("toy.ectt", "toy.sol").unwrap();

        assert_eq!(report.cost, 77);
        assert_eq!(report.lines[0], "args: UD2 toy.ectt toy.sol");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_is_surfaced() {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("validator.sh");
        fs::write(&script, "#!/bin/sh\necho 'no such file' >&2\nexit 3\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let err = Validator::new(&script).validate("x", "y").unwrap_err();

        match err {
            ValidatorError::Failed { stderr, .. } => assert_eq!(stderr, "no such file"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
