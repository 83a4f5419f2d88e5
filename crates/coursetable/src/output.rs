//! Solution files.
//!
//! A solution lists one occupied position per line as
//! `<CourseID> <RoomID> <Day> <Period>`, rooms first, then timeslots.

use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use coursetable_core::{Instance, Timetable};
use thiserror::Error;
use tracing::info;

/// Formulation tag of the scored constraints.
pub const FORMULATION: &str = "UD2";

/// Error writing or reading solution and summary files.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("{path}: line {line} is not a number")]
    MalformedSummary { path: PathBuf, line: usize },
}

/// Renders the solution lines of `timetable`.
pub fn format_solution(instance: &Instance, timetable: &Timetable) -> String {
    let mut out = String::new();
    for (position, event) in timetable.occupied() {
        let _ = writeln!(
            out,
            "{} {} {} {}",
            instance.course(event.course).name,
            instance.room(position.room).name,
            instance.day_of(position.timeslot),
            instance.period_of(position.timeslot),
        );
    }
    out
}

/// Writes the solution of `timetable` to `writer`.
pub fn write_solution<W: Write>(
    instance: &Instance,
    timetable: &Timetable,
    mut writer: W,
) -> Result<(), OutputError> {
    writer.write_all(format_solution(instance, timetable).as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Writes the solution of `timetable` to a file, replacing it.
pub fn write_solution_file(
    instance: &Instance,
    timetable: &Timetable,
    path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let file = File::create(path)?;
    write_solution(instance, timetable, BufWriter::new(file))
}

/// Scores and timings of a run, stored next to its solution.
///
/// The file starts with three lines (distance, violations, cost) so that
/// the stored best can be compared without parsing the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub distance: usize,
    pub violations: u64,
    pub cost: u64,
    /// Validator report, if one ran.
    pub report: Vec<String>,
    pub construction_time: Duration,
    pub feasibility_time: Duration,
    pub improvement_time: Duration,
}

impl RunSummary {
    /// Lexicographic comparison on (distance, violations, cost).
    pub fn is_better_than(&self, other: &RunSummary) -> bool {
        (self.distance, self.violations, self.cost)
            < (other.distance, other.violations, other.cost)
    }

    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writeln!(writer, "{}", self.distance)?;
        writeln!(writer, "{}", self.violations)?;
        writeln!(writer, "{}", self.cost)?;
        for line in &self.report {
            writeln!(writer, "{line}")?;
        }
        writeln!(
            writer,
            "Construction time in seconds: {}",
            self.construction_time.as_secs_f64()
        )?;
        writeln!(
            writer,
            "Reaching feasibility time in seconds: {}",
            self.feasibility_time.as_secs_f64()
        )?;
        writeln!(
            writer,
            "Improvement time in seconds: {}",
            self.improvement_time.as_secs_f64()
        )?;
        writer.flush()
    }

    pub fn write_file(&self, path: impl AsRef<Path>) -> Result<(), OutputError> {
        let file = File::create(path)?;
        self.write(BufWriter::new(file))?;
        Ok(())
    }

    /// Reads the three scores of a stored summary; the rest is ignored.
    pub fn read_scores(path: impl AsRef<Path>) -> Result<RunSummary, OutputError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let mut lines = text.lines();
        let mut next = |line: usize| -> Result<u64, OutputError> {
            lines
                .next()
                .and_then(|s| s.trim().parse().ok())
                .ok_or_else(|| OutputError::MalformedSummary {
                    path: path.to_path_buf(),
                    line,
                })
        };
        let distance = next(1)? as usize;
        let violations = next(2)?;
        let cost = next(3)?;
        Ok(RunSummary {
            distance,
            violations,
            cost,
            ..RunSummary::default()
        })
    }
}

/// What [`SolutionStore::record`] did with the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    /// No best existed; this run is it.
    FirstRun,
    /// The run beat the stored best and replaced it.
    NewBest,
    /// The stored best stays; this run remains in the "last" files.
    Kept,
}

/// Keeps the best solution per instance in a directory.
///
/// The first run of an instance writes the best files directly. Later runs
/// write the "last" files and replace the best ones only when their
/// summary is better.
#[derive(Debug, Clone)]
pub struct SolutionStore {
    dir: PathBuf,
    name: String,
    first_run: bool,
}

impl SolutionStore {
    /// Opens the store for instance `name`, creating `dir` if needed.
    pub fn open(dir: impl Into<PathBuf>, name: impl Into<String>) -> Result<Self, OutputError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        let name = name.into();
        let first_run = !dir.join(format!("{name}.{FORMULATION}")).exists();
        Ok(Self {
            dir,
            name,
            first_run,
        })
    }

    pub fn is_first_run(&self) -> bool {
        self.first_run
    }

    pub fn best_solution_path(&self) -> PathBuf {
        self.dir.join(format!("{}.{FORMULATION}", self.name))
    }

    pub fn best_summary_path(&self) -> PathBuf {
        self.dir.join(format!("{}-{FORMULATION}.txt", self.name))
    }

    pub fn last_solution_path(&self) -> PathBuf {
        self.dir.join(format!("{}-last.{FORMULATION}", self.name))
    }

    pub fn last_summary_path(&self) -> PathBuf {
        self.dir.join(format!("{}-last-{FORMULATION}.txt", self.name))
    }

    /// Where this run's solution goes.
    pub fn solution_path(&self) -> PathBuf {
        if self.first_run {
            self.best_solution_path()
        } else {
            self.last_solution_path()
        }
    }

    fn summary_path(&self) -> PathBuf {
        if self.first_run {
            self.best_summary_path()
        } else {
            self.last_summary_path()
        }
    }

    /// Writes this run's solution and returns its path.
    pub fn write_solution(
        &self,
        instance: &Instance,
        timetable: &Timetable,
    ) -> Result<PathBuf, OutputError> {
        let path = self.solution_path();
        write_solution_file(instance, timetable, &path)?;
        Ok(path)
    }

    /// Writes this run's summary and promotes the run if it beats the best.
    ///
    /// A best solution without a summary counts as no best at all.
    pub fn record(&self, summary: &RunSummary) -> Result<StoreOutcome, OutputError> {
        summary.write_file(self.summary_path())?;
        if self.first_run {
            return Ok(StoreOutcome::FirstRun);
        }

        let best = match RunSummary::read_scores(self.best_summary_path()) {
            Ok(best) => Some(best),
            Err(OutputError::Io(err)) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => return Err(err),
        };
        if best.map_or(false, |best| !summary.is_better_than(&best)) {
            return Ok(StoreOutcome::Kept);
        }
        fs::rename(self.last_solution_path(), self.best_solution_path())?;
        fs::rename(self.last_summary_path(), self.best_summary_path())?;
        info!(
            event = "new_best_run",
            instance = %self.name,
            distance = summary.distance,
            cost = summary.cost,
        );
        Ok(StoreOutcome::NewBest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursetable_core::{EventId, Position};
    use coursetable_test::fixtures;

    fn summary(distance: usize, violations: u64, cost: u64) -> RunSummary {
        RunSummary {
            distance,
            violations,
            cost,
            ..RunSummary::default()
        }
    }

    #[test]
    fn test_solution_lines_use_names_and_day_period() {
        let instance = fixtures::toy();
        let mut grid = Timetable::for_instance(&instance);
        grid.assign(instance.event(EventId(6)), Position::new(2, 6))
            .unwrap();
        grid.assign(instance.event(EventId(0)), Position::new(0, 13))
            .unwrap();

        let text = format_solution(&instance, &grid);

        assert_eq!(text, "SceCosC rA 3 1\nTecCos rC 1 2\n");
    }

    #[test]
    fn test_empty_timetable_writes_nothing() {
        let instance = fixtures::toy();
        let grid = Timetable::for_instance(&instance);
        let mut out = Vec::new();

        write_solution(&instance, &grid, &mut out).unwrap();

        assert!(out.is_empty());
    }

    #[test]
    fn test_better_run_compares_distance_then_violations_then_cost() {
        assert!(summary(0, 5, 900).is_better_than(&summary(1, 0, 0)));
        assert!(summary(1, 0, 900).is_better_than(&summary(1, 1, 0)));
        assert!(summary(1, 1, 10).is_better_than(&summary(1, 1, 11)));
        assert!(!summary(1, 1, 11).is_better_than(&summary(1, 1, 11)));
        assert!(!summary(2, 0, 0).is_better_than(&summary(1, 9, 99)));
    }

    #[test]
    fn test_summary_scores_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.txt");
        let written = RunSummary {
            report: vec!["Violations of Conflicts (hard) : 0".to_string()],
            construction_time: Duration::from_millis(250),
            ..summary(2, 1, 340)
        };

        written.write_file(&path).unwrap();
        let read = RunSummary::read_scores(&path).unwrap();

        assert_eq!(read, summary(2, 1, 340));
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("Construction time in seconds: 0.25"));
    }

    #[test]
    fn test_malformed_summary_names_the_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        fs::write(&path, "0\nmany\n3\n").unwrap();

        let err = RunSummary::read_scores(&path).unwrap_err();

        assert!(matches!(err, OutputError::MalformedSummary { line: 2, .. }));
    }

    #[test]
    fn test_store_promotes_only_better_runs() {
        let dir = tempfile::tempdir().unwrap();
        let instance = fixtures::toy();
        let grid = fixtures::toy_feasible_timetable(&instance);

        let first = SolutionStore::open(dir.path(), "Toy").unwrap();
        assert!(first.is_first_run());
        let path = first.write_solution(&instance, &grid).unwrap();
        assert_eq!(path, dir.path().join("Toy.UD2"));
        assert_eq!(first.record(&summary(0, 0, 50)).unwrap(), StoreOutcome::FirstRun);

        let worse = SolutionStore::open(dir.path(), "Toy").unwrap();
        assert!(!worse.is_first_run());
        worse.write_solution(&instance, &grid).unwrap();
        assert_eq!(worse.record(&summary(0, 0, 60)).unwrap(), StoreOutcome::Kept);
        assert!(worse.last_solution_path().exists());

        let better = SolutionStore::open(dir.path(), "Toy").unwrap();
        better.write_solution(&instance, &grid).unwrap();
        assert_eq!(better.record(&summary(0, 0, 40)).unwrap(), StoreOutcome::NewBest);
        assert!(!better.last_solution_path().exists());
        let best = RunSummary::read_scores(better.best_summary_path()).unwrap();
        assert_eq!(best.cost, 40);
    }

    #[test]
    fn test_best_without_summary_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let instance = fixtures::toy();
        let grid = fixtures::toy_feasible_timetable(&instance);

        let first = SolutionStore::open(dir.path(), "Toy").unwrap();
        first.write_solution(&instance, &grid).unwrap();
        first.record(&summary(0, 0, 50)).unwrap();
        fs::remove_file(first.best_summary_path()).unwrap();

        let next = SolutionStore::open(dir.path(), "Toy").unwrap();
        assert!(!next.is_first_run());
        next.write_solution(&instance, &grid).unwrap();
        assert_eq!(next.record(&summary(0, 0, 70)).unwrap(), StoreOutcome::NewBest);

        assert!(!next.last_solution_path().exists());
        let best = RunSummary::read_scores(next.best_summary_path()).unwrap();
        assert_eq!(best.cost, 70);
    }
}
