//! Append-only CSV log of runs.

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Local};
use coursetable_solver::SolveResult;
use csv::WriterBuilder;
use thiserror::Error;

/// Length the two score series are padded to.
pub const SERIES_LEN: usize = 200;

/// Error appending to the run log.
#[derive(Debug, Error)]
pub enum RunLogError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// One run as logged.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    pub timestamp: DateTime<Local>,
    pub instance: String,
    pub construction_time: Duration,
    pub distance_after_construction: usize,
    pub feasibility_time: Duration,
    pub distance: usize,
    pub improvement_time: Duration,
    pub violations: u64,
    pub cost: u64,
    pub feasibility_strategy: String,
    pub improvement_strategy: String,
    pub distance_series: Vec<i64>,
    pub cost_series: Vec<i64>,
}

impl RunRecord {
    /// A record of `result`, timestamped now.
    ///
    /// `violations` and `cost` are the authoritative scores, usually from a
    /// validator.
    pub fn new(instance: impl Into<String>, result: &SolveResult, violations: u64, cost: u64) -> Self {
        Self {
            timestamp: Local::now(),
            instance: instance.into(),
            construction_time: result.construction.duration,
            distance_after_construction: result.distance_after_construction,
            feasibility_time: result.feasibility.duration,
            distance: result.distance,
            improvement_time: result.improvement.duration,
            violations,
            cost,
            feasibility_strategy: result.feasibility_strategy.to_string(),
            improvement_strategy: result.improvement_strategy.to_string(),
            distance_series: result.distance_series.clone(),
            cost_series: result.cost_series.clone(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// The CSV fields, series padded with zeros to [`SERIES_LEN`].
    pub fn fields(&self) -> Vec<String> {
        let mut fields = vec![
            self.timestamp.format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
            self.instance.clone(),
            self.construction_time.as_secs_f64().to_string(),
            self.distance_after_construction.to_string(),
            self.feasibility_time.as_secs_f64().to_string(),
            self.distance.to_string(),
            self.improvement_time.as_secs_f64().to_string(),
            self.violations.to_string(),
            self.cost.to_string(),
            self.feasibility_strategy.clone(),
            self.improvement_strategy.clone(),
        ];
        fields.push("distance:".to_string());
        fields.extend(padded(&self.distance_series));
        fields.push("penalty:".to_string());
        fields.extend(padded(&self.cost_series));
        fields
    }
}

fn padded(series: &[i64]) -> impl Iterator<Item = String> + '_ {
    let padding = SERIES_LEN.saturating_sub(series.len());
    series
        .iter()
        .map(|v| v.to_string())
        .chain(std::iter::repeat("0".to_string()).take(padding))
}

/// A CSV file that runs are appended to.
#[derive(Debug, Clone)]
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `record` as one line, creating the file if needed.
    pub fn append(&self, record: &RunRecord) -> Result<(), RunLogError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_writer(file);
        writer.write_record(record.fields())?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record() -> RunRecord {
        RunRecord {
            timestamp: Local.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
            instance: "comp01".to_string(),
            construction_time: Duration::from_millis(1500),
            distance_after_construction: 4,
            feasibility_time: Duration::from_secs(2),
            distance: 0,
            improvement_time: Duration::from_secs(30),
            violations: 0,
            cost: 120,
            feasibility_strategy: "SA".to_string(),
            improvement_strategy: "TS".to_string(),
            distance_series: vec![4, 2, 0],
            cost_series: vec![200, 150],
        }
    }

    #[test]
    fn test_fields_are_padded_series() {
        let fields = record().fields();

        assert_eq!(fields.len(), 11 + 2 + 2 * SERIES_LEN);
        assert_eq!(fields[0], "2024-03-01 09:30:00.000000");
        assert_eq!(&fields[1..11], &[
            "comp01", "1.5", "4", "2", "0", "30", "0", "120", "SA", "TS"
        ]);
        assert_eq!(fields[11], "distance:");
        assert_eq!(&fields[12..15], &["4", "2", "0"]);
        assert_eq!(fields[15], "0");
        assert_eq!(fields[12 + SERIES_LEN], "penalty:");
        assert_eq!(fields[13 + SERIES_LEN], "200");
    }

    #[test]
    fn test_append_adds_one_line_per_run() {
        let dir = tempfile::tempdir().unwrap();
        let log = RunLog::new(dir.path().join("runs.csv"));

        log.append(&record()).unwrap();
        log.append(&record()).unwrap();

        let text = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("2024-03-01 09:30:00.000000,comp01,1.5,4,"));
        assert_eq!(lines[0].split(',').count(), 11 + 2 + 2 * SERIES_LEN);
    }
}
