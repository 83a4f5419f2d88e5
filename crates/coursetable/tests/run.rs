//! A full run: parse, solve, store, log.

use std::fs;
use std::sync::Arc;

use coursetable::prelude::*;
use coursetable::solver::TickClock;
use coursetable::{RunLog, RunRecord, RunSummary, SolutionStore, StoreOutcome};
use coursetable_test::fixtures;

fn solve_toy(instance: &Instance) -> SolveResult {
    let config = SolverConfig::new()
        .with_random_seed(5)
        .with_termination_millis(1_000);
    Solver::new(config)
        .with_clock(Arc::new(TickClock::millis(1)))
        .solve(instance)
        .unwrap()
}

#[test]
fn test_parsed_instance_solves_to_readable_solution() {
    let dir = tempfile::tempdir().unwrap();
    let instance_path = dir.path().join("toy.ectt");
    fs::write(&instance_path, fixtures::TOY_ECTT).unwrap();
    let instance = read_instance(&instance_path).unwrap();

    let result = solve_toy(&instance);
    let text = format_solution(&instance, &result.timetable);

    assert!(result.is_feasible());
    assert_eq!(text.lines().count(), instance.event_count());
    for line in text.lines() {
        let fields: Vec<&str> = line.split(' ').collect();
        assert_eq!(fields.len(), 4);
        assert!(instance.course_by_name(fields[0]).is_some());
        assert!(instance.room_by_name(fields[1]).is_some());
        assert!(fields[2].parse::<usize>().unwrap() < instance.days());
        assert!(fields[3].parse::<usize>().unwrap() < instance.periods_per_day());
    }
}

#[test]
fn test_store_and_log_a_run() {
    let dir = tempfile::tempdir().unwrap();
    let instance = fixtures::toy();
    let result = solve_toy(&instance);

    let store = SolutionStore::open(dir.path().join("solutions"), instance.name()).unwrap();
    let solution = store.write_solution(&instance, &result.timetable).unwrap();
    let summary = RunSummary {
        distance: result.distance,
        violations: 0,
        cost: result.cost as u64,
        construction_time: result.construction.duration,
        feasibility_time: result.feasibility.duration,
        improvement_time: result.improvement.duration,
        ..RunSummary::default()
    };
    assert_eq!(store.record(&summary).unwrap(), StoreOutcome::FirstRun);
    assert!(solution.exists());

    let log = RunLog::new(dir.path().join("runs.csv"));
    log.append(&RunRecord::new(instance.name(), &result, 0, result.cost as u64))
        .unwrap();
    let logged = fs::read_to_string(log.path()).unwrap();
    assert!(logged.contains(",Toy,"));
    assert!(logged.contains(",distance:,"));
    assert!(logged.contains(",penalty:,"));
}
