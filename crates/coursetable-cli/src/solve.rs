//! The `solve` command.

use std::path::{Path, PathBuf};

use coursetable::console;
use coursetable::output::write_solution_file;
use coursetable::prelude::*;
use coursetable::scoring::count_violations;
use coursetable::{RunLog, RunRecord, RunSummary, SolutionStore, StoreOutcome, TimetableDisplay};
use owo_colors::OwoColorize;
use tracing::level_filters::LevelFilter;

use crate::cli::SolveArgs;
use crate::error::{CliError, Result};

pub fn run(args: SolveArgs) -> Result<()> {
    console::init_with_level(match args.verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    });

    if args.validator.is_some() && args.output.is_none() && args.store.is_none() {
        return Err(CliError::Usage("--validator needs --output or --store"));
    }

    let config = load_config(&args)?;
    let instance = read_instance(&args.instance)?;
    let result = Solver::new(config).solve(&instance)?;

    if args.display {
        println!("{}", TimetableDisplay::new(&instance, &result.timetable));
    }

    let store = match &args.store {
        Some(dir) => Some(SolutionStore::open(dir, instance.name())?),
        None => None,
    };
    let solution = emit_solution(&instance, &result, &args, store.as_ref())?;

    let report = match (&args.validator, &solution) {
        (Some(program), Some(path)) => Some(Validator::new(program).validate(&args.instance, path)?),
        _ => None,
    };
    let (violations, cost) = match &report {
        Some(report) => (report.violations, report.cost),
        None => (
            count_violations(&instance, &result.timetable) as u64,
            result.cost.max(0) as u64,
        ),
    };

    let stored = match &store {
        Some(store) => {
            let summary = RunSummary {
                distance: result.distance,
                violations,
                cost,
                report: report.as_ref().map(|r| r.lines.clone()).unwrap_or_default(),
                construction_time: result.construction.duration,
                feasibility_time: result.feasibility.duration,
                improvement_time: result.improvement.duration,
            };
            Some(store.record(&summary)?)
        }
        None => None,
    };

    if let Some(path) = &args.run_log {
        RunLog::new(path).append(&RunRecord::new(instance.name(), &result, violations, cost))?;
    }

    print_summary(&instance, &result, violations, cost, solution.as_deref(), stored);
    Ok(())
}

fn load_config(args: &SolveArgs) -> Result<SolverConfig> {
    let mut config = match &args.config {
        Some(path) => SolverConfig::load(path)?,
        None => SolverConfig::default(),
    };
    if let Some(seed) = args.seed {
        config = config.with_random_seed(seed);
    }
    if let Some(secs) = args.time_limit {
        config = config.with_termination_seconds(secs);
    }
    Ok(config)
}

fn emit_solution(
    instance: &Instance,
    result: &SolveResult,
    args: &SolveArgs,
    store: Option<&SolutionStore>,
) -> Result<Option<PathBuf>> {
    if let Some(store) = store {
        return Ok(Some(store.write_solution(instance, &result.timetable)?));
    }
    match &args.output {
        Some(path) => {
            write_solution_file(instance, &result.timetable, path)?;
            Ok(Some(path.clone()))
        }
        None => Ok(None),
    }
}

fn print_summary(
    instance: &Instance,
    result: &SolveResult,
    violations: u64,
    cost: u64,
    solution: Option<&Path>,
    stored: Option<StoreOutcome>,
) {
    println!();
    println!("{} {}", "Instance:".bold(), instance.name());
    if result.is_best_effort() {
        println!(
            "{} {} lectures could not be placed",
            "BEST EFFORT".bright_red().bold(),
            result.distance
        );
    } else {
        println!("{}", "FEASIBLE".bright_green().bold());
    }
    println!(
        "  distance after construction  {}",
        result.distance_after_construction
    );
    println!("  distance                     {}", result.distance);
    println!("  violations                   {violations}");
    println!("  total cost                   {cost}");
    println!(
        "  room capacity / min working days / isolated / room stability  {} / {} / {} / {}",
        result.breakdown.room_capacity,
        result.breakdown.min_working_days,
        result.breakdown.isolated_lectures,
        result.breakdown.room_stability,
    );
    println!(
        "  construction {:.3}s │ feasibility ({}) {:.3}s │ improvement ({}) {:.3}s",
        result.construction.duration.as_secs_f64(),
        result.feasibility_strategy,
        result.feasibility.duration.as_secs_f64(),
        result.improvement_strategy,
        result.improvement.duration.as_secs_f64(),
    );
    if let Some(path) = solution {
        println!("  solution written to {}", path.display());
    }
    match stored {
        Some(StoreOutcome::NewBest) => {
            println!("  {}", "new best timetable, the previous one was replaced".bright_green())
        }
        Some(StoreOutcome::FirstRun) => println!("  first run, stored as best"),
        Some(StoreOutcome::Kept) => println!("  stored best is still better"),
        None => {}
    }
}
