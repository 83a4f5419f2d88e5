use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "coursetable", version)]
#[command(about = "Curriculum-based course timetabling solver", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Solve an .ectt instance
    Solve(SolveArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SolveArgs {
    /// Instance file in .ectt format
    pub instance: PathBuf,

    /// Solver configuration (TOML or YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Random seed; makes the run reproducible
    #[arg(long)]
    pub seed: Option<u64>,

    /// Overall time limit in seconds
    #[arg(short, long, value_name = "SECS")]
    pub time_limit: Option<u64>,

    /// Write the solution to this file
    #[arg(short, long, value_name = "FILE", conflicts_with = "store")]
    pub output: Option<PathBuf>,

    /// Keep the best solution per instance in this directory
    #[arg(long, value_name = "DIR")]
    pub store: Option<PathBuf>,

    /// Validator program run on the written solution
    #[arg(long, value_name = "PROGRAM")]
    pub validator: Option<PathBuf>,

    /// Append a record of the run to this CSV file
    #[arg(long, value_name = "FILE")]
    pub run_log: Option<PathBuf>,

    /// Print the timetable grid
    #[arg(long)]
    pub display: bool,

    /// More solver output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_solve_flags() {
        let cli = Cli::try_parse_from([
            "coursetable",
            "solve",
            "comp01.ectt",
            "--seed",
            "3",
            "-t",
            "20",
            "--store",
            "solutions",
            "-vv",
        ])
        .unwrap();

        let Command::Solve(args) = cli.command;
        assert_eq!(args.instance, PathBuf::from("comp01.ectt"));
        assert_eq!(args.seed, Some(3));
        assert_eq!(args.time_limit, Some(20));
        assert_eq!(args.store, Some(PathBuf::from("solutions")));
        assert_eq!(args.verbose, 2);
        assert!(!args.display);
    }

    #[test]
    fn test_output_and_store_conflict() {
        let parsed = Cli::try_parse_from([
            "coursetable",
            "solve",
            "a.ectt",
            "--output",
            "a.sol",
            "--store",
            "dir",
        ]);

        assert!(parsed.is_err());
    }
}
