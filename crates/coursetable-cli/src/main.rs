//! `coursetable` command-line tool.

mod cli;
mod error;
mod solve;

use std::process::ExitCode;

use clap::Parser;
use owo_colors::OwoColorize;

use cli::{Cli, Command};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Solve(args) => solve::run(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err}", "error:".bright_red().bold());
            ExitCode::FAILURE
        }
    }
}
