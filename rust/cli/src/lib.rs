//! # Hold'em CLI Library
//!
//! Terminal front end for the `holdem-engine` crate: one No-Limit Hold'em
//! table driven by typed commands or a script, plus tools for the JSON Lines
//! hand history it writes.
//!
//! ## Main Entry Point
//!
//! [`run`] parses the command line and executes the subcommand, writing to
//! the given streams and returning the process exit code.
//!
//! ```no_run
//! use std::io;
//! let args = vec!["holdem", "play", "--seats", "2", "--seed", "7", "--script", "f"];
//! let code = holdem_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `play`: Play hands at one table
//! - `history`: List stored hands
//! - `replay`: Re-score stored hands against their recorded results
//! - `cfg`: Display current configuration settings

use clap::Parser;
use std::io::{BufReader, Write};

pub mod cli;
mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod formatters;
pub mod io_utils;
pub mod logging;
#[macro_use]
mod macros;
pub mod session;
pub mod ui;
pub mod validation;

use cli::{Commands, HoldemCli};
use commands::{
    PlayInput, handle_cfg_command, handle_history_command, handle_play_command,
    handle_replay_command,
};
use config::ConfigOverrides;

pub use error::{BatchValidationError, CliError};

const COMMANDS: &[&str] = &["play", "history", "replay", "cfg"];

/// Main entry point for the CLI application.
///
/// # Returns
///
/// Exit code: `0` for success, `2` for errors, `130` when interrupted.
///
/// # Example
///
/// ```
/// use std::io;
/// let mut out = Vec::new();
/// let code = holdem_cli::run(["holdem", "--help"], &mut out, &mut io::stderr());
/// assert_eq!(code, 0);
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match HoldemCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;

            // Help and version go to stdout with success.
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    if write!(out, "{}", e).is_err() {
                        return exit_code::ERROR;
                    }
                    exit_code::SUCCESS
                }
                _ => usage_error(&e, err),
            };
        }
    };

    let result = match cli.cmd {
        Commands::Play {
            seats,
            stack,
            seed,
            script,
            auto_advance_ms,
            history,
        } => {
            let flags = ConfigOverrides {
                seats: seats.map(|n| n as usize),
                starting_stack: stack,
                seed,
                auto_advance_ms,
                history_path: history,
            };
            let input = match script {
                Some(script) => PlayInput::Script(script),
                None => PlayInput::Lines(Box::new(BufReader::new(std::io::stdin()))),
            };
            handle_play_command(flags, input, out, err)
        }
        Commands::History { input, limit } => handle_history_command(&input, limit, out, err),
        Commands::Replay { input } => handle_replay_command(&input, out, err),
        Commands::Cfg => handle_cfg_command(out, err),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(CliError::Interrupted(_)) => exit_code::INTERRUPTED,
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            exit_code::ERROR
        }
    }
}

fn usage_error(e: &clap::Error, err: &mut dyn Write) -> i32 {
    write_or_exit!(err, "{}", e);
    write_or_exit!(err, "Hold'em CLI");
    write_or_exit!(err, "Usage: holdem <command> [options]\n");
    write_or_exit!(err, "Commands:");
    for c in COMMANDS {
        write_or_exit!(err, "  {}", c);
    }
    write_or_exit!(err, "\nFor full help, run: holdem --help");
    exit_code::ERROR
}
