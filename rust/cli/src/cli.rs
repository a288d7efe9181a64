//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "holdem",
    version,
    about = "No-Limit Hold'em table for the terminal"
)]
pub struct HoldemCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Play hands at one table, from stdin or a script
    Play {
        #[arg(long, value_parser = clap::value_parser!(u64).range(2..=6))]
        seats: Option<u64>,
        /// Starting stack for every seat
        #[arg(long)]
        stack: Option<u32>,
        #[arg(long)]
        seed: Option<u64>,
        /// Comma-separated action codes, e.g. "c,x,r120,f"
        #[arg(long)]
        script: Option<String>,
        /// Delay before an all-in runout deals the next street
        #[arg(long)]
        auto_advance_ms: Option<u64>,
        /// JSON Lines file to save finished hands to
        #[arg(long)]
        history: Option<PathBuf>,
    },
    /// List stored hands, newest first
    History {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Re-score stored hands and compare with the recorded results
    Replay {
        #[arg(long)]
        input: PathBuf,
    },
    /// Show the resolved configuration and where each value came from
    Cfg,
}
