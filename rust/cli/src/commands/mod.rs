//! Command handler modules for the `holdem` CLI.
//!
//! Each subcommand lives in its own module with the same shape:
//!
//! - Public handler function: `pub fn handle_COMMAND_command(...) -> Result<(), CliError>`
//! - Output streams (`&mut dyn Write`) passed in, so tests can capture them
//! - Errors reported on `err` and propagated as `CliError`

mod cfg;
mod history;
mod play;
mod replay;

pub use cfg::handle_cfg_command;
pub use history::handle_history_command;
pub use play::{PlayInput, handle_play_command};
pub use replay::handle_replay_command;
