//! Configuration command handler.
//!
//! Prints every setting with the layer it was resolved from:
//!
//! ```json
//! {
//!   "seats": {
//!     "value": 6,
//!     "source": "default"
//!   },
//!   ...
//! }
//! ```

use crate::config;
use crate::error::CliError;
use crate::ui;
use std::io::Write;

/// Loads the configuration with source tracking and writes it as pretty JSON.
///
/// # Errors
///
/// Returns `CliError::Config` if configuration loading fails.
/// Returns `CliError::Io` if writing to output stream fails.
pub fn handle_cfg_command(out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError> {
    let resolved = match config::load_with_sources() {
        Ok(r) => r,
        Err(e) => {
            ui::write_error(err, &format!("Invalid configuration: {}", e))?;
            return Err(CliError::Config(format!("Invalid configuration: {}", e)));
        }
    };

    let config::ConfigResolved { config, sources } = resolved;
    let display = serde_json::json!({
        "seats": {
            "value": config.seats,
            "source": sources.seats,
        },
        "small_blind": {
            "value": config.small_blind,
            "source": sources.small_blind,
        },
        "big_blind": {
            "value": config.big_blind,
            "source": sources.big_blind,
        },
        "starting_stack": {
            "value": config.starting_stack,
            "source": sources.starting_stack,
        },
        "seed": {
            "value": config.seed,
            "source": sources.seed,
        },
        "auto_advance_ms": {
            "value": config.auto_advance_ms,
            "source": sources.auto_advance_ms,
        },
        "history_path": {
            "value": config.history_path,
            "source": sources.history_path,
        }
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}
