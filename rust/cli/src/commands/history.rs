//! History command handler: lists stored hands, newest first.

use std::io::Write;
use std::path::Path;

use holdem_engine::history::{HandHistoryClient, JsonlHistory};

use crate::error::CliError;
use crate::formatters::format_record;
use crate::ui;

pub fn handle_history_command(
    input: &Path,
    limit: Option<usize>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if limit == Some(0) {
        let msg = "limit must be >= 1";
        ui::write_error(err, msg)?;
        return Err(CliError::InvalidInput(msg.to_string()));
    }

    let hands = match JsonlHistory::new(input).fetch() {
        Ok(hands) => hands,
        Err(e) => {
            ui::write_error(err, &format!("Failed to read {}: {}", input.display(), e))?;
            return Err(e.into());
        }
    };

    if hands.is_empty() {
        writeln!(out, "No hands recorded.")?;
        return Ok(());
    }

    if let Some(n) = limit
        && n > hands.len()
    {
        ui::display_warning(
            err,
            &format!("only {} hand(s) recorded, fewer than --limit {}", hands.len(), n),
        )?;
    }

    let shown = limit.unwrap_or(hands.len()).min(hands.len());
    for record in &hands[..shown] {
        writeln!(out, "{}", format_record(record))?;
    }
    writeln!(out, "Showing {} of {} hand(s)", shown, hands.len())?;
    Ok(())
}
