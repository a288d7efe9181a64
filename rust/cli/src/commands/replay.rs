//! Replay command handler.
//!
//! Re-runs every stored hand's summary through the engine and checks the
//! recorded board, pot and winnings against the fresh result.

use std::io::Write;
use std::path::Path;

use holdem_engine::history::{HandHistoryClient, JsonlHistory, PersistedHand};
use holdem_engine::replay::replay;

use crate::error::{BatchValidationError, CliError};
use crate::ui;

pub fn handle_replay_command(
    input: &Path,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let hands = match JsonlHistory::new(input).fetch() {
        Ok(hands) => hands,
        Err(e) => {
            ui::write_error(err, &format!("Failed to read {}: {}", input.display(), e))?;
            return Err(e.into());
        }
    };

    if hands.is_empty() {
        writeln!(out, "No hands found in file.")?;
        return Ok(());
    }

    let mut failures = Vec::new();
    for record in hands.iter().rev() {
        match verify(record) {
            Ok(()) => writeln!(out, "OK {}", record.id)?,
            Err(message) => failures.push(BatchValidationError {
                item_context: record.id.clone(),
                message,
            }),
        }
    }

    for failure in &failures {
        ui::write_error(err, &failure.to_string())?;
    }
    writeln!(
        out,
        "Replayed {} hand(s): {} ok, {} mismatched",
        hands.len(),
        hands.len() - failures.len(),
        failures.len()
    )?;

    if failures.is_empty() {
        Ok(())
    } else {
        Err(CliError::InvalidInput(format!(
            "{} of {} hand(s) failed replay",
            failures.len(),
            hands.len()
        )))
    }
}

fn verify(record: &PersistedHand) -> Result<(), String> {
    let outcome = replay(&record.summary()).map_err(|e| e.to_string())?;

    let board: Vec<String> = outcome.board.iter().map(ToString::to_string).collect();
    if board != record.board {
        return Err(format!(
            "board {} does not match recorded {}",
            board.concat(),
            record.board.concat()
        ));
    }
    if outcome.pot != record.pot {
        return Err(format!(
            "pot {} does not match recorded {}",
            outcome.pot, record.pot
        ));
    }
    if outcome.winnings != record.winnings {
        return Err(format!(
            "winnings {:?} do not match recorded {:?}",
            outcome.winnings, record.winnings
        ));
    }
    Ok(())
}
