//! # Play Command
//!
//! One table session at the terminal. Commands come from stdin (typed lines)
//! or from `--script` (action codes); every applied command prints the new
//! narration lines. All-in runouts are dealt by the auto-advance timer.

use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use holdem_engine::engine::{Command, Engine, TableConfig};
use holdem_engine::history::{HandHistoryClient, HistoryRecorder, InMemoryHistory, JsonlHistory};
use holdem_engine::state::{Stage, Stakes};
use tokio::sync::mpsc;

use crate::config::{self, Config, ConfigOverrides};
use crate::error::CliError;
use crate::formatters::format_turn;
use crate::io_utils::spawn_line_reader;
use crate::session::{AutoAdvanceTimer, Outcome, TableSession};
use crate::ui;
use crate::validation::{ParseResult, parse_input_line, parse_script_token, script_tokens};

/// Where the session reads its commands from.
pub enum PlayInput {
    /// Typed lines; the session prompts before each decision.
    Lines(Box<dyn BufRead + Send>),
    /// Pre-recorded `--script` tokens.
    Script(String),
}

/// Handle the play command.
///
/// Resolves the configuration, applies `flags` on top and runs the session
/// until the input ends (after any pending runout) or the user quits.
///
/// # Errors
///
/// `CliError::Config` for an invalid configuration, `CliError::Interrupted`
/// on Ctrl+C, `CliError::Io` when output cannot be written.
pub fn handle_play_command(
    flags: ConfigOverrides,
    input: PlayInput,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let resolved = match config::load_with_sources().and_then(|r| r.with_overrides(flags)) {
        Ok(r) => r,
        Err(e) => {
            ui::write_error(err, &format!("Invalid configuration: {}", e))?;
            return Err(CliError::Config(e.to_string()));
        }
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(play(resolved.config, input, out, err))
}

async fn play(
    cfg: Config,
    input: PlayInput,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let seed = cfg.seed.unwrap_or_else(rand::random);
    let table = TableConfig {
        seats: cfg.seats,
        stakes: Stakes {
            small_blind: cfg.small_blind,
            big_blind: cfg.big_blind,
        },
    };
    let client: Arc<dyn HandHistoryClient> = match &cfg.history_path {
        Some(path) => Arc::new(JsonlHistory::new(path)),
        None => Arc::new(InMemoryHistory::new()),
    };

    tracing::info!(
        seats = cfg.seats,
        stack = cfg.starting_stack,
        seed,
        history = ?cfg.history_path,
        "table session started"
    );
    writeln!(
        out,
        "play: seats={} stack={} blinds={}/{} seed={}",
        cfg.seats, cfg.starting_stack, cfg.small_blind, cfg.big_blind, seed
    )?;

    let mut session = TableSession::new(
        Engine::new(Some(seed), table),
        cfg.starting_stack,
        HistoryRecorder::new(client),
    );
    session.load_history();
    session.new_hand();

    let (interactive, parse, mut lines): (bool, fn(&str) -> ParseResult, _) = match input {
        PlayInput::Lines(reader) => (true, parse_input_line, spawn_line_reader(reader)?),
        PlayInput::Script(script) => {
            let (tx, rx) = mpsc::unbounded_channel();
            for token in script_tokens(&script) {
                let _ = tx.send(token);
            }
            (false, parse_script_token, rx)
        }
    };

    let (mut timer, mut fired) =
        AutoAdvanceTimer::new(Duration::from_millis(cfg.auto_advance_ms));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut listening = true;
    let mut input_open = true;

    loop {
        for line in session.take_narration() {
            writeln!(out, "{}", line)?;
        }
        timer.reschedule(session.generation(), session.wants_auto_advance());
        if interactive && input_open {
            prompt(&session, out)?;
        }
        if !input_open && !timer.is_armed() {
            break;
        }

        tokio::select! {
            signal = &mut ctrl_c, if listening => match signal {
                Ok(()) => {
                    writeln!(out, "Interrupted.")?;
                    return Err(CliError::Interrupted("received Ctrl+C".into()));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "cannot listen for Ctrl+C");
                    listening = false;
                }
            },
            Some(generation) = fired.recv() => {
                if timer.take_fired(generation) && generation == session.generation() {
                    tracing::debug!(stage = ?session.state().stage, "auto-advancing");
                    let outcome = session.apply(Command::AdvanceStage);
                    report(&mut session, outcome, out, err)?;
                }
            }
            line = lines.recv(), if input_open => match line {
                None => input_open = false,
                Some(line) if line.is_empty() => {}
                Some(line) => match parse(&line) {
                    ParseResult::Quit => break,
                    ParseResult::NewHand => {
                        let outcome = session.new_hand();
                        report(&mut session, outcome, out, err)?;
                    }
                    ParseResult::Command(command) => {
                        let outcome = session.apply(command);
                        report(&mut session, outcome, out, err)?;
                    }
                    ParseResult::Invalid(msg) => ui::write_error(err, &msg)?,
                },
            },
        }
    }

    timer.cancel();
    for line in session.take_narration() {
        writeln!(out, "{}", line)?;
    }
    writeln!(out, "Session ended after {} hand(s)", session.hands_started())?;
    Ok(())
}

fn report(
    session: &mut TableSession,
    outcome: Outcome,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    match outcome {
        Outcome::Rejected => ui::write_error(err, "illegal action")?,
        Outcome::Applied => {}
        Outcome::Saved(record) => {
            for line in session.take_narration() {
                writeln!(out, "{}", line)?;
            }
            writeln!(out, "Hand saved: {}", record.id)?;
        }
    }
    Ok(())
}

fn prompt(session: &TableSession, out: &mut dyn Write) -> Result<(), CliError> {
    let state = session.state();
    if let Some(line) = format_turn(state) {
        writeln!(out, "{}", line)?;
    } else if state.stage == Stage::Showdown {
        writeln!(out, "Type 'new' for the next hand or 'q' to quit")?;
    }
    out.flush()?;
    Ok(())
}
