use thiserror::Error;

use crate::state::Stage;

/// Why a command could not be applied to a hand.
///
/// The orchestrator turns every one of these into a silent rejection (the
/// caller gets its state back untouched); the variants exist for logging and
/// for callers of `try_dispatch`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid bet amount: {amount}, minimum: {minimum}")]
    InvalidBetAmount { amount: u32, minimum: u32 },
    #[error("Insufficient chips for action")]
    InsufficientChips,
    #[error("No hand in progress")]
    NoHandInProgress,
    #[error("No player is due to act")]
    NoCurrentPlayer,
    #[error("Player {0} is not active")]
    PlayerNotActive(usize),
    #[error("Action not allowed during {0:?}")]
    WrongStage(Stage),
    #[error("Invalid table setup: {0}")]
    InvalidSetup(String),
    #[error("Invalid card code: {0}")]
    InvalidCard(String),
}

/// Failures of the hand history collaborator.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("history record could not be encoded: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("invalid hand summary: {0}")]
    InvalidSummary(String),
    #[error("hand could not be scored: {0}")]
    Replay(#[from] ReplayError),
    #[error("history storage poisoned")]
    StoragePoisoned,
}

/// Failures while re-running a recorded hand.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplayError {
    #[error("malformed summary: {0}")]
    MalformedSummary(String),
    #[error("unknown action code '{code}' at index {index}")]
    UnknownCode { index: usize, code: String },
    #[error("illegal action '{code}' at index {index}: {reason}")]
    IllegalAction {
        index: usize,
        code: String,
        reason: String,
    },
    #[error("board '{code}' at index {index} does not match the dealt cards")]
    BoardMismatch { index: usize, code: String },
    #[error("action sequence ended before the hand finished")]
    Incomplete,
    #[error("{0} action codes left after the hand finished")]
    TrailingActions(usize),
}
