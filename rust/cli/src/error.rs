//! Error types for the CLI application.
//!
//! Command handlers return `Result<(), CliError>` and `run` maps the error to
//! an exit code.
//!
//! ## Batch Validation Errors
//!
//! `BatchValidationError<T>` collects per-item failures with context. The
//! replay command uses it to report every hand whose stored result does not
//! match the engine's scoring.

use std::fmt;

use holdem_engine::errors::HistoryError;

use crate::config::ConfigError;

/// Custom error type for CLI operations.
#[derive(Debug)]
pub enum CliError {
    /// I/O error (file operations, stdout/stderr writes, etc.)
    Io(std::io::Error),

    /// Invalid user input or command-line arguments
    InvalidInput(String),

    /// Configuration error
    Config(String),

    /// Hand history could not be read or written
    History(HistoryError),

    /// Engine-related error
    Engine(String),

    /// Operation was interrupted (e.g., by user with Ctrl+C)
    Interrupted(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "I/O error: {}", e),
            CliError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::History(e) => write!(f, "History error: {}", e),
            CliError::Engine(msg) => write!(f, "Engine error: {}", msg),
            CliError::Interrupted(msg) => write!(f, "Interrupted: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(e) => Some(e),
            CliError::History(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        CliError::Io(error)
    }
}

impl From<HistoryError> for CliError {
    fn from(error: HistoryError) -> Self {
        CliError::History(error)
    }
}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        CliError::Config(error.to_string())
    }
}

/// One failed item of a batch operation.
///
/// # Examples
///
/// ```rust
/// use holdem_cli::BatchValidationError;
///
/// let error = BatchValidationError {
///     item_context: "hand-7".to_string(),
///     message: "winnings differ".to_string(),
/// };
/// assert_eq!(error.to_string(), "hand-7: winnings differ");
/// ```
#[derive(Debug)]
pub struct BatchValidationError<T> {
    /// Context identifying the item that failed validation
    pub item_context: T,
    pub message: String,
}

impl<T: std::fmt::Display> std::fmt::Display for BatchValidationError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.item_context, self.message)
    }
}
