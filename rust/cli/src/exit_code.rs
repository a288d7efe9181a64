//! Process exit codes returned by [`crate::run`].

pub const SUCCESS: i32 = 0;

/// Any failure: bad arguments, configuration, I/O or verification.
pub const ERROR: i32 = 2;

/// Interrupted by user (Ctrl+C).
pub const INTERRUPTED: i32 = 130;
