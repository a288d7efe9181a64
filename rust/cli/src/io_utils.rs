//! Line input for the interactive table.
//!
//! Blocking readers (stdin, files, in-memory cursors) are pumped on a plain OS
//! thread into a channel so the session loop can wait on input and timers at
//! the same time.

use std::io::BufRead;

use tokio::sync::mpsc;

/// Reads a line of input from a buffered reader, blocking until available.
///
/// Returns the trimmed line, or `None` on EOF or read errors.
///
/// # Example
///
/// ```rust
/// use std::io::Cursor;
/// # use holdem_cli::io_utils::read_stdin_line;
///
/// let mut input = Cursor::new("  raise 120\n");
/// assert_eq!(read_stdin_line(&mut input).as_deref(), Some("raise 120"));
/// assert_eq!(read_stdin_line(&mut input), None);
/// ```
pub fn read_stdin_line(stdin: &mut dyn BufRead) -> Option<String> {
    let mut line = String::new();
    match stdin.read_line(&mut line) {
        Ok(0) => None, // EOF
        Ok(_) => {
            let mut trimmed = line.trim();
            trimmed = trimmed.strip_prefix('\u{feff}').unwrap_or(trimmed);
            Some(trimmed.to_string())
        }
        Err(_) => None,
    }
}

/// Forwards every line of `reader` into the returned channel. The channel
/// closes at EOF.
pub fn spawn_line_reader(
    mut reader: Box<dyn BufRead + Send>,
) -> std::io::Result<mpsc::UnboundedReceiver<String>> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::Builder::new()
        .name("holdem-input".into())
        .spawn(move || {
            while let Some(line) = read_stdin_line(reader.as_mut()) {
                if tx.send(line).is_err() {
                    break;
                }
            }
        })?;
    Ok(rx)
}
