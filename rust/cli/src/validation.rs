//! Input parsing for the interactive table.
//!
//! Two syntaxes are accepted: typed lines (`raise 120`, `check`, `q`) and the
//! compact script tokens of `--script` (`r120`, `x`, `allin`), which mirror the
//! action codes stored in hand summaries.

use holdem_engine::engine::Command;

/// Outcome of parsing one line or script token.
#[derive(Debug, PartialEq)]
pub enum ParseResult {
    /// A command for the current hand.
    Command(Command),
    /// Deal a fresh hand at the configured stack.
    NewHand,
    /// User entered quit command (q or quit)
    Quit,
    /// Invalid input with error message
    Invalid(String),
}

/// Parses a typed input line.
///
/// Accepts (case-insensitive): `f`/`fold`, `x`/`check`, `c`/`call`,
/// `b N`/`bet N`, `r N`/`raise N`, `allin`/`all-in`, `advance`, `new`,
/// `reset`, `q`/`quit`. Bet and raise amounts are the street total.
///
/// # Example
///
/// ```rust
/// # use holdem_cli::validation::{parse_input_line, ParseResult};
/// use holdem_engine::engine::Command;
///
/// assert_eq!(parse_input_line("raise 120"), ParseResult::Command(Command::BetOrRaise(120)));
/// assert_eq!(parse_input_line("check"), ParseResult::Command(Command::CallOrCheck));
/// assert_eq!(parse_input_line("q"), ParseResult::Quit);
///
/// match parse_input_line("shove") {
///     ParseResult::Invalid(msg) => assert!(msg.contains("Unrecognized")),
///     _ => panic!("Expected Invalid"),
/// }
/// ```
pub fn parse_input_line(input: &str) -> ParseResult {
    let input = input.trim().to_lowercase();
    let parts: Vec<&str> = input.split_whitespace().collect();

    let Some(&word) = parts.first() else {
        return ParseResult::Invalid("Empty input".to_string());
    };

    match word {
        "q" | "quit" => ParseResult::Quit,
        "new" => ParseResult::NewHand,
        "reset" => ParseResult::Command(Command::Reset),
        "advance" => ParseResult::Command(Command::AdvanceStage),
        "f" | "fold" => ParseResult::Command(Command::Fold),
        "x" | "check" | "c" | "call" => ParseResult::Command(Command::CallOrCheck),
        "allin" | "all-in" => ParseResult::Command(Command::AllIn),
        "b" | "bet" | "r" | "raise" => match parts.get(1) {
            None => ParseResult::Invalid(format!(
                "'{}' requires an amount (e.g., '{} 120')",
                word, word
            )),
            Some(raw) => parse_amount(raw),
        },
        _ => ParseResult::Invalid(format!(
            "Unrecognized action '{}'. Valid actions: fold, check, call, bet <amount>, raise <amount>, allin, advance, new, reset, q",
            word
        )),
    }
}

/// Parses one `--script` token: `f`, `x`, `c`, `b<N>`, `r<N>`, `allin`,
/// `advance`, `new`, `reset`, `q`.
///
/// # Example
///
/// ```rust
/// # use holdem_cli::validation::{parse_script_token, ParseResult};
/// use holdem_engine::engine::Command;
///
/// assert_eq!(parse_script_token("r60"), ParseResult::Command(Command::BetOrRaise(60)));
/// assert_eq!(parse_script_token("allin"), ParseResult::Command(Command::AllIn));
/// ```
pub fn parse_script_token(token: &str) -> ParseResult {
    let token = token.trim().to_lowercase();
    match token.as_str() {
        "" => ParseResult::Invalid("Empty script token".to_string()),
        "f" | "x" | "c" | "allin" | "advance" | "new" | "reset" | "q" => {
            parse_input_line(&token)
        }
        t if t.starts_with('b') || t.starts_with('r') => parse_amount(&t[1..]),
        t => ParseResult::Invalid(format!("Unrecognized script token '{}'", t)),
    }
}

/// Splits a comma-separated `--script` value into tokens.
pub fn script_tokens(script: &str) -> Vec<String> {
    script
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_amount(raw: &str) -> ParseResult {
    match raw.parse::<u32>() {
        Ok(amount) if amount > 0 => ParseResult::Command(Command::BetOrRaise(amount)),
        Ok(_) => ParseResult::Invalid("Amount must be positive".to_string()),
        Err(_) => ParseResult::Invalid(format!("Invalid amount '{}'", raw)),
    }
}
