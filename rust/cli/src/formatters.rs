//! Text formatting for table status and stored hands.

use chrono::DateTime;
use holdem_engine::cards::format_cards;
use holdem_engine::history::PersistedHand;
use holdem_engine::rules::legal_actions;
use holdem_engine::state::HandState;

/// One-line prompt for the player to act, e.g.
/// `Player 2 to act | Flop 9c7h2s | pot 120 | to call 40 | stack 960`.
pub fn format_turn(state: &HandState) -> Option<String> {
    let player = state.current()?;
    let legal = legal_actions(player, state);
    let board = if state.community_cards.is_empty() {
        String::new()
    } else {
        format!(" {}", format_cards(&state.community_cards))
    };
    Some(format!(
        "{} to act | {}{} | pot {} | to call {} | stack {}",
        player.name,
        state.stage.title(),
        board,
        state.pot,
        legal.call_amount,
        player.stack
    ))
}

/// Signed chip count, `+20` / `-20` / `0`.
pub fn format_net(chips: i64) -> String {
    if chips > 0 {
        format!("+{}", chips)
    } else {
        chips.to_string()
    }
}

/// RFC 3339 timestamps as `YYYY-MM-DD HH:MM:SS`; anything unparsable is shown
/// as stored.
pub fn format_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// Listing line for a stored hand.
///
/// ```rust
/// use std::collections::BTreeMap;
/// use holdem_cli::formatters::format_record;
/// use holdem_engine::history::PersistedHand;
/// use holdem_engine::summary::TableConfigSummary;
///
/// let record = PersistedHand {
///     id: "a1".into(),
///     timestamp: "2025-03-01T12:30:00Z".into(),
///     players: Vec::new(),
///     actions: vec!["r60".into(), "f".into()],
///     board: Vec::new(),
///     pot: 80,
///     config: TableConfigSummary { sb: 10, bb: 20, ante: 0 },
///     winnings: BTreeMap::from([("player-0".into(), 20), ("player-1".into(), -20)]),
/// };
/// assert_eq!(
///     format_record(&record),
///     "a1  2025-03-01 12:30:00  10/20  pot 80  board -  player-0 +20, player-1 -20"
/// );
/// ```
pub fn format_record(record: &PersistedHand) -> String {
    let board = if record.board.is_empty() {
        "-".to_string()
    } else {
        record.board.concat()
    };
    let winnings = record
        .winnings
        .iter()
        .map(|(id, net)| format!("{} {}", id, format_net(*net)))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "{}  {}  {}/{}  pot {}  board {}  {}",
        record.id,
        format_timestamp(&record.timestamp),
        record.config.sb,
        record.config.bb,
        record.pot,
        board,
        winnings
    )
}
