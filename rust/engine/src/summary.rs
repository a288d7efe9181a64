//! Lean, replayable description of a finished hand, as handed to the hand
//! history collaborator.

use serde::{Deserialize, Serialize};

use crate::cards::{format_cards, Card};
use crate::player::Position;
use crate::state::{HandState, HistoryEntry};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryPlayer {
    /// External id, `player-<seat>`.
    pub id: String,
    pub name: String,
    pub starting_stack: u32,
    /// Hole card codes, e.g. `["Ah", "Kd"]`.
    pub cards: Option<Vec<String>>,
    pub position: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfigSummary {
    pub sb: u32,
    pub bb: u32,
    #[serde(default)]
    pub ante: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandSummary {
    pub players: Vec<SummaryPlayer>,
    pub actions: Vec<String>,
    pub config: TableConfigSummary,
}

/// Flattened action code for one history entry. Deals that revealed nothing
/// produce no code.
///
/// ```
/// use holdem_engine::state::HistoryEntry;
/// use holdem_engine::summary::action_code;
///
/// assert_eq!(action_code(&HistoryEntry::Raise { seat: 2, amount: 120 }).as_deref(), Some("r120"));
/// assert_eq!(action_code(&HistoryEntry::Check { seat: 0 }).as_deref(), Some("x"));
/// ```
pub fn action_code(entry: &HistoryEntry) -> Option<String> {
    let code = match entry {
        HistoryEntry::Fold { .. } => "f".to_string(),
        HistoryEntry::Check { .. } => "x".to_string(),
        HistoryEntry::Call { .. } => "c".to_string(),
        HistoryEntry::Bet { amount, .. } => format!("b{amount}"),
        HistoryEntry::Raise { amount, .. } => format!("r{amount}"),
        HistoryEntry::AllIn { .. } => "allin".to_string(),
        HistoryEntry::Deal { cards, .. } if cards.is_empty() => return None,
        HistoryEntry::Deal { cards, .. } => format_cards(cards),
    };
    Some(code)
}

pub fn action_codes(history: &[HistoryEntry]) -> Vec<String> {
    history.iter().filter_map(action_code).collect()
}

fn card_codes(cards: &[Card]) -> Vec<String> {
    cards.iter().map(Card::to_string).collect()
}

/// Builds the summary of the hand in `state`; `None` before any hand was dealt.
pub fn summarize(state: &HandState) -> Option<HandSummary> {
    state.hand_id.as_ref()?;
    if state.initial_players.is_empty() {
        return None;
    }

    let players = state
        .initial_players
        .iter()
        .map(|initial| {
            let cards = state
                .player(initial.id)
                .and_then(|p| p.cards)
                .map(|hole| card_codes(&hole));
            SummaryPlayer {
                id: initial.external_id(),
                name: initial.name.clone(),
                starting_stack: initial.stack,
                cards,
                position: initial.position,
            }
        })
        .collect();

    Some(HandSummary {
        players,
        actions: action_codes(&state.action_history),
        config: TableConfigSummary {
            sb: state.stakes.small_blind,
            bb: state.stakes.big_blind,
            ante: 0,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;
    use crate::state::Stage;

    #[test]
    fn empty_deal_is_dropped() {
        let history = vec![
            HistoryEntry::Call { seat: 0 },
            HistoryEntry::Deal {
                stage: Stage::Flop,
                cards: Vec::new(),
            },
            HistoryEntry::Deal {
                stage: Stage::Turn,
                cards: parse_cards("9c").unwrap(),
            },
            HistoryEntry::AllIn { seat: 1 },
        ];
        assert_eq!(action_codes(&history), vec!["c", "9c", "allin"]);
    }

    #[test]
    fn no_summary_before_a_hand() {
        assert!(summarize(&HandState::default()).is_none());
    }
}
