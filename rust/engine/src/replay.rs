//! Re-runs a [`HandSummary`] through the engine to validate it and score it.

use std::collections::{BTreeMap, HashSet};

use crate::cards::{full_deck, parse_cards, Card};
use crate::deck::Deck;
use crate::engine::{Command, Engine, TableConfig};
use crate::errors::ReplayError;
use crate::lifecycle::{self, MAX_SEATS, MIN_SEATS};
use crate::player::{Player, Position};
use crate::state::{HandState, HistoryEntry, Stage, Stakes};
use crate::summary::{HandSummary, SummaryPlayer};

/// Result of replaying a summary to the end of the hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayOutcome {
    pub final_state: HandState,
    pub board: Vec<Card>,
    pub pot: u32,
    /// Net chips won (positive) or lost, keyed by the summary's player id.
    pub winnings: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Code {
    Action(Command),
    Board(Vec<Card>),
}

fn parse_code(index: usize, code: &str) -> Result<Code, ReplayError> {
    let unknown = || ReplayError::UnknownCode {
        index,
        code: code.to_string(),
    };
    let action = match code {
        "f" => Command::Fold,
        "x" | "c" => Command::CallOrCheck,
        "allin" => Command::AllIn,
        _ if code.starts_with('b') || code.starts_with('r') => {
            let amount = code[1..].parse::<u32>().map_err(|_| unknown())?;
            Command::BetOrRaise(amount)
        }
        _ => {
            let cards = parse_cards(code).map_err(|_| unknown())?;
            if cards.is_empty() {
                return Err(unknown());
            }
            return Ok(Code::Board(cards));
        }
    };
    Ok(Code::Action(action))
}

fn malformed(reason: impl Into<String>) -> ReplayError {
    ReplayError::MalformedSummary(reason.into())
}

fn hole_cards(player: &SummaryPlayer) -> Result<Option<[Card; 2]>, ReplayError> {
    let Some(codes) = &player.cards else {
        return Ok(None);
    };
    let cards = codes
        .iter()
        .map(|c| c.parse::<Card>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| malformed(format!("{}: {e}", player.id)))?;
    match cards.as_slice() {
        [a, b] => Ok(Some([*a, *b])),
        _ => Err(malformed(format!(
            "{} must hold exactly two cards, got {}",
            player.id,
            cards.len()
        ))),
    }
}

/// Seats the summary's players in table order and checks the table is sane.
fn seat_players(summary: &HandSummary) -> Result<Vec<(String, Player)>, ReplayError> {
    let n = summary.players.len();
    if !(MIN_SEATS..=MAX_SEATS).contains(&n) {
        return Err(malformed(format!(
            "a hand needs {MIN_SEATS} to {MAX_SEATS} players, got {n}"
        )));
    }
    let ids: HashSet<&str> = summary.players.iter().map(|p| p.id.as_str()).collect();
    if ids.len() != n {
        return Err(malformed("player ids are not unique"));
    }

    let layout = Position::layout(n);
    let mut seated = Vec::with_capacity(n);
    for (seat, position) in layout.iter().enumerate() {
        let mut matching = summary.players.iter().filter(|p| p.position == *position);
        let (Some(entry), None) = (matching.next(), matching.next()) else {
            return Err(malformed(format!(
                "expected exactly one {position} for a {n}-handed table"
            )));
        };
        if entry.starting_stack == 0 {
            return Err(malformed(format!("{} has an empty starting stack", entry.id)));
        }
        let mut player = Player::new(seat, entry.starting_stack, *position);
        player.name = entry.name.clone();
        player.cards = hole_cards(entry)?;
        seated.push((entry.id.clone(), player));
    }
    Ok(seated)
}

/// Deck that burns one card before each recorded street and then deals it.
fn replay_deck(players: &[(String, Player)], streets: &[Vec<Card>]) -> Result<Deck, ReplayError> {
    let mut used = HashSet::new();
    let known = players
        .iter()
        .filter_map(|(_, p)| p.cards)
        .flatten()
        .chain(streets.iter().flatten().copied());
    for card in known {
        if !used.insert(card) {
            return Err(malformed(format!("card {card} appears twice")));
        }
    }

    let mut spare: Vec<Card> = full_deck()
        .into_iter()
        .filter(|c| !used.contains(c))
        .collect();
    spare.reverse();

    let mut cards = Vec::with_capacity(52);
    for street in streets {
        cards.extend(spare.pop());
        cards.extend_from_slice(street);
    }
    spare.reverse();
    cards.extend(spare);
    Ok(Deck::from_cards(cards))
}

/// Replays `summary` and scores it.
///
/// Player codes go through the same orchestrator as live play; every street
/// the engine deals must match the next board code in the summary.
///
/// # Errors
///
/// [`ReplayError`] when the summary is malformed, a code is unknown or illegal
/// at that point of the hand, a dealt street differs from the record, or the
/// codes run out before showdown (or continue after it).
pub fn replay(summary: &HandSummary) -> Result<ReplayOutcome, ReplayError> {
    let stakes = Stakes {
        small_blind: summary.config.sb,
        big_blind: summary.config.bb,
    };
    if stakes.small_blind == 0 || stakes.big_blind < stakes.small_blind {
        return Err(malformed(format!(
            "invalid blinds {}/{}",
            stakes.small_blind, stakes.big_blind
        )));
    }

    let codes = summary
        .actions
        .iter()
        .enumerate()
        .map(|(i, c)| parse_code(i, c))
        .collect::<Result<Vec<_>, _>>()?;
    let streets: Vec<Vec<Card>> = codes
        .iter()
        .filter_map(|c| match c {
            Code::Board(cards) => Some(cards.clone()),
            Code::Action(_) => None,
        })
        .collect();

    let seated = seat_players(summary)?;
    let deck = replay_deck(&seated, &streets)?;
    let ids: Vec<String> = seated.iter().map(|(id, _)| id.clone()).collect();
    let players: Vec<Player> = seated.into_iter().map(|(_, p)| p).collect();

    let stack = players.iter().map(|p| p.stack).max().unwrap_or(0);
    let template = HandState::initial(stack, stakes, Vec::new());
    let mut state = lifecycle::start_hand(template, "replay".to_string(), players, deck)
        .map_err(|e| malformed(e.to_string()))?;

    let mut engine = Engine::new(
        Some(0),
        TableConfig {
            seats: ids.len(),
            stakes,
        },
    );

    let mut index = 0;
    while index < codes.len() {
        if state.stage == Stage::Showdown {
            return Err(ReplayError::TrailingActions(codes.len() - index));
        }
        let raw = &summary.actions[index];
        let illegal = |reason: String| ReplayError::IllegalAction {
            index,
            code: raw.clone(),
            reason,
        };

        let history_len = state.action_history.len();
        let mut next_code = index;
        match &codes[index] {
            Code::Board(_) => {
                if state.current_player.is_some() {
                    return Err(illegal("a player is still due to act".to_string()));
                }
                state = engine
                    .try_dispatch(&state, Command::AdvanceStage)
                    .map_err(|e| illegal(e.to_string()))?;
            }
            Code::Action(command) => {
                state = engine
                    .try_dispatch(&state, command.clone())
                    .map_err(|e| illegal(e.to_string()))?;
                next_code += 1;
            }
        }

        for entry in &state.action_history[history_len..] {
            let HistoryEntry::Deal { cards, .. } = entry else {
                continue;
            };
            if cards.is_empty() {
                continue;
            }
            match codes.get(next_code) {
                Some(Code::Board(expected)) if expected == cards => next_code += 1,
                _ => {
                    return Err(ReplayError::BoardMismatch {
                        index: next_code,
                        code: summary.actions.get(next_code).cloned().unwrap_or_default(),
                    })
                }
            }
        }
        index = next_code;
    }

    // An all-in runout's last advance (river to showdown) deals nothing and
    // leaves no code behind.
    if state.stage == Stage::River && state.current_player.is_none() {
        state = engine
            .try_dispatch(&state, Command::AdvanceStage)
            .map_err(|_| ReplayError::Incomplete)?;
    }
    if state.stage != Stage::Showdown {
        return Err(ReplayError::Incomplete);
    }

    let winnings = ids
        .iter()
        .zip(state.initial_players.iter().zip(&state.players))
        .map(|(id, (start, end))| (id.clone(), i64::from(end.stack) - i64::from(start.stack)))
        .collect();

    Ok(ReplayOutcome {
        board: state.community_cards.clone(),
        pot: state.pot,
        winnings,
        final_state: state,
    })
}
