use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::deck::Deck;
use crate::hand::Category;
use crate::history::PersistedHand;
use crate::player::{Player, PlayerStatus, Position, SeatId, STARTING_STACK};

/// Stage of a hand. Only ever moves forward, in declaration order.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Pregame,
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Stage {
    pub fn next(self) -> Stage {
        match self {
            Stage::Pregame => Stage::Preflop,
            Stage::Preflop => Stage::Flop,
            Stage::Flop => Stage::Turn,
            Stage::Turn => Stage::River,
            Stage::River | Stage::Showdown => Stage::Showdown,
        }
    }

    /// Preflop through river.
    pub fn is_betting(self) -> bool {
        matches!(
            self,
            Stage::Preflop | Stage::Flop | Stage::Turn | Stage::River
        )
    }

    /// Community cards revealed when entering this stage.
    pub fn cards_dealt(self) -> usize {
        match self {
            Stage::Flop => 3,
            Stage::Turn | Stage::River => 1,
            _ => 0,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Stage::Pregame => "Pregame",
            Stage::Preflop => "Preflop",
            Stage::Flop => "Flop",
            Stage::Turn => "Turn",
            Stage::River => "River",
            Stage::Showdown => "Showdown",
        }
    }
}

/// Blind sizes, fixed for a hand.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct Stakes {
    pub small_blind: u32,
    pub big_blind: u32,
}

impl Default for Stakes {
    fn default() -> Self {
        Self {
            small_blind: 20,
            big_blind: 40,
        }
    }
}

/// One entry of the structured, replayable action history.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HistoryEntry {
    Fold { seat: SeatId },
    Check { seat: SeatId },
    Call { seat: SeatId },
    Bet { seat: SeatId, amount: u32 },
    Raise { seat: SeatId, amount: u32 },
    AllIn { seat: SeatId },
    Deal { stage: Stage, cards: Vec<Card> },
}

/// A narration line.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub message: String,
    /// RFC 3339, UTC
    pub timestamp: String,
}

impl LogEntry {
    pub fn now(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Chips handed to a seat when the hand ended.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Award {
    pub seat: SeatId,
    pub amount: u32,
    /// `None` when the pot was won uncontested.
    pub category: Option<Category>,
}

/// Immutable snapshot of one hand.
///
/// Every transition produces a new value; nothing in the engine mutates a
/// snapshot that a caller still holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandState {
    pub hand_id: Option<String>,
    pub players: Vec<Player>,
    /// Seats as they were before blinds were posted.
    pub initial_players: Vec<Player>,
    pub deck: Deck,
    pub current_player: Option<SeatId>,
    /// Total chips committed this hand.
    pub pot: u32,
    pub community_cards: Vec<Card>,
    /// Highest street contribution among non-folded players.
    pub current_bet: u32,
    pub last_raiser: Option<SeatId>,
    /// Most recent full raise increment on this street.
    pub last_raise_amount: u32,
    pub stage: Stage,
    pub action_history: Vec<HistoryEntry>,
    pub logs: Vec<LogEntry>,
    pub stakes: Stakes,
    pub initial_stack: u32,
    /// Persisted hands, kept across resets.
    pub hand_history: Vec<PersistedHand>,
    pub awards: Vec<Award>,
}

impl Default for HandState {
    fn default() -> Self {
        Self::initial(STARTING_STACK, Stakes::default(), Vec::new())
    }
}

impl HandState {
    /// The pregame state every table starts from.
    pub fn initial(initial_stack: u32, stakes: Stakes, hand_history: Vec<PersistedHand>) -> Self {
        Self {
            hand_id: None,
            players: Vec::new(),
            initial_players: Vec::new(),
            deck: Deck::empty(),
            current_player: None,
            pot: 0,
            community_cards: Vec::new(),
            current_bet: 0,
            last_raiser: None,
            last_raise_amount: 0,
            stage: Stage::Pregame,
            action_history: Vec::new(),
            logs: vec![LogEntry::now("Welcome to Poker Simulator!")],
            stakes,
            initial_stack,
            hand_history,
            awards: Vec::new(),
        }
    }

    pub fn player(&self, seat: SeatId) -> Option<&Player> {
        self.players.get(seat)
    }

    pub fn current(&self) -> Option<&Player> {
        self.current_player.and_then(|seat| self.players.get(seat))
    }

    pub fn seat_at(&self, position: Position) -> Option<&Player> {
        self.players.iter().find(|p| p.position == position)
    }

    /// Seat that posts the small blind (the dealer when heads-up).
    pub fn small_blind_seat(&self) -> Option<&Player> {
        self.seat_at(Position::SmallBlind)
            .or_else(|| self.seat_at(Position::Dealer).filter(|_| self.players.len() == 2))
    }

    pub fn big_blind_seat(&self) -> Option<&Player> {
        self.seat_at(Position::BigBlind)
    }

    pub fn dealer_seat(&self) -> Option<&Player> {
        self.seat_at(Position::Dealer)
    }

    /// Players still contesting the pot.
    pub fn contenders(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| !p.is_folded())
    }

    pub fn active_count(&self) -> usize {
        self.players
            .iter()
            .filter(|p| p.status == PlayerStatus::Active)
            .count()
    }

    pub fn is_hand_over(&self) -> bool {
        self.stage == Stage::Showdown
    }

    pub(crate) fn log(&mut self, messages: impl IntoIterator<Item = String>) {
        self.logs.extend(messages.into_iter().map(LogEntry::now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_only_move_forward() {
        let mut stage = Stage::Pregame;
        let mut seen = vec![stage];
        while stage != Stage::Showdown {
            let next = stage.next();
            assert!(next > stage);
            stage = next;
            seen.push(stage);
        }
        assert_eq!(seen.len(), 6);
        assert_eq!(Stage::Showdown.next(), Stage::Showdown);
    }

    #[test]
    fn initial_state_is_pregame_with_welcome_line() {
        let state = HandState::default();
        assert_eq!(state.stage, Stage::Pregame);
        assert_eq!(state.stakes, Stakes { small_blind: 20, big_blind: 40 });
        assert_eq!(state.initial_stack, 10_000);
        assert_eq!(state.logs.len(), 1);
        assert_eq!(state.logs[0].message, "Welcome to Poker Simulator!");
        assert!(state.current_player.is_none());
    }
}
