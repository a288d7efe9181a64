use crate::cards::Card;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a seat in [`crate::state::HandState::players`]; fixed for the hand.
pub type SeatId = usize;

/// Table position label of a seat.
///
/// Heads-up tables only use `Dealer` and `BigBlind`; the dealer then posts the
/// small blind.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Dealer,
    #[serde(rename = "smallblind")]
    SmallBlind,
    #[serde(rename = "bigblind")]
    BigBlind,
    Utg,
    Hijack,
    Cutoff,
}

impl Position {
    pub fn as_str(self) -> &'static str {
        match self {
            Position::Dealer => "dealer",
            Position::SmallBlind => "smallblind",
            Position::BigBlind => "bigblind",
            Position::Utg => "utg",
            Position::Hijack => "hijack",
            Position::Cutoff => "cutoff",
        }
    }

    pub fn parse(label: &str) -> Option<Position> {
        match label.to_ascii_lowercase().as_str() {
            "dealer" => Some(Position::Dealer),
            "smallblind" => Some(Position::SmallBlind),
            "bigblind" => Some(Position::BigBlind),
            "utg" => Some(Position::Utg),
            "hijack" => Some(Position::Hijack),
            "cutoff" => Some(Position::Cutoff),
            _ => None,
        }
    }

    /// Seat-order labels for a table of `seats` players.
    pub fn layout(seats: usize) -> Vec<Position> {
        if seats == 2 {
            return vec![Position::Dealer, Position::BigBlind];
        }
        [
            Position::Dealer,
            Position::SmallBlind,
            Position::BigBlind,
            Position::Utg,
            Position::Hijack,
            Position::Cutoff,
        ]
        .into_iter()
        .take(seats)
        .collect()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlayerStatus {
    Active,
    Folded,
    AllIn,
}

/// The last thing a player did on the current hand.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    Bet,
    Raise,
    AllIn,
}

/// A betting decision submitted for the player whose turn it is.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum PlayerAction {
    Fold,
    /// Checks when nothing is owed, otherwise calls (capped at the stack).
    CallOrCheck,
    /// Total street contribution to bet or raise to, not the increment.
    BetOrRaise(u32),
    AllIn,
}

/// Default starting stack size for each player in chips
pub const STARTING_STACK: u32 = 10_000;

/// A seat in the current hand.
///
/// Owned by the hand state: created at setup, changed only by the action
/// engine and the hand lifecycle, dropped at reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: SeatId,
    pub name: String,
    /// Chips behind, not counting `bet`.
    pub stack: u32,
    pub cards: Option<[Card; 2]>,
    pub position: Position,
    pub status: PlayerStatus,
    /// Contribution on the current street.
    pub bet: u32,
    pub has_acted: bool,
    pub last_action: Option<ActionKind>,
}

impl Player {
    pub fn new(id: SeatId, stack: u32, position: Position) -> Self {
        Self {
            id,
            name: format!("Player {}", id + 1),
            stack,
            cards: None,
            position,
            status: PlayerStatus::Active,
            bet: 0,
            has_acted: false,
            last_action: None,
        }
    }

    /// Stable identifier used in persisted summaries.
    pub fn external_id(&self) -> String {
        format!("player-{}", self.id)
    }

    pub fn is_active(&self) -> bool {
        self.status == PlayerStatus::Active
    }

    pub fn is_folded(&self) -> bool {
        self.status == PlayerStatus::Folded
    }

    /// Moves up to `amount` chips from the stack into the street bet and
    /// returns what was actually moved.
    pub(crate) fn commit(&mut self, amount: u32) -> u32 {
        let paid = amount.min(self.stack);
        self.stack -= paid;
        self.bet += paid;
        if self.stack == 0 && paid > 0 {
            self.status = PlayerStatus::AllIn;
        }
        paid
    }
}
