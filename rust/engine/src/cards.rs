use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::GameError;

/// Represents one of the four suits in a standard 52-card deck.
/// Used as a component of [`Card`] to fully define a playing card.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Suit {
    /// Clubs suit (c)
    Clubs,
    /// Diamonds suit (d)
    Diamonds,
    /// Hearts suit (h)
    Hearts,
    /// Spades suit (s)
    Spades,
}

impl Suit {
    pub fn code(self) -> char {
        match self {
            Suit::Clubs => 'c',
            Suit::Diamonds => 'd',
            Suit::Hearts => 'h',
            Suit::Spades => 's',
        }
    }

    pub fn from_code(c: char) -> Option<Suit> {
        match c {
            'c' => Some(Suit::Clubs),
            'd' => Some(Suit::Diamonds),
            'h' => Some(Suit::Hearts),
            's' => Some(Suit::Spades),
            _ => None,
        }
    }
}

/// Represents the rank (face value) of a playing card from Two through Ace.
/// Numeric values are assigned for comparison and hand ranking.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Rank {
    Two = 2,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Single-character rank code; Ten is written `T`.
    pub fn code(self) -> char {
        match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }

    pub fn from_code(c: char) -> Option<Rank> {
        all_ranks().into_iter().find(|r| r.code() == c)
    }
}

/// Represents a single playing card with a suit and rank.
///
/// The canonical text form is the two-character code used in narration and in
/// persisted hand histories, e.g. `As` or `Th`.
///
/// ```
/// use holdem_engine::cards::{Card, Rank, Suit};
///
/// let card: Card = "Th".parse().unwrap();
/// assert_eq!(card, Card { rank: Rank::Ten, suit: Suit::Hearts });
/// assert_eq!(card.to_string(), "Th");
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Card {
    /// The rank of the card (Two through Ace)
    pub rank: Rank,
    /// The suit of the card (Clubs, Diamonds, Hearts, or Spades)
    pub suit: Suit,
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.code(), self.suit.code())
    }
}

impl FromStr for Card {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(r), Some(su), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(GameError::InvalidCard(s.to_string()));
        };
        match (Rank::from_code(r), Suit::from_code(su)) {
            (Some(rank), Some(suit)) => Ok(Card { rank, suit }),
            _ => Err(GameError::InvalidCard(s.to_string())),
        }
    }
}

/// Concatenated codes, e.g. `AsKd7c` for a flop.
pub fn format_cards(cards: &[Card]) -> String {
    cards.iter().map(Card::to_string).collect()
}

/// Splits a concatenated code string back into cards.
pub fn parse_cards(codes: &str) -> Result<Vec<Card>, GameError> {
    if codes.len() % 2 != 0 || !codes.is_ascii() {
        return Err(GameError::InvalidCard(codes.to_string()));
    }
    codes
        .as_bytes()
        .chunks(2)
        .map(|pair| {
            let code = std::str::from_utf8(pair)
                .map_err(|_| GameError::InvalidCard(codes.to_string()))?;
            code.parse()
        })
        .collect()
}

pub fn all_suits() -> [Suit; 4] {
    [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs]
}

pub fn all_ranks() -> [Rank; 13] {
    [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ]
}

pub fn full_deck() -> Vec<Card> {
    let mut v = Vec::with_capacity(52);
    for &s in &all_suits() {
        for &r in &all_ranks() {
            v.push(Card { suit: s, rank: r });
        }
    }
    v
}
