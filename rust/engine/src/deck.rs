use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cards::{full_deck, Card};

/// The cards still owned by a hand.
///
/// Cards are consumed by advancing a read position rather than splicing the
/// vector, so a snapshot of the deck is a plain clone.
///
/// # Examples
///
/// ```
/// use holdem_engine::deck::Deck;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha20Rng;
///
/// let mut rng = ChaCha20Rng::seed_from_u64(42);
/// let mut deck = Deck::new();
/// deck.shuffle(&mut rng);
///
/// let hole = deck.deal(2).expect("fresh deck has 52 cards");
/// assert_eq!(hole.len(), 2);
/// assert_eq!(deck.remaining(), 50);
/// assert!(deck.deal(51).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
    position: usize,
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl Deck {
    /// 52 unique cards in canonical order.
    pub fn new() -> Self {
        Self {
            cards: full_deck(),
            position: 0,
        }
    }

    /// A deck that deals exactly `cards`, first element first.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards, position: 0 }
    }

    pub fn empty() -> Self {
        Self::from_cards(Vec::new())
    }

    /// Re-collects all 52 cards and applies a uniform Fisher-Yates permutation.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards = full_deck();
        self.cards.shuffle(rng);
        self.position = 0;
    }

    /// Removes and returns the first `n` remaining cards, or `None` without
    /// touching the deck when fewer than `n` remain.
    pub fn deal(&mut self, n: usize) -> Option<Vec<Card>> {
        if n > self.remaining() {
            return None;
        }
        let dealt = self.cards[self.position..self.position + n].to_vec();
        self.position += n;
        Some(dealt)
    }

    pub fn deal_card(&mut self) -> Option<Card> {
        let c = self.cards.get(self.position).copied()?;
        self.position += 1;
        Some(c)
    }

    pub fn burn(&mut self) {
        let _ = self.deal_card();
    }

    pub fn remaining(&self) -> usize {
        self.cards.len().saturating_sub(self.position)
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Remaining cards in deal order.
    pub fn cards(&self) -> &[Card] {
        &self.cards[self.position.min(self.cards.len())..]
    }
}
