use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::cards::{Card, Suit};

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

impl Category {
    pub fn name(self) -> &'static str {
        match self {
            Category::HighCard => "High Card",
            Category::OnePair => "One Pair",
            Category::TwoPair => "Two Pair",
            Category::ThreeOfAKind => "Three of a Kind",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::FullHouse => "Full House",
            Category::FourOfAKind => "Four of a Kind",
            Category::StraightFlush => "Straight Flush",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct HandStrength {
    pub category: Category,
    // kickers: ordered high -> low for tiebreaks
    pub kickers: [u8; 5],
}

impl Ord for HandStrength {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_hands(self, other)
    }
}

impl PartialOrd for HandStrength {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Best five-card strength among `cards` (hole cards plus whatever board is
/// out). Returns `None` with fewer than five cards.
///
/// ```
/// use holdem_engine::cards::parse_cards;
/// use holdem_engine::hand::{evaluate_hand, Category};
///
/// let cards = parse_cards("AhKhQhJhTh2c3d").unwrap();
/// let strength = evaluate_hand(&cards).unwrap();
/// assert_eq!(strength.category, Category::StraightFlush);
/// assert!(evaluate_hand(&cards[..4]).is_none());
/// ```
pub fn evaluate_hand(cards: &[Card]) -> Option<HandStrength> {
    if cards.len() < 5 {
        return None;
    }

    let mut rank_counts = [0u8; 15]; // 2..14 used
    let mut by_suit: [Vec<u8>; 4] = [vec![], vec![], vec![], vec![]];
    for c in cards {
        let r = c.rank.value();
        rank_counts[r as usize] += 1;
        by_suit[suit_index(c.suit)].push(r);
    }

    let flush_suit = by_suit.iter().position(|ranks| ranks.len() >= 5);

    if let Some(s) = flush_suit {
        if let Some(high) = straight_high(&by_suit[s]) {
            return Some(strength(Category::StraightFlush, &[high]));
        }
    }

    // Ranks present, grouped by multiplicity, each list high -> low.
    let groups = |n: u8| -> Vec<u8> {
        (2..=14u8)
            .rev()
            .filter(|&r| rank_counts[r as usize] == n)
            .collect()
    };
    let quads = groups(4);
    let trips = groups(3);
    let pairs = groups(2);
    let present: Vec<u8> = (2..=14u8)
        .rev()
        .filter(|&r| rank_counts[r as usize] > 0)
        .collect();
    let kickers_excluding = |used: &[u8], n: usize| -> Vec<u8> {
        present
            .iter()
            .copied()
            .filter(|r| !used.contains(r))
            .take(n)
            .collect()
    };

    if let Some(&quad) = quads.first() {
        let mut k = vec![quad];
        k.extend(kickers_excluding(&[quad], 1));
        return Some(strength(Category::FourOfAKind, &k));
    }

    if let Some(&trip) = trips.first() {
        // A second set of trips plays as the pair.
        let pair = trips.get(1).into_iter().chain(pairs.first()).max();
        if let Some(&pair) = pair {
            return Some(strength(Category::FullHouse, &[trip, pair]));
        }
    }

    if let Some(s) = flush_suit {
        let mut ranks = by_suit[s].clone();
        ranks.sort_unstable_by(|a, b| b.cmp(a));
        return Some(strength(Category::Flush, &ranks[..5]));
    }

    if let Some(high) = straight_high(&present) {
        return Some(strength(Category::Straight, &[high]));
    }

    if let Some(&trip) = trips.first() {
        let mut k = vec![trip];
        k.extend(kickers_excluding(&[trip], 2));
        return Some(strength(Category::ThreeOfAKind, &k));
    }

    if pairs.len() >= 2 {
        let (high, low) = (pairs[0], pairs[1]);
        let mut k = vec![high, low];
        k.extend(kickers_excluding(&[high, low], 1));
        return Some(strength(Category::TwoPair, &k));
    }

    if let Some(&pair) = pairs.first() {
        let mut k = vec![pair];
        k.extend(kickers_excluding(&[pair], 3));
        return Some(strength(Category::OnePair, &k));
    }

    Some(strength(Category::HighCard, &present[..5]))
}

pub fn compare_hands(a: &HandStrength, b: &HandStrength) -> Ordering {
    match a.category.cmp(&b.category) {
        Ordering::Equal => a.kickers.cmp(&b.kickers),
        ord => ord,
    }
}

fn strength(category: Category, ranks: &[u8]) -> HandStrength {
    let mut kickers = [0u8; 5];
    for (slot, &r) in kickers.iter_mut().zip(ranks) {
        *slot = r;
    }
    HandStrength { category, kickers }
}

fn suit_index(s: Suit) -> usize {
    match s {
        Suit::Clubs => 0,
        Suit::Diamonds => 1,
        Suit::Hearts => 2,
        Suit::Spades => 3,
    }
}

/// Highest card of the best straight, with the ace also playing low.
fn straight_high(ranks: &[u8]) -> Option<u8> {
    let mut mask: u16 = 0;
    for &r in ranks {
        mask |= 1 << r;
    }
    if mask & (1 << 14) != 0 {
        mask |= 1 << 1;
    }
    (5..=14u8).rev().find(|&high| {
        let window = 0b11111u16 << (high - 4);
        mask & window == window
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    fn eval(codes: &str) -> HandStrength {
        evaluate_hand(&parse_cards(codes).unwrap()).unwrap()
    }

    #[test]
    fn wheel_is_five_high() {
        let s = eval("As2d3c4h5s9dKc");
        assert_eq!(s.category, Category::Straight);
        assert_eq!(s.kickers[0], 5);
    }

    #[test]
    fn third_pair_can_play_as_kicker() {
        let s = eval("KsKd9c9h4s4dAc");
        assert_eq!(s.category, Category::TwoPair);
        assert_eq!(s.kickers, [13, 9, 14, 0, 0]);
        let s = eval("KsKd9c9h4s4d2c");
        assert_eq!(s.kickers, [13, 9, 4, 0, 0]);
    }

    #[test]
    fn two_trips_make_a_full_house() {
        let s = eval("7s7d7cQhQsQd2c");
        assert_eq!(s.category, Category::FullHouse);
        assert_eq!(s.kickers[..2], [12, 7]);
    }
}
