//! Human-readable log lines for hand transitions.
//!
//! Action lines are built from the state *before* the action is applied;
//! setup, street and end-of-hand lines from the state after.

use crate::cards::{format_cards, Card};
use crate::player::PlayerAction;
use crate::state::{Award, HandState, Stage};

pub const SEPARATOR: &str = "---";

pub fn setup_lines(state: &HandState) -> Vec<String> {
    let mut lines: Vec<String> = state
        .players
        .iter()
        .filter_map(|p| {
            p.cards
                .map(|cards| format!("{} is dealt {}", p.name, format_cards(&cards)))
        })
        .collect();

    lines.push(SEPARATOR.to_string());
    if let Some(dealer) = state.dealer_seat() {
        lines.push(format!("{} is the dealer", dealer.name));
    }
    if let Some(sb) = state.small_blind_seat() {
        lines.push(format!(
            "{} posts small blind - {} chips",
            sb.name, state.stakes.small_blind
        ));
    }
    if let Some(bb) = state.big_blind_seat() {
        lines.push(format!(
            "{} posts big blind - {} chips",
            bb.name, state.stakes.big_blind
        ));
    }
    lines.push(SEPARATOR.to_string());
    lines
}

/// Narrates `action` by the current player of `before`.
pub fn action_line(before: &HandState, action: PlayerAction) -> Option<String> {
    let player = before.current()?;
    let line = match action {
        PlayerAction::Fold => format!("{} folds", player.name),
        PlayerAction::CallOrCheck if before.current_bet > player.bet => {
            format!("{} calls", player.name)
        }
        PlayerAction::CallOrCheck => format!("{} checks", player.name),
        PlayerAction::BetOrRaise(amount) if before.current_bet > 0 => {
            format!("{} raises to {} chips", player.name, amount)
        }
        PlayerAction::BetOrRaise(amount) => format!("{} bets {} chips", player.name, amount),
        PlayerAction::AllIn => format!("{} goes all-in for {} chips", player.name, player.stack),
    };
    Some(line)
}

pub fn street_lines(stage: Stage, dealt: &[Card]) -> Vec<String> {
    vec![
        SEPARATOR.to_string(),
        format!("{} cards dealt: {}", stage.title(), format_cards(dealt)),
    ]
}

/// Contenders' hole cards and made hands, for an evaluated showdown.
pub fn showdown_lines(state: &HandState, awards: &[Award]) -> Vec<String> {
    if awards.iter().all(|a| a.category.is_none()) {
        return Vec::new();
    }
    state
        .contenders()
        .filter_map(|p| {
            let cards = p.cards?;
            let shown = format_cards(&cards);
            let category = crate::hand::evaluate_hand(
                &[cards.as_slice(), state.community_cards.as_slice()].concat(),
            );
            Some(match category {
                Some(strength) => format!("{} shows {} ({})", p.name, shown, strength.category),
                None => format!("{} shows {}", p.name, shown),
            })
        })
        .collect()
}

pub fn end_of_hand_lines(state: &HandState) -> Vec<String> {
    let pot = state.pot;
    let names: Vec<&str> = state
        .awards
        .iter()
        .filter_map(|a| state.player(a.seat).map(|p| p.name.as_str()))
        .collect();
    let winner_line = match names.as_slice() {
        [] => None,
        [single] => Some(format!("{single} wins the pot of {pot}")),
        many => Some(format!("{} split the pot of {pot}", many.join(" and "))),
    };

    let hand_id = state.hand_id.as_deref().unwrap_or("?");
    winner_line
        .into_iter()
        .chain([
            format!("Hand #{hand_id} ended"),
            format!("Final pot was {pot}"),
        ])
        .collect()
}
