//! Turn order and betting-round closure.

use crate::player::{PlayerStatus, SeatId};
use crate::state::HandState;

/// First seat clockwise after `from` that is not folded and still has chips.
/// Wraps around the table and may return `from` itself; `None` when nobody
/// qualifies within one lap.
pub fn next_actor_after(state: &HandState, from: SeatId) -> Option<SeatId> {
    let n = state.players.len();
    if n == 0 {
        return None;
    }
    (1..=n)
        .map(|offset| (from + offset) % n)
        .find(|&seat| {
            let p = &state.players[seat];
            !p.is_folded() && p.stack > 0
        })
}

/// Next seat to act after the current player.
pub fn next_actor(state: &HandState) -> Option<SeatId> {
    next_actor_after(state, state.current_player?)
}

/// Whether the current street's betting is closed.
///
/// With one or no active players left the round is over, except when the
/// single active player still holds the option (has not acted yet, e.g. the
/// big blind after everyone limped or went all-in below them).
pub fn is_round_over(state: &HandState) -> bool {
    let active: Vec<_> = state
        .players
        .iter()
        .filter(|p| p.status == PlayerStatus::Active)
        .collect();

    if active.len() <= 1 {
        return !active.first().is_some_and(|p| !p.has_acted);
    }

    active
        .iter()
        .all(|p| p.has_acted && p.bet == state.current_bet)
}

/// Betting is closed and fewer than two players can still act, so the
/// remaining streets can be dealt without further input.
pub fn should_auto_advance(state: &HandState) -> bool {
    state.stage.is_betting() && is_round_over(state) && state.active_count() < 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{Player, Position};

    fn table(stacks: &[u32]) -> HandState {
        let mut state = HandState::default();
        let layout = Position::layout(stacks.len());
        state.players = stacks
            .iter()
            .enumerate()
            .map(|(i, &s)| Player::new(i, s, layout[i]))
            .collect();
        state
    }

    #[test]
    fn skips_folded_and_empty_stacks_and_wraps() {
        let mut state = table(&[100, 100, 0, 100]);
        state.players[3].status = PlayerStatus::Folded;
        state.current_player = Some(1);
        assert_eq!(next_actor(&state), Some(0));
    }

    #[test]
    fn no_actor_when_everyone_is_out() {
        let mut state = table(&[0, 0, 0]);
        state.current_player = Some(0);
        assert_eq!(next_actor(&state), None);
        state.current_player = None;
        assert_eq!(next_actor(&state), None);
    }

    #[test]
    fn single_active_player_keeps_option_until_acting() {
        let mut state = table(&[100, 0]);
        state.players[1].status = PlayerStatus::AllIn;
        assert!(!is_round_over(&state));
        state.players[0].has_acted = true;
        assert!(is_round_over(&state));
    }
}
