//! Applies a single betting action for the current player.
//!
//! Every function takes the full hand state by reference and returns a new
//! state; the input snapshot is never modified. Illegal actions come back as
//! a [`GameError`] and produce no state at all.

use crate::errors::GameError;
use crate::player::{ActionKind, PlayerAction, PlayerStatus, SeatId};
use crate::rules::{validate_action, ValidatedAction};
use crate::state::{HandState, HistoryEntry, Stage};

pub fn fold(state: &HandState) -> Result<HandState, GameError> {
    apply_action(state, PlayerAction::Fold).map(|(next, _)| next)
}

pub fn call_or_check(state: &HandState) -> Result<HandState, GameError> {
    apply_action(state, PlayerAction::CallOrCheck).map(|(next, _)| next)
}

/// `amount` is the total the player wants in front of them on this street.
pub fn bet_or_raise(state: &HandState, amount: u32) -> Result<HandState, GameError> {
    apply_action(state, PlayerAction::BetOrRaise(amount)).map(|(next, _)| next)
}

pub fn all_in(state: &HandState) -> Result<HandState, GameError> {
    apply_action(state, PlayerAction::AllIn).map(|(next, _)| next)
}

/// The seat allowed to act right now.
pub fn acting_seat(state: &HandState) -> Result<SeatId, GameError> {
    match state.stage {
        Stage::Pregame => return Err(GameError::NoHandInProgress),
        Stage::Showdown => return Err(GameError::WrongStage(Stage::Showdown)),
        _ => {}
    }
    let seat = state.current_player.ok_or(GameError::NoCurrentPlayer)?;
    let player = state.player(seat).ok_or(GameError::NoCurrentPlayer)?;
    if player.status != PlayerStatus::Active {
        return Err(GameError::PlayerNotActive(seat));
    }
    Ok(seat)
}

/// Validates and applies `action` for the current player, returning the new
/// state together with the structured history entry describing it.
pub fn apply_action(
    state: &HandState,
    action: PlayerAction,
) -> Result<(HandState, HistoryEntry), GameError> {
    let seat = acting_seat(state)?;
    let validated = validate_action(&state.players[seat], state, action)?;

    let mut next = state.clone();
    let entry = match validated {
        ValidatedAction::Fold => {
            let p = &mut next.players[seat];
            p.status = PlayerStatus::Folded;
            p.has_acted = true;
            p.last_action = Some(ActionKind::Fold);
            HistoryEntry::Fold { seat }
        }
        ValidatedAction::Check => {
            let p = &mut next.players[seat];
            p.has_acted = true;
            p.last_action = Some(ActionKind::Check);
            HistoryEntry::Check { seat }
        }
        ValidatedAction::Call(amount) => {
            let p = &mut next.players[seat];
            let paid = p.commit(amount);
            p.has_acted = true;
            p.last_action = Some(ActionKind::Call);
            next.pot += paid;
            HistoryEntry::Call { seat }
        }
        ValidatedAction::Bet(total) => {
            wager(&mut next, seat, total, ActionKind::Bet);
            HistoryEntry::Bet {
                seat,
                amount: total,
            }
        }
        ValidatedAction::Raise(total) => {
            wager(&mut next, seat, total, ActionKind::Raise);
            HistoryEntry::Raise {
                seat,
                amount: total,
            }
        }
        ValidatedAction::AllIn(total) => {
            if total > next.current_bet {
                wager(&mut next, seat, total, ActionKind::AllIn);
            } else {
                let p = &mut next.players[seat];
                let paid = p.commit(p.stack);
                p.has_acted = true;
                p.last_action = Some(ActionKind::AllIn);
                next.pot += paid;
            }
            next.players[seat].status = PlayerStatus::AllIn;
            HistoryEntry::AllIn { seat }
        }
    };

    tracing::debug!(
        seat,
        action = ?action,
        pot = next.pot,
        current_bet = next.current_bet,
        "applied player action"
    );
    Ok((next, entry))
}

/// Moves the seat's street contribution up to `total`, raising the current
/// bet and reopening action for everyone still active.
fn wager(state: &mut HandState, seat: SeatId, total: u32, kind: ActionKind) {
    let previous_bet = state.current_bet;
    let p = &mut state.players[seat];
    let paid = p.commit(total - p.bet);
    p.has_acted = true;
    p.last_action = Some(kind);
    state.pot += paid;

    state.current_bet = total;
    state.last_raiser = Some(seat);
    state.last_raise_amount = total - previous_bet;
    for other in state.players.iter_mut().filter(|p| p.id != seat) {
        if other.status == PlayerStatus::Active {
            other.has_acted = false;
        }
    }
}
