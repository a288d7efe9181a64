use serde::{Deserialize, Serialize};

use crate::errors::GameError;
use crate::player::{Player, PlayerAction as A};
use crate::state::HandState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatedAction {
    Fold,
    Check,
    /// Chips actually moved; less than the amount owed for a capped call.
    Call(u32),
    /// Total street contribution.
    Bet(u32),
    /// Total street contribution.
    Raise(u32),
    /// Total street contribution after pushing the whole stack.
    AllIn(u32),
}

pub fn can_fold() -> bool {
    true
}

pub fn can_check(player: &Player, state: &HandState) -> bool {
    player.bet == state.current_bet
}

pub fn can_call(player: &Player, state: &HandState) -> bool {
    state.current_bet > player.bet && player.stack > 0
}

/// No wager has been made on this street yet.
pub fn can_bet(state: &HandState) -> bool {
    state.current_bet == 0
}

pub fn can_raise(player: &Player, state: &HandState) -> bool {
    if state.current_bet == 0 {
        return false;
    }
    let to_call = state.current_bet.saturating_sub(player.bet);
    if player.stack <= to_call {
        return false;
    }
    player.bet + player.stack >= min_raise_total(state)
}

pub fn can_all_in(player: &Player) -> bool {
    player.stack > 0
}

/// Smallest total street bet that counts as a full raise. The increment is the
/// last full raise on this street, or one big blind if nobody has raised yet.
///
/// ```
/// use holdem_engine::rules::min_raise_total;
/// use holdem_engine::state::HandState;
///
/// let mut state = HandState::default();
/// state.current_bet = 100;
/// state.last_raise_amount = 40;
/// assert_eq!(min_raise_total(&state), 140);
///
/// state.last_raise_amount = 0;
/// assert_eq!(min_raise_total(&state), 100 + state.stakes.big_blind);
/// ```
pub fn min_raise_total(state: &HandState) -> u32 {
    let increment = if state.last_raise_amount > 0 {
        state.last_raise_amount
    } else {
        state.stakes.big_blind
    };
    state.current_bet + increment
}

/// What the acting player may do right now, for callers that disable illegal
/// controls up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalActions {
    pub fold: bool,
    pub check: bool,
    pub call: bool,
    pub bet: bool,
    pub raise: bool,
    pub all_in: bool,
    /// Chips a call would move (capped at the stack).
    pub call_amount: u32,
    pub min_raise_to: u32,
    /// Everything behind plus what is already in front.
    pub max_raise_to: u32,
}

pub fn legal_actions(player: &Player, state: &HandState) -> LegalActions {
    LegalActions {
        fold: can_fold(),
        check: can_check(player, state),
        call: can_call(player, state),
        bet: can_bet(state) && player.stack > 0,
        raise: can_raise(player, state),
        all_in: can_all_in(player),
        call_amount: state.current_bet.saturating_sub(player.bet).min(player.stack),
        min_raise_to: min_raise_total(state),
        max_raise_to: player.bet + player.stack,
    }
}

/// Validates a player action against the betting rules of the current street.
///
/// Converts a [`crate::player::PlayerAction`] into a [`ValidatedAction`]
/// carrying the exact chip amounts the action engine will apply.
///
/// # Errors
///
/// - [`GameError::InvalidBetAmount`] - a bet or raise below the player's own bet,
///   not above the current bet, or under the minimum raise while not all-in
/// - [`GameError::InsufficientChips`] - the stack cannot cover the amount, or
///   an all-in with nothing behind
///
/// # Examples
///
/// ```
/// use holdem_engine::player::{Player, PlayerAction, Position};
/// use holdem_engine::rules::{validate_action, ValidatedAction};
/// use holdem_engine::state::HandState;
///
/// let mut state = HandState::default();
/// state.current_bet = 100;
/// let short = Player::new(3, 50, Position::Utg);
///
/// // Calling short is a capped call for whatever is left.
/// let result = validate_action(&short, &state, PlayerAction::CallOrCheck);
/// assert_eq!(result, Ok(ValidatedAction::Call(50)));
/// ```
pub fn validate_action(
    player: &Player,
    state: &HandState,
    action: A,
) -> Result<ValidatedAction, GameError> {
    match action {
        A::Fold => Ok(ValidatedAction::Fold),
        A::CallOrCheck => {
            let to_call = state.current_bet.saturating_sub(player.bet);
            if to_call == 0 {
                Ok(ValidatedAction::Check)
            } else {
                Ok(ValidatedAction::Call(to_call.min(player.stack)))
            }
        }
        A::BetOrRaise(amount) => {
            if amount <= player.bet {
                return Err(GameError::InvalidBetAmount {
                    amount,
                    minimum: player.bet + 1,
                });
            }
            if player.stack < amount - player.bet {
                return Err(GameError::InsufficientChips);
            }
            if state.current_bet == 0 {
                return Ok(ValidatedAction::Bet(amount));
            }
            let minimum = min_raise_total(state);
            let all_in = amount == player.bet + player.stack;
            if amount <= state.current_bet || (amount < minimum && !all_in) {
                return Err(GameError::InvalidBetAmount { amount, minimum });
            }
            Ok(ValidatedAction::Raise(amount))
        }
        A::AllIn => {
            if !can_all_in(player) {
                return Err(GameError::InsufficientChips);
            }
            Ok(ValidatedAction::AllIn(player.bet + player.stack))
        }
    }
}
