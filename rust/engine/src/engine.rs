use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::actions;
use crate::errors::GameError;
use crate::flow;
use crate::history::PersistedHand;
use crate::lifecycle::{self, MAX_SEATS};
use crate::narration;
use crate::player::PlayerAction;
use crate::state::{HandState, HistoryEntry, Stage, Stakes};

/// Everything the table UI can ask of the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Seats a fresh table with `stack` chips per player and deals a hand.
    StartNewHand { stack: u32 },
    /// Back to pregame, keeping the persisted hand history.
    Reset,
    AdvanceStage,
    Fold,
    CallOrCheck,
    /// Total street contribution to bet or raise to.
    BetOrRaise(u32),
    AllIn,
    RecordHandHistory(PersistedHand),
    SetHandHistory(Vec<PersistedHand>),
}

/// Table shape used for every hand the engine deals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    pub seats: usize,
    pub stakes: Stakes,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            seats: MAX_SEATS,
            stakes: Stakes::default(),
        }
    }
}

/// Single entry point for hand transitions.
///
/// The engine owns the table RNG and configuration; hand state lives with the
/// caller as immutable snapshots. Every command either produces a new
/// snapshot or is rejected in full.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use holdem_engine::engine::{Command, Engine, TableConfig};
/// use holdem_engine::state::Stage;
///
/// let mut engine = Engine::new(Some(12345), TableConfig::default());
/// let state = Arc::new(engine.initial_state(1_000));
///
/// let state = engine.dispatch(state, Command::StartNewHand { stack: 1_000 });
/// assert_eq!(state.stage, Stage::Preflop);
///
/// // A raise below the minimum is rejected and hands back the very same
/// // snapshot.
/// let rejected = engine.dispatch(state.clone(), Command::BetOrRaise(50));
/// assert!(Arc::ptr_eq(&state, &rejected));
/// ```
#[derive(Debug)]
pub struct Engine {
    rng: ChaCha20Rng,
    table: TableConfig,
}

impl Engine {
    /// `seed` makes shuffles and hand ids reproducible; `None` seeds from the
    /// thread RNG.
    pub fn new(seed: Option<u64>, table: TableConfig) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_rng(&mut rand::rng()),
        };
        Self { rng, table }
    }

    pub fn table(&self) -> TableConfig {
        self.table
    }

    /// Pregame snapshot for this table.
    pub fn initial_state(&self, stack: u32) -> HandState {
        HandState::initial(stack, self.table.stakes, Vec::new())
    }

    /// Applies `command`, returning the input `Arc` untouched when the command
    /// is illegal so callers can detect rejection with [`Arc::ptr_eq`].
    pub fn dispatch(&mut self, state: Arc<HandState>, command: Command) -> Arc<HandState> {
        match self.try_dispatch(&state, command.clone()) {
            Ok(next) => Arc::new(next),
            Err(err) => {
                tracing::debug!(
                    hand_id = state.hand_id.as_deref().unwrap_or_default(),
                    ?command,
                    reason = %err,
                    "command rejected"
                );
                state
            }
        }
    }

    pub fn try_dispatch(
        &mut self,
        state: &HandState,
        command: Command,
    ) -> Result<HandState, GameError> {
        let span = tracing::debug_span!(
            "hand",
            id = state.hand_id.as_deref().unwrap_or_default()
        );
        let _enter = span.enter();

        match command {
            Command::StartNewHand { stack } => self.start_new_hand(state, stack),
            Command::Reset => Ok(HandState::initial(
                state.initial_stack,
                self.table.stakes,
                state.hand_history.clone(),
            )),
            Command::AdvanceStage => self.advance(state),
            Command::RecordHandHistory(record) => {
                let mut next = state.clone();
                next.hand_history.push(record);
                Ok(next)
            }
            Command::SetHandHistory(records) => {
                let mut next = state.clone();
                next.hand_history = records;
                Ok(next)
            }
            Command::Fold => self.player_action(state, PlayerAction::Fold),
            Command::CallOrCheck => self.player_action(state, PlayerAction::CallOrCheck),
            Command::BetOrRaise(amount) => {
                self.player_action(state, PlayerAction::BetOrRaise(amount))
            }
            Command::AllIn => self.player_action(state, PlayerAction::AllIn),
        }
    }

    fn start_new_hand(&mut self, state: &HandState, stack: u32) -> Result<HandState, GameError> {
        let base = HandState::initial(stack, self.table.stakes, state.hand_history.clone());
        let mut next = lifecycle::setup_hand(&base, self.table.seats, stack, &mut self.rng)?;
        let lines = narration::setup_lines(&next);
        next.log(lines);
        Ok(next)
    }

    fn player_action(
        &mut self,
        state: &HandState,
        action: PlayerAction,
    ) -> Result<HandState, GameError> {
        let (mut next, entry) = actions::apply_action(state, action)?;
        next.action_history.push(entry);
        next.log(narration::action_line(state, action));
        self.resolve_after_action(next)
    }

    /// Ends the hand, closes the street or passes the turn.
    fn resolve_after_action(&mut self, mut next: HandState) -> Result<HandState, GameError> {
        if next.contenders().count() <= 1 {
            return Ok(Self::narrate_end(lifecycle::finish_hand(next)));
        }
        if flow::is_round_over(&next) {
            return self.advance(&next);
        }
        next.current_player = flow::next_actor(&next);
        Ok(next)
    }

    fn advance(&mut self, state: &HandState) -> Result<HandState, GameError> {
        let mut next = lifecycle::advance_stage(state)?;
        if next.stage == Stage::Showdown {
            return Ok(Self::narrate_end(next));
        }
        if let Some(HistoryEntry::Deal { stage, cards }) = next.action_history.last() {
            let lines = narration::street_lines(*stage, cards);
            next.log(lines);
        }
        Ok(next)
    }

    fn narrate_end(mut state: HandState) -> HandState {
        let mut lines = narration::showdown_lines(&state, &state.awards);
        lines.extend(narration::end_of_hand_lines(&state));
        state.log(lines);
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heads_up_engine() -> Engine {
        Engine::new(
            Some(1),
            TableConfig {
                seats: 2,
                stakes: Stakes {
                    small_blind: 10,
                    big_blind: 20,
                },
            },
        )
    }

    #[test]
    fn pregame_rejects_actions() {
        let mut engine = heads_up_engine();
        let state = Arc::new(engine.initial_state(1_000));
        for command in [
            Command::Fold,
            Command::CallOrCheck,
            Command::AllIn,
            Command::AdvanceStage,
        ] {
            let next = engine.dispatch(state.clone(), command);
            assert!(Arc::ptr_eq(&state, &next));
        }
    }

    #[test]
    fn reset_keeps_history_and_welcomes_again() {
        let mut engine = heads_up_engine();
        let state = Arc::new(engine.initial_state(1_000));
        let state = engine.dispatch(state, Command::StartNewHand { stack: 1_000 });
        let state = engine.dispatch(state, Command::Fold);
        assert_eq!(state.stage, Stage::Showdown);
        let state = engine.dispatch(state, Command::Reset);
        assert_eq!(state.stage, Stage::Pregame);
        assert_eq!(state.logs[0].message, "Welcome to Poker Simulator!");
        assert_eq!(state.initial_stack, 1_000);
    }
}
