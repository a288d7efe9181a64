//! # holdem-engine: No-Limit Hold'em Hand Engine
//!
//! A deterministic rules-and-state core that carries one hand of No-Limit
//! Texas Hold'em for two to six seats, from blind posting through showdown.
//! Every transition returns a new immutable [`state::HandState`] snapshot and
//! appends to a replayable action history and a human-readable narration log.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and two-character codes
//! - [`deck`] - 52-card deck with uniform shuffling and index-advance dealing
//! - [`player`] - Seats, positions, statuses and player actions
//! - [`state`] - Hand snapshot, stages, stakes, history and log entries
//! - [`rules`] - Betting legality predicates and minimum-raise sizing
//! - [`flow`] - Turn order and betting-round closure
//! - [`actions`] - Applies fold, check/call, bet/raise and all-in
//! - [`lifecycle`] - Hand setup, street advancement and pot award
//! - [`hand`] - Hand evaluation for contested showdowns
//! - [`narration`] - Log lines for every transition
//! - [`engine`] - Command dispatch, the single entry point for callers
//! - [`summary`] - Finished-hand summary and action codes
//! - [`history`] - Hand history collaborator and at-most-once recording
//! - [`replay`] - Replays a summary to validate and score it
//! - [`errors`] - Error types for game, history and replay operations
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use holdem_engine::engine::{Command, Engine, TableConfig};
//! use holdem_engine::state::{Stage, Stakes};
//!
//! let table = TableConfig {
//!     seats: 2,
//!     stakes: Stakes { small_blind: 10, big_blind: 20 },
//! };
//! let mut engine = Engine::new(Some(42), table);
//! let state = Arc::new(engine.initial_state(1_000));
//!
//! let state = engine.dispatch(state, Command::StartNewHand { stack: 1_000 });
//! let state = engine.dispatch(state, Command::BetOrRaise(60));
//! let state = engine.dispatch(state, Command::Fold);
//!
//! assert_eq!(state.stage, Stage::Showdown);
//! assert_eq!(state.pot, 80);
//! assert!(state.logs.iter().any(|l| l.message.ends_with("wins the pot of 80")));
//! ```
//!
//! ## Deterministic Gameplay
//!
//! Seeding the engine makes shuffles and hand ids reproducible:
//!
//! ```rust
//! use holdem_engine::engine::{Command, Engine, TableConfig};
//!
//! let mut a = Engine::new(Some(7), TableConfig::default());
//! let mut b = Engine::new(Some(7), TableConfig::default());
//! let start = a.initial_state(10_000);
//! let ha = a.try_dispatch(&start, Command::StartNewHand { stack: 10_000 }).unwrap();
//! let hb = b.try_dispatch(&start, Command::StartNewHand { stack: 10_000 }).unwrap();
//! assert_eq!(ha.players, hb.players);
//! ```

pub mod actions;
pub mod cards;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod flow;
pub mod hand;
pub mod history;
pub mod lifecycle;
pub mod narration;
pub mod player;
pub mod replay;
pub mod rules;
pub mod state;
pub mod summary;
