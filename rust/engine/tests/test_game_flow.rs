use std::sync::Arc;

use holdem_engine::engine::{Command, Engine, TableConfig};
use holdem_engine::flow::{is_round_over, next_actor, should_auto_advance};
use holdem_engine::player::PlayerStatus;
use holdem_engine::state::{HandState, HistoryEntry, Stage, Stakes};

fn engine(seats: usize) -> Engine {
    Engine::new(
        Some(99),
        TableConfig {
            seats,
            stakes: Stakes {
                small_blind: 10,
                big_blind: 20,
            },
        },
    )
}

fn start(engine: &mut Engine, stack: u32) -> Arc<HandState> {
    let state = Arc::new(engine.initial_state(stack));
    engine.dispatch(state, Command::StartNewHand { stack })
}

fn act(engine: &mut Engine, state: &Arc<HandState>, command: Command) -> Arc<HandState> {
    let next = engine.dispatch(state.clone(), command.clone());
    assert!(!Arc::ptr_eq(state, &next), "{command:?} was rejected");
    next
}

#[test]
fn heads_up_dealer_acts_first_preflop_and_last_postflop() {
    let mut eng = engine(2);
    let s = start(&mut eng, 1_000);
    assert_eq!(s.current_player, Some(0), "dealer posts the small blind and opens");

    let s = act(&mut eng, &s, Command::CallOrCheck);
    assert_eq!(s.stage, Stage::Preflop, "big blind still has the option");
    assert_eq!(s.current_player, Some(1));

    let s = act(&mut eng, &s, Command::CallOrCheck);
    assert_eq!(s.stage, Stage::Flop);
    assert_eq!(s.community_cards.len(), 3);
    assert_eq!(s.current_player, Some(1), "big blind acts first after the flop");
    assert_eq!(s.current_bet, 0);
    assert_eq!(s.last_raise_amount, 0);
    assert!(s.players.iter().all(|p| p.bet == 0 && !p.has_acted));
    assert_eq!(s.pot, 40);
}

#[test]
fn big_blind_raise_reopens_limpers() {
    let mut eng = engine(3);
    let s = start(&mut eng, 1_000);
    assert_eq!(s.current_player, Some(0));
    let s = act(&mut eng, &s, Command::CallOrCheck); // dealer limps
    let s = act(&mut eng, &s, Command::CallOrCheck); // small blind completes
    assert_eq!(s.current_player, Some(2));
    assert!(!is_round_over(&s));

    let s = act(&mut eng, &s, Command::BetOrRaise(60));
    assert_eq!(s.stage, Stage::Preflop);
    assert!(!s.players[0].has_acted && !s.players[1].has_acted);
    assert_eq!(s.current_player, Some(0));

    let s = act(&mut eng, &s, Command::CallOrCheck);
    let s = act(&mut eng, &s, Command::CallOrCheck);
    assert_eq!(s.stage, Stage::Flop);
    assert_eq!(s.pot, 180);
    assert_eq!(s.current_player, Some(1), "first seat left of the dealer");
}

#[test]
fn each_street_burns_one_card_then_deals() {
    let mut eng = engine(2);
    let s = start(&mut eng, 1_000);
    let s = act(&mut eng, &s, Command::CallOrCheck);
    let upcoming: Vec<_> = s.deck.cards().to_vec();
    let s = act(&mut eng, &s, Command::CallOrCheck);
    assert_eq!(s.community_cards, upcoming[1..4]);
    assert_eq!(s.deck.remaining(), upcoming.len() - 4);

    let upcoming: Vec<_> = s.deck.cards().to_vec();
    let s = eng.dispatch(s, Command::AdvanceStage);
    assert_eq!(s.stage, Stage::Turn);
    assert_eq!(s.community_cards[3], upcoming[1]);
    match s.action_history.last() {
        Some(HistoryEntry::Deal { stage, cards }) => {
            assert_eq!(*stage, Stage::Turn);
            assert_eq!(cards.as_slice(), &upcoming[1..2]);
        }
        other => panic!("expected a deal entry, got {other:?}"),
    }
}

#[test]
fn stage_never_regresses_and_showdown_is_terminal() {
    let mut eng = engine(4);
    let mut s = start(&mut eng, 1_000);
    let mut last = s.stage;
    while s.stage != Stage::Showdown {
        s = eng.dispatch(s, Command::AdvanceStage);
        assert!(s.stage > last);
        last = s.stage;
    }
    assert!(s.current_player.is_none());
    assert_eq!(s.community_cards.len(), 5);
    let again = eng.dispatch(s.clone(), Command::AdvanceStage);
    assert!(Arc::ptr_eq(&s, &again));
}

#[test]
fn round_stays_open_while_anyone_active_has_not_acted() {
    let mut eng = engine(3);
    let mut s = (*start(&mut eng, 1_000)).clone();
    for p in s.players.iter_mut() {
        p.bet = s.current_bet;
        p.has_acted = true;
    }
    assert!(is_round_over(&s));
    s.players[2].has_acted = false;
    assert!(!is_round_over(&s));
    s.players[2].status = PlayerStatus::Folded;
    assert!(is_round_over(&s));
}

#[test]
fn everyone_all_in_waits_for_external_advance() {
    let mut eng = engine(2);
    let s = start(&mut eng, 1_000);
    let s = act(&mut eng, &s, Command::AllIn);
    let s = act(&mut eng, &s, Command::CallOrCheck);
    assert_eq!(s.stage, Stage::Flop);
    assert_eq!(s.current_player, None);
    assert_eq!(next_actor(&s), None);
    assert!(should_auto_advance(&s));

    let mut s = s;
    while s.stage != Stage::Showdown {
        s = eng.dispatch(s, Command::AdvanceStage);
    }
    assert_eq!(s.pot, 2_000);
    let total: u32 = s.players.iter().map(|p| p.stack).sum();
    assert_eq!(total, 2_000);
}
