//! Hand setup, street advancement and the end-of-hand pot award.

use rand::Rng;

use crate::deck::Deck;
use crate::errors::GameError;
use crate::flow;
use crate::hand::{evaluate_hand, HandStrength};
use crate::player::{Player, Position, SeatId};
use crate::state::{Award, HandState, HistoryEntry, Stage};

pub const MIN_SEATS: usize = 2;
pub const MAX_SEATS: usize = 6;

/// Seats a fresh table of `seats` players with `stack` chips each, shuffles
/// a new deck, deals hole cards and posts the blinds.
///
/// Stakes and the persisted hand history are carried over from `base`.
pub fn setup_hand<R: Rng + ?Sized>(
    base: &HandState,
    seats: usize,
    stack: u32,
    rng: &mut R,
) -> Result<HandState, GameError> {
    if !(MIN_SEATS..=MAX_SEATS).contains(&seats) {
        return Err(GameError::InvalidSetup(format!(
            "table needs {MIN_SEATS} to {MAX_SEATS} seats, got {seats}"
        )));
    }
    if stack < base.stakes.big_blind {
        return Err(GameError::InvalidSetup(format!(
            "starting stack {stack} is below the big blind {}",
            base.stakes.big_blind
        )));
    }
    if u32::try_from(seats)
        .ok()
        .and_then(|n| n.checked_mul(stack))
        .is_none()
    {
        return Err(GameError::InvalidSetup(format!(
            "{seats} stacks of {stack} exceed the largest pot"
        )));
    }

    let mut deck = Deck::new();
    deck.shuffle(rng);

    let mut players = Vec::with_capacity(seats);
    for (seat, position) in Position::layout(seats).into_iter().enumerate() {
        let hole = deck
            .deal(2)
            .ok_or_else(|| GameError::InvalidSetup("deck exhausted while dealing".into()))?;
        let mut player = Player::new(seat, stack, position);
        player.cards = Some([hole[0], hole[1]]);
        players.push(player);
    }

    let template = HandState::initial(stack, base.stakes, base.hand_history.clone());
    start_hand(template, new_hand_id(rng), players, deck)
}

/// Random (version 4) hand id drawn from the table RNG, so seeded tables
/// produce reproducible ids.
pub fn new_hand_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes);
    uuid::Builder::from_random_bytes(bytes)
        .into_uuid()
        .to_string()
}

/// Posts blinds for already-seated `players` and opens preflop betting.
///
/// `template` supplies stakes, initial stack and hand history; its logs are
/// dropped. Blind posters keep `has_acted == false` so they get their option.
pub fn start_hand(
    template: HandState,
    hand_id: String,
    players: Vec<Player>,
    deck: Deck,
) -> Result<HandState, GameError> {
    if players
        .iter()
        .try_fold(0u32, |total, p| total.checked_add(p.stack))
        .is_none()
    {
        return Err(GameError::InvalidSetup(
            "table chips exceed the largest pot".into(),
        ));
    }

    let mut state = template;
    state.logs.clear();
    state.hand_id = Some(hand_id);
    state.initial_players = players.clone();
    state.players = players;
    state.deck = deck;

    let sb = state
        .small_blind_seat()
        .map(|p| p.id)
        .ok_or_else(|| GameError::InvalidSetup("no small blind seat".into()))?;
    let bb = state
        .big_blind_seat()
        .map(|p| p.id)
        .ok_or_else(|| GameError::InvalidSetup("no big blind seat".into()))?;

    let stakes = state.stakes;
    let sb_paid = state.players[sb].commit(stakes.small_blind);
    let bb_paid = state.players[bb].commit(stakes.big_blind);

    state.pot = sb_paid + bb_paid;
    state.current_bet = state.players.iter().map(|p| p.bet).max().unwrap_or(0);
    state.last_raiser = Some(bb);
    state.last_raise_amount = 0;
    state.stage = Stage::Preflop;
    state.current_player = flow::next_actor_after(&state, bb);

    tracing::info!(
        hand_id = state.hand_id.as_deref().unwrap_or_default(),
        seats = state.players.len(),
        pot = state.pot,
        "hand started"
    );
    Ok(state)
}

/// Moves to the next stage. Entering a new street burns one card, deals the
/// street and reopens betting from the seat left of the dealer; entering
/// showdown awards the pot.
pub fn advance_stage(state: &HandState) -> Result<HandState, GameError> {
    match state.stage {
        Stage::Pregame => return Err(GameError::NoHandInProgress),
        Stage::Showdown => return Err(GameError::WrongStage(Stage::Showdown)),
        _ => {}
    }

    let mut next = state.clone();
    let stage = state.stage.next();
    next.stage = stage;
    if stage == Stage::Showdown {
        return Ok(finish_hand(next));
    }

    if !next.deck.is_empty() {
        next.deck.burn();
    }
    let dealt = next.deck.deal(stage.cards_dealt()).unwrap_or_default();
    next.community_cards.extend_from_slice(&dealt);

    for p in next.players.iter_mut() {
        p.bet = 0;
        if p.is_active() {
            p.has_acted = false;
        }
    }
    next.current_bet = 0;
    next.last_raiser = None;
    next.last_raise_amount = 0;
    next.current_player = next
        .dealer_seat()
        .map(|d| d.id)
        .and_then(|dealer| flow::next_actor_after(&next, dealer));
    next.action_history.push(HistoryEntry::Deal {
        stage,
        cards: dealt,
    });

    tracing::info!(
        stage = stage.title(),
        board = %crate::cards::format_cards(&next.community_cards),
        "street dealt"
    );
    Ok(next)
}

/// Ends the hand: stage becomes showdown, the pot is paid out and every street
/// bet is cleared. `pot` keeps the awarded total.
pub fn finish_hand(mut state: HandState) -> HandState {
    state.stage = Stage::Showdown;
    state.current_player = None;

    let contenders: Vec<SeatId> = state.contenders().map(|p| p.id).collect();
    let awards = match contenders.as_slice() {
        [] => Vec::new(),
        [winner] => vec![Award {
            seat: *winner,
            amount: state.pot,
            category: None,
        }],
        _ => split_pot(&state, &contenders),
    };

    for award in &awards {
        state.players[award.seat].stack += award.amount;
    }
    for p in state.players.iter_mut() {
        p.bet = 0;
    }
    state.awards = awards;

    tracing::info!(
        hand_id = state.hand_id.as_deref().unwrap_or_default(),
        pot = state.pot,
        winners = ?state.awards.iter().map(|a| a.seat).collect::<Vec<_>>(),
        "pot awarded"
    );
    state
}

/// Seats in payout order, starting left of the dealer.
fn seats_from_dealer(state: &HandState) -> Vec<SeatId> {
    let n = state.players.len();
    let dealer = state.dealer_seat().map(|p| p.id).unwrap_or(0);
    (1..=n).map(|offset| (dealer + offset) % n).collect()
}

/// Evaluates contenders and splits the single pot among the best hands. Odd
/// chips go one at a time in seat order from the left of the dealer. When a
/// hand cannot be made (fewer than five cards) the pot is split among all
/// contenders.
fn split_pot(state: &HandState, contenders: &[SeatId]) -> Vec<Award> {
    let strengths: Vec<(SeatId, Option<HandStrength>)> = contenders
        .iter()
        .map(|&seat| {
            let strength = state.players[seat].cards.and_then(|hole| {
                let mut cards = hole.to_vec();
                cards.extend_from_slice(&state.community_cards);
                evaluate_hand(&cards)
            });
            (seat, strength)
        })
        .collect();

    let winners: Vec<(SeatId, Option<HandStrength>)> =
        if strengths.iter().all(|(_, s)| s.is_some()) {
            let best = strengths.iter().filter_map(|(_, s)| s.as_ref()).max().cloned();
            strengths
                .into_iter()
                .filter(|(_, s)| s.as_ref() == best.as_ref())
                .collect()
        } else {
            strengths.into_iter().map(|(seat, _)| (seat, None)).collect()
        };

    let ordered: Vec<(SeatId, Option<HandStrength>)> = seats_from_dealer(state)
        .into_iter()
        .filter_map(|seat| winners.iter().find(|(w, _)| *w == seat).cloned())
        .collect();

    let count = ordered.len() as u32;
    let share = state.pot / count;
    let mut odd = state.pot % count;
    ordered
        .into_iter()
        .map(|(seat, strength)| {
            let extra = u32::from(odd > 0);
            odd -= extra;
            Award {
                seat,
                amount: share + extra,
                category: strength.map(|s| s.category),
            }
        })
        .collect()
}
