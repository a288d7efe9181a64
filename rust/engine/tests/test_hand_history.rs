use std::fs;
use std::sync::{Arc, Mutex};

use holdem_engine::engine::{Command, Engine, TableConfig};
use holdem_engine::errors::HistoryError;
use holdem_engine::history::{
    HandHistoryClient, HistoryRecorder, InMemoryHistory, JsonlHistory, PersistedHand,
};
use holdem_engine::state::{HandState, Stage, Stakes};
use holdem_engine::summary::{summarize, HandSummary};
use tracing::Level;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::{Layer, Registry};

/// Collects WARN messages emitted while a closure runs.
#[derive(Clone, Default)]
struct WarnCapture(Arc<Mutex<Vec<String>>>);

impl<S: tracing::Subscriber> Layer<S> for WarnCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() != Level::WARN {
            return;
        }
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        self.0.lock().unwrap().push(visitor.0);
    }
}

struct MessageVisitor(String);

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{:?}", value);
        }
    }
}

fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, Vec<String>) {
    let capture = WarnCapture::default();
    let registry = Registry::default().with(capture.clone());
    let out = tracing::subscriber::with_default(registry, f);
    let messages = capture.0.lock().unwrap().clone();
    (out, messages)
}

/// Three-handed hand: dealer raises, small blind folds, big blind calls, then
/// checked down to showdown.
fn finished_hand() -> HandState {
    let mut eng = Engine::new(
        Some(31),
        TableConfig {
            seats: 3,
            stakes: Stakes {
                small_blind: 10,
                big_blind: 20,
            },
        },
    );
    let mut s = eng.initial_state(500);
    for command in [
        Command::StartNewHand { stack: 500 },
        Command::BetOrRaise(60),
        Command::Fold,
        Command::CallOrCheck,
    ] {
        s = eng.try_dispatch(&s, command).unwrap();
    }
    while s.stage != Stage::Showdown {
        s = eng.try_dispatch(&s, Command::CallOrCheck).unwrap();
    }
    s
}

#[test]
fn summary_flattens_actions_and_deals() {
    let state = finished_hand();
    let summary = summarize(&state).unwrap();
    assert_eq!(summary.players.len(), 3);
    assert_eq!(summary.players[0].id, "player-0");
    assert_eq!(summary.players[0].starting_stack, 500);
    assert_eq!(summary.players[1].cards.as_ref().map(Vec::len), Some(2));
    assert_eq!(summary.config.sb, 10);
    assert_eq!(summary.config.bb, 20);
    assert_eq!(summary.config.ante, 0);

    let a = &summary.actions;
    assert_eq!(&a[..3], &["r60", "f", "c"]);
    assert_eq!(a[3].len(), 6, "flop codes");
    assert_eq!(&a[4..6], &["x", "x"]);
    assert_eq!(a[6].len(), 2, "turn code");
    assert_eq!(a.len(), 3 + 1 + 2 + 1 + 2 + 1 + 2);
}

#[test]
fn summary_serializes_with_snake_case_fields() {
    let summary = summarize(&finished_hand()).unwrap();
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["players"][0]["position"], "dealer");
    assert_eq!(json["players"][1]["position"], "smallblind");
    assert_eq!(json["players"][0]["starting_stack"], 500);
    let back: HandSummary = serde_json::from_value(json).unwrap();
    assert_eq!(back, summary);
}

#[test]
fn saving_scores_the_hand() {
    let state = finished_hand();
    let store = InMemoryHistory::new();
    let record = store.save(&summarize(&state).unwrap()).unwrap();
    assert_eq!(record.pot, state.pot);
    assert_eq!(record.board.len(), 5);
    assert_eq!(record.winnings.values().sum::<i64>(), 0);
    for (seat, p) in state.players.iter().enumerate() {
        let net = i64::from(p.stack) - i64::from(state.initial_players[seat].stack);
        assert_eq!(record.winnings[&format!("player-{seat}")], net);
    }
}

#[test]
fn jsonl_store_appends_lf_lines_and_reads_newest_first() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("hands.jsonl");
    let store = JsonlHistory::new(&path);
    assert!(store.fetch().unwrap().is_empty());

    let summary = summarize(&finished_hand()).unwrap();
    let first = store.save(&summary).unwrap();
    let second = store.save(&summary).unwrap();

    let bytes = fs::read(&path).unwrap();
    assert!(bytes.ends_with(b"\n"));
    assert!(!bytes.contains(&b'\r'));
    assert_eq!(bytes.iter().filter(|&&b| b == b'\n').count(), 2);

    assert_eq!(store.fetch().unwrap(), vec![second, first]);
}

#[test]
fn jsonl_store_skips_corrupt_lines_with_warning() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hands.jsonl");
    let store = JsonlHistory::new(&path);
    let saved = store.save(&summarize(&finished_hand()).unwrap()).unwrap();
    let mut content = fs::read_to_string(&path).unwrap();
    content.push_str("{not json\n");
    fs::write(&path, content).unwrap();

    let (fetched, warnings) = capture_warnings(|| store.fetch().unwrap());
    assert_eq!(fetched, vec![saved]);
    assert_eq!(warnings, vec!["skipping corrupt hand history line".to_string()]);
}

#[test]
fn recorder_saves_each_hand_at_most_once() {
    let store = Arc::new(InMemoryHistory::new());
    let recorder = HistoryRecorder::new(store.clone());
    let state = finished_hand();

    let record = recorder.record(&state);
    assert!(record.is_some());
    assert!(recorder.record(&state).is_none());
    assert_eq!(store.fetch().unwrap().len(), 1);
}

#[test]
fn recorder_ignores_unfinished_hands() {
    let recorder = HistoryRecorder::new(Arc::new(InMemoryHistory::new()));
    let mut eng = Engine::new(Some(1), TableConfig::default());
    let s = eng
        .try_dispatch(&eng.initial_state(1_000), Command::StartNewHand { stack: 1_000 })
        .unwrap();
    assert!(recorder.record(&s).is_none());
    assert!(recorder.record(&HandState::default()).is_none());
}

struct Unavailable;

impl HandHistoryClient for Unavailable {
    fn save(&self, _: &HandSummary) -> Result<PersistedHand, HistoryError> {
        Err(HistoryError::Io(std::io::Error::other("connection refused")))
    }

    fn fetch(&self) -> Result<Vec<PersistedHand>, HistoryError> {
        Ok(Vec::new())
    }
}

#[test]
fn recorder_failures_are_logged_not_raised() {
    let recorder = HistoryRecorder::new(Arc::new(Unavailable));
    let state = finished_hand();
    let before = state.clone();

    let (record, warnings) = capture_warnings(|| recorder.record(&state));
    assert!(record.is_none());
    assert_eq!(warnings, vec!["failed to save hand history".to_string()]);
    assert_eq!(state, before);
    // Still at most once, even after a failure.
    assert!(recorder.record(&state).is_none());
}
