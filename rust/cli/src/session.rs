//! A table at the terminal: the current hand snapshot, the engine that
//! transforms it, best-effort history recording and the auto-advance timer.

use std::sync::Arc;
use std::time::Duration;

use holdem_engine::engine::{Command, Engine};
use holdem_engine::flow::should_auto_advance;
use holdem_engine::history::{HistoryRecorder, PersistedHand};
use holdem_engine::state::HandState;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// What happened to a command sent to the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Illegal right now; the snapshot is unchanged.
    Rejected,
    Applied,
    /// Applied, and the hand it finished was saved.
    Saved(PersistedHand),
}

pub struct TableSession {
    engine: Engine,
    state: Arc<HandState>,
    stack: u32,
    recorder: HistoryRecorder,
    /// Log lines of the current snapshot already handed out.
    narrated: usize,
    /// Bumped on every applied command.
    generation: u64,
    hands_started: u32,
}

impl TableSession {
    pub fn new(engine: Engine, stack: u32, recorder: HistoryRecorder) -> Self {
        let state = Arc::new(engine.initial_state(stack));
        Self {
            engine,
            state,
            stack,
            recorder,
            narrated: 0,
            generation: 0,
            hands_started: 0,
        }
    }

    pub fn state(&self) -> &Arc<HandState> {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn hands_started(&self) -> u32 {
        self.hands_started
    }

    /// Loads previously stored hands into the snapshot. A failing store
    /// leaves the history empty.
    pub fn load_history(&mut self) {
        match self.recorder.client().fetch() {
            Ok(records) => {
                tracing::debug!(count = records.len(), "hand history loaded");
                self.apply(Command::SetHandHistory(records));
            }
            Err(e) => tracing::warn!(error = %e, "failed to load hand history"),
        }
    }

    pub fn new_hand(&mut self) -> Outcome {
        self.apply(Command::StartNewHand { stack: self.stack })
    }

    pub fn apply(&mut self, command: Command) -> Outcome {
        let replaces_log = matches!(command, Command::StartNewHand { .. } | Command::Reset);
        let starts_hand = matches!(command, Command::StartNewHand { .. });
        let next = self.engine.dispatch(Arc::clone(&self.state), command);
        if Arc::ptr_eq(&next, &self.state) {
            return Outcome::Rejected;
        }
        if replaces_log {
            self.narrated = 0;
        }
        if starts_hand {
            self.hands_started += 1;
        }
        self.state = next;
        self.generation += 1;

        match self.recorder.record(&self.state) {
            Some(record) => {
                self.state = self.engine.dispatch(
                    Arc::clone(&self.state),
                    Command::RecordHandHistory(record.clone()),
                );
                Outcome::Saved(record)
            }
            None => Outcome::Applied,
        }
    }

    /// Narration lines added since the last call.
    pub fn take_narration(&mut self) -> Vec<String> {
        let logs = &self.state.logs;
        let start = self.narrated.min(logs.len());
        self.narrated = logs.len();
        logs[start..].iter().map(|l| l.message.clone()).collect()
    }

    /// Betting is closed and nobody can act, so the next street should be
    /// dealt without input.
    pub fn wants_auto_advance(&self) -> bool {
        should_auto_advance(&self.state)
    }
}

/// Cancellable one-shot timer that requests an `AdvanceStage`.
///
/// Each arm is tagged with the session generation it was scheduled for; the
/// tag comes back on the channel when the delay elapses. Re-arming or
/// cancelling aborts the pending task.
pub struct AutoAdvanceTimer {
    delay: Duration,
    pending: Option<(u64, JoinHandle<()>)>,
    fired: mpsc::UnboundedSender<u64>,
}

impl AutoAdvanceTimer {
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<u64>) {
        let (fired, rx) = mpsc::unbounded_channel();
        (
            Self {
                delay,
                pending: None,
                fired,
            },
            rx,
        )
    }

    /// Cancels any pending timer and, when `arm` is set, schedules a new one
    /// for `generation`. Must be called inside a tokio runtime.
    pub fn reschedule(&mut self, generation: u64, arm: bool) {
        if self
            .pending
            .as_ref()
            .is_some_and(|(pending, _)| *pending == generation && arm)
        {
            return;
        }
        self.cancel();
        if !arm {
            return;
        }
        let tx = self.fired.clone();
        let delay = self.delay;
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(generation);
        });
        tracing::debug!(
            generation,
            delay_ms = delay.as_millis() as u64,
            "auto-advance scheduled"
        );
        self.pending = Some((generation, task));
    }

    pub fn cancel(&mut self) {
        if let Some((generation, task)) = self.pending.take() {
            task.abort();
            tracing::debug!(generation, "auto-advance cancelled");
        }
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Consumes a fired tag; true when it belongs to the live timer.
    pub fn take_fired(&mut self, generation: u64) -> bool {
        match &self.pending {
            Some((pending, _)) if *pending == generation => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }
}

impl Drop for AutoAdvanceTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
