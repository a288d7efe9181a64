use std::collections::{BTreeMap, HashSet};
use std::fs::{create_dir_all, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::HistoryError;
use crate::lifecycle::new_hand_id;
use crate::replay::replay;
use crate::state::{HandState, Stage};
use crate::summary::{summarize, HandSummary, SummaryPlayer, TableConfigSummary};

/// A finished hand as stored by the history collaborator, scored by replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedHand {
    pub id: String,
    /// RFC 3339, UTC
    pub timestamp: String,
    pub players: Vec<SummaryPlayer>,
    pub actions: Vec<String>,
    pub board: Vec<String>,
    pub pot: u32,
    pub config: TableConfigSummary,
    /// Net chips per player id.
    pub winnings: BTreeMap<String, i64>,
}

impl PersistedHand {
    /// The summary this record was scored from.
    pub fn summary(&self) -> HandSummary {
        HandSummary {
            players: self.players.clone(),
            actions: self.actions.clone(),
            config: self.config,
        }
    }
}

/// Validates `summary` by replaying it and builds the record to store.
pub fn score(summary: &HandSummary) -> Result<PersistedHand, HistoryError> {
    if summary.config.ante != 0 {
        return Err(HistoryError::InvalidSummary(format!(
            "antes are not supported (got {})",
            summary.config.ante
        )));
    }
    let outcome = replay(summary)?;
    Ok(PersistedHand {
        id: new_hand_id(&mut rand::rng()),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        players: summary.players.clone(),
        actions: summary.actions.clone(),
        board: outcome.board.iter().map(ToString::to_string).collect(),
        pot: outcome.pot,
        config: summary.config,
        winnings: outcome.winnings,
    })
}

/// Save/fetch service for finished hands.
pub trait HandHistoryClient: Send + Sync {
    fn save(&self, summary: &HandSummary) -> Result<PersistedHand, HistoryError>;
    /// Stored hands, newest first.
    fn fetch(&self) -> Result<Vec<PersistedHand>, HistoryError>;
}

/// Process-local history store
#[derive(Debug, Default)]
pub struct InMemoryHistory {
    hands: RwLock<Vec<PersistedHand>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HandHistoryClient for InMemoryHistory {
    fn save(&self, summary: &HandSummary) -> Result<PersistedHand, HistoryError> {
        let record = score(summary)?;
        let mut hands = self
            .hands
            .write()
            .map_err(|_| HistoryError::StoragePoisoned)?;
        hands.push(record.clone());
        Ok(record)
    }

    fn fetch(&self) -> Result<Vec<PersistedHand>, HistoryError> {
        let hands = self
            .hands
            .read()
            .map_err(|_| HistoryError::StoragePoisoned)?;
        Ok(hands.iter().rev().cloned().collect())
    }
}

/// Append-only JSON Lines file, one record per line.
#[derive(Debug)]
pub struct JsonlHistory {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlHistory {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, record: &PersistedHand) -> Result<(), HistoryError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| HistoryError::StoragePoisoned)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        file.flush()?;
        Ok(())
    }
}

impl HandHistoryClient for JsonlHistory {
    fn save(&self, summary: &HandSummary) -> Result<PersistedHand, HistoryError> {
        let record = score(summary)?;
        self.append(&record)?;
        Ok(record)
    }

    fn fetch(&self) -> Result<Vec<PersistedHand>, HistoryError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut hands = Vec::new();
        for (n, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<PersistedHand>(line) {
                Ok(hand) => hands.push(hand),
                Err(e) => tracing::warn!(
                    path = %self.path.display(),
                    line = n + 1,
                    error = %e,
                    "skipping corrupt hand history line"
                ),
            }
        }
        hands.reverse();
        Ok(hands)
    }
}

/// Saves each finished hand at most once.
///
/// Recording is best effort: failures are logged and reported as `None`, and
/// the hand state is never touched.
pub struct HistoryRecorder {
    client: Arc<dyn HandHistoryClient>,
    seen: Mutex<HashSet<String>>,
}

impl HistoryRecorder {
    pub fn new(client: Arc<dyn HandHistoryClient>) -> Self {
        Self {
            client,
            seen: Mutex::new(HashSet::new()),
        }
    }

    pub fn client(&self) -> &dyn HandHistoryClient {
        self.client.as_ref()
    }

    /// Saves `state` if it is a finished hand not seen before.
    pub fn record(&self, state: &HandState) -> Option<PersistedHand> {
        if state.stage != Stage::Showdown {
            return None;
        }
        let hand_id = state.hand_id.as_deref()?;
        {
            let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
            if !seen.insert(hand_id.to_string()) {
                return None;
            }
        }

        let summary = summarize(state)?;
        match self.client.save(&summary) {
            Ok(record) => {
                tracing::info!(hand_id, record_id = %record.id, pot = record.pot, "hand saved");
                Some(record)
            }
            Err(e) => {
                tracing::warn!(hand_id, error = %e, "failed to save hand history");
                None
            }
        }
    }
}
