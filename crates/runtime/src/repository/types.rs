//! Persisted run snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use game_core::{
    ConfigurationError, GameConfig, GenerationOptions, RunEvent, RunState, compute_events_root,
    compute_map_root, generate_map,
};

use super::error::{RepositoryError, Result};

/// A saved run.
///
/// The event log is the source of truth; `snapshot` lets a loader resume
/// without replaying, and the two roots let it prove the log and map were
/// not altered.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveGame {
    pub slot: String,
    pub saved_at: DateTime<Utc>,
    pub options: GenerationOptions,
    pub config: GameConfig,
    pub events: Vec<RunEvent>,
    pub snapshot: RunState,
    /// Root of the freshly generated map, before any status change.
    pub map_root: [u8; 32],
    pub events_root: [u8; 32],
}

impl SaveGame {
    /// Captures `state` together with the log that produced it.
    pub fn capture(
        slot: impl Into<String>,
        state: &RunState,
        events: &[RunEvent],
    ) -> std::result::Result<Self, ConfigurationError> {
        let map = generate_map(state.options())?;

        Ok(Self {
            slot: slot.into(),
            saved_at: Utc::now(),
            options: state.options().clone(),
            config: state.config().clone(),
            events: events.to_vec(),
            snapshot: state.clone(),
            map_root: compute_map_root(&map),
            events_root: compute_events_root(events),
        })
    }

    pub fn seed(&self) -> u64 {
        self.options.seed
    }

    pub fn nonce(&self) -> u64 {
        self.snapshot.nonce()
    }

    /// Regenerates the map, replays the log and checks both against the
    /// stored roots and snapshot. Returns the replayed state.
    pub fn verify(&self) -> Result<RunState> {
        let map = generate_map(&self.options)
            .map_err(|e| RepositoryError::CorruptedData(e.to_string()))?;
        if compute_map_root(&map) != self.map_root {
            return Err(RepositoryError::CorruptedData(format!(
                "map root mismatch for seed {}",
                self.seed()
            )));
        }

        if compute_events_root(&self.events) != self.events_root {
            return Err(RepositoryError::CorruptedData(
                "event log does not match its root".to_string(),
            ));
        }

        let replayed = RunState::replay(self.config.clone(), self.options.clone(), &self.events)
            .map_err(|e| RepositoryError::CorruptedData(e.to_string()))?;
        if replayed != self.snapshot {
            return Err(RepositoryError::CorruptedData(format!(
                "replaying {} events does not reproduce the snapshot",
                self.events.len()
            )));
        }

        Ok(replayed)
    }
}
