//! Whole-state exchange between peers sharing one game. The transport is
//! someone else's problem; this side only encodes, filters echoes and
//! decides when a local change should go out.

use crate::{GameState, StateError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("snapshot encode failed: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("snapshot decode failed: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("snapshot rejected: {0}")]
    Invalid(#[source] StateError),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    pub sender: String,
    pub state: GameState,
}

impl Snapshot {
    pub fn encode(&self) -> Result<String, SyncError> {
        serde_json::to_string(self).map_err(SyncError::Encode)
    }

    pub fn decode(payload: &str) -> Result<Self, SyncError> {
        serde_json::from_str(payload).map_err(SyncError::Decode)
    }
}

/// One participant. Remote snapshots replace the local state outright and
/// the broadcast that would echo them back is swallowed once.
#[derive(Debug, Clone)]
pub struct SyncPeer {
    local_id: String,
    suppress_next: bool,
}

impl SyncPeer {
    pub fn new(local_id: impl Into<String>) -> Self {
        Self {
            local_id: local_id.into(),
            suppress_next: false,
        }
    }

    pub fn local_id(&self) -> &str {
        &self.local_id
    }

    /// Encoded snapshot to broadcast after a local change, or `None` when
    /// the change was a remote snapshot just applied.
    pub fn outgoing(&mut self, state: &GameState) -> Result<Option<String>, SyncError> {
        if self.suppress_next {
            self.suppress_next = false;
            return Ok(None);
        }
        let snapshot = Snapshot {
            sender: self.local_id.clone(),
            state: state.clone(),
        };
        snapshot.encode().map(Some)
    }

    /// Decodes an incoming payload. Returns the state to adopt, or `None`
    /// for our own echo. A snapshot that fails the structural check is
    /// refused and the local state stays as it is.
    pub fn incoming(&mut self, payload: &str) -> Result<Option<GameState>, SyncError> {
        let snapshot = Snapshot::decode(payload)?;
        if snapshot.sender == self.local_id {
            return Ok(None);
        }
        snapshot.state.validate().map_err(SyncError::Invalid)?;
        tracing::debug!(sender = %snapshot.sender, "applying remote snapshot");
        self.suppress_next = true;
        Ok(Some(snapshot.state))
    }
}
