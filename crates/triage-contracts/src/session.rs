//! Session state carried between conversation turns.
//!
//! The core never stores sessions. The caller passes a `SessionState` into
//! each turn and receives the updated one back; persistence, expiry, and
//! per-session locking belong to the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::symptom::ObservationSet;

/// Unique identifier for one user's conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub uuid::Uuid);

impl SessionId {
    /// Create a new, unique session ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The full merged observation set as it stood after one turn.
///
/// Snapshots form a SHA-256 hash chain: `prev_hash` is the previous
/// snapshot's `this_hash`, or `SessionSnapshot::GENESIS_HASH` for the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Zero-based position in the history.
    pub turn: u64,
    pub observations: ObservationSet,
    pub recorded_at: DateTime<Utc>,
    pub prev_hash: String,
    pub this_hash: String,
}

impl SessionSnapshot {
    /// Sentinel `prev_hash` of the first snapshot in every history.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}

/// Accumulated symptom evidence for one conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub session_id: SessionId,
    /// Latest observation per symptom.
    pub observations: ObservationSet,
    /// One snapshot per state-changing turn, oldest first.
    pub history: Vec<SessionSnapshot>,
}

impl SessionState {
    /// Start an empty session with a fresh id.
    pub fn new() -> Self {
        Self::with_id(SessionId::new())
    }

    pub fn with_id(session_id: SessionId) -> Self {
        Self {
            session_id,
            observations: ObservationSet::new(),
            history: Vec::new(),
        }
    }

    /// The merged observation set as it stood `turns_ago` snapshots back.
    ///
    /// `snapshot_back(0)` is the latest snapshot. Returns `None` when the
    /// history is shorter than requested.
    pub fn snapshot_back(&self, turns_ago: usize) -> Option<&SessionSnapshot> {
        let len = self.history.len();
        if turns_ago >= len {
            return None;
        }
        self.history.get(len - 1 - turns_ago)
    }

    /// Hash of the newest snapshot, or the genesis hash for a fresh session.
    pub fn head_hash(&self) -> &str {
        self.history
            .last()
            .map(|s| s.this_hash.as_str())
            .unwrap_or(SessionSnapshot::GENESIS_HASH)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
