//! Snapshot hash chain: hashing and history verification.
//!
//! Every field that contributes to a snapshot's hash is listed explicitly so
//! nothing is accidentally omitted.
//!
//! Hash input layout (bytes, in order):
//!   1. session id as UTF-8 bytes (hyphenated UUID)
//!   2. turn as 8-byte little-endian
//!   3. recorded_at as RFC 3339 with nanoseconds, UTF-8
//!   4. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!   5. canonical JSON of the observation set

use chrono::{DateTime, SecondsFormat, Utc};
use sha2::{Digest, Sha256};

use triage_contracts::{
    session::{SessionId, SessionSnapshot},
    symptom::ObservationSet,
};

/// Compute the SHA-256 hash for one snapshot. Returns 64 lowercase hex chars.
///
/// # Panics
///
/// Panics if `observations` cannot be serialized to JSON, which cannot
/// happen: the set is keyed by strings and holds only plain fields.
pub fn hash_snapshot(
    session_id: &SessionId,
    turn: u64,
    recorded_at: &DateTime<Utc>,
    observations: &ObservationSet,
    prev_hash: &str,
) -> String {
    let observations_json = serde_json::to_vec(observations)
        .expect("ObservationSet must always be serializable to JSON");

    let mut hasher = Sha256::new();
    hasher.update(session_id.to_string().as_bytes());
    hasher.update(turn.to_le_bytes());
    hasher.update(
        recorded_at
            .to_rfc3339_opts(SecondsFormat::Nanos, true)
            .as_bytes(),
    );
    hasher.update(prev_hash.as_bytes());
    hasher.update(&observations_json);

    hex::encode(hasher.finalize())
}

/// Verify the integrity of a session's snapshot history.
///
/// Returns `true` when every snapshot satisfies all three rules:
///
/// 1. **Position**: `turn` equals the snapshot's index in the history.
/// 2. **Linkage**: `prev_hash` equals the previous snapshot's `this_hash`,
///    or `GENESIS_HASH` for the first.
/// 3. **Content**: `this_hash` matches the hash recomputed from the
///    snapshot's own fields.
///
/// An empty history is valid.
pub fn verify_history(session_id: &SessionId, history: &[SessionSnapshot]) -> bool {
    let mut expected_prev = SessionSnapshot::GENESIS_HASH;

    for (index, snapshot) in history.iter().enumerate() {
        if snapshot.turn != index as u64 {
            return false;
        }
        if snapshot.prev_hash != expected_prev {
            return false;
        }
        let recomputed = hash_snapshot(
            session_id,
            snapshot.turn,
            &snapshot.recorded_at,
            &snapshot.observations,
            &snapshot.prev_hash,
        );
        if snapshot.this_hash != recomputed {
            return false;
        }
        expected_prev = snapshot.this_hash.as_str();
    }

    true
}
