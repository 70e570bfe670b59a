//! Last-write-wins session accumulation.
//!
//! `SessionAccumulator` is the reference implementation of the
//! `Accumulator` trait. It owns no state: the session goes in by value and
//! comes back updated, so concurrent sessions never share anything and the
//! caller decides where sessions live between turns.
//!
//! Every non-empty merge appends a `SessionSnapshot` of the full merged set,
//! linked to the previous one by SHA-256, even when it restates what the
//! session already holds. `snapshot_back(n)` therefore counts turns.

use chrono::Utc;
use tracing::debug;

use triage_contracts::{
    session::{SessionSnapshot, SessionState},
    symptom::{ObservationSet, SymptomId},
};
use triage_core::traits::Accumulator;

use crate::chain::{hash_snapshot, verify_history};

#[derive(Debug, Clone, Copy, Default)]
pub struct SessionAccumulator;

impl SessionAccumulator {
    pub fn new() -> Self {
        Self
    }

    /// Remove observations for `symptoms`, e.g. when the user takes a
    /// statement back without denying it.
    ///
    /// Appends a snapshot when anything was removed; otherwise returns the
    /// session unchanged.
    pub fn retract(&self, mut session: SessionState, symptoms: &[SymptomId]) -> SessionState {
        let mut removed = 0usize;
        for symptom in symptoms {
            if session.observations.remove(symptom).is_some() {
                removed += 1;
            }
        }
        if removed == 0 {
            return session;
        }
        debug!(session_id = %session.session_id, removed, "retracted observations");
        record_snapshot(&mut session);
        session
    }

    /// True when the history chain is intact and its newest snapshot matches
    /// the session's current observations.
    pub fn verify(&self, session: &SessionState) -> bool {
        if !verify_history(&session.session_id, &session.history) {
            return false;
        }
        match session.history.last() {
            Some(head) => head.observations == session.observations,
            None => session.observations.is_empty(),
        }
    }
}

impl Accumulator for SessionAccumulator {
    fn merge(&self, mut session: SessionState, observations: &ObservationSet) -> SessionState {
        if observations.is_empty() {
            return session;
        }
        let mut changed = 0usize;
        for observation in observations.iter() {
            let previous = session.observations.insert(observation.clone());
            if previous.as_ref() != Some(observation) {
                changed += 1;
            }
        }
        // A restatement still records its turn, so history stays one
        // snapshot per non-empty merge.
        debug!(
            session_id = %session.session_id,
            changed,
            total = session.observations.len(),
            "merged observations"
        );
        record_snapshot(&mut session);
        session
    }
}

/// Append a snapshot of the current observations to the history.
fn record_snapshot(session: &mut SessionState) {
    let turn = session.history.len() as u64;
    let recorded_at = Utc::now();
    let prev_hash = session.head_hash().to_string();
    let this_hash = hash_snapshot(
        &session.session_id,
        turn,
        &recorded_at,
        &session.observations,
        &prev_hash,
    );
    session.history.push(SessionSnapshot {
        turn,
        observations: session.observations.clone(),
        recorded_at,
        prev_hash,
        this_hash,
    });
}
