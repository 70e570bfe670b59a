//! Core trait definitions for the symptom analysis pipeline.
//!
//! The five traits mark the component seams:
//!
//! - `KnowledgeBase`: read-only condition/symptom index, shared by all turns
//! - `Normalizer`   : raw text or tags → canonical observations
//! - `Accumulator`  : merges a turn's observations into the session
//! - `Scorer`       : ranks candidate conditions against the knowledge base
//! - `SafetyGate`   : red-flag and clinician-advice escalation
//!
//! The `Analyzer` wires them together in that order. Every implementation
//! must be free of hidden state: outputs depend only on the arguments.

use std::collections::BTreeSet;

use triage_contracts::{
    analysis::{EscalationSignal, NormalizeOutcome, RankedCandidate, RawInput},
    condition::{ConditionId, ConditionProfile, SymptomDefinition},
    error::TriageResult,
    session::SessionState,
    symptom::{ObservationSet, SymptomId},
};

/// An immutable index of condition profiles and the symptom vocabulary.
///
/// Implementations are built once and never mutated; updating the knowledge
/// base means building a new one and publishing it atomically. Lookups are
/// expected to be O(1) or O(log n): the scorer calls them per observation.
pub trait KnowledgeBase: Send + Sync {
    /// Return true if `symptom` is part of the vocabulary.
    fn contains_symptom(&self, symptom: &SymptomId) -> bool;

    /// Vocabulary entry for `symptom`, if known.
    fn symptom(&self, symptom: &SymptomId) -> Option<&SymptomDefinition>;

    /// Resolve an exact lowercase phrase ("shortness of breath") to a symptom.
    fn resolve_phrase(&self, phrase: &str) -> Option<&SymptomId>;

    /// Every known phrase and the symptom it resolves to, for fuzzy matching.
    fn phrases(&self) -> Box<dyn Iterator<Item = (&str, &SymptomId)> + '_>;

    /// Profile for `condition`, if known.
    fn profile(&self, condition: &ConditionId) -> Option<&ConditionProfile>;

    /// All profiles in ascending condition-id order.
    fn profiles(&self) -> Box<dyn Iterator<Item = &ConditionProfile> + '_>;

    /// Symptoms weighted by `condition`'s profile. Empty for unknown conditions.
    fn symptoms_for(&self, condition: &ConditionId) -> BTreeSet<SymptomId>;

    /// Conditions whose profiles weight `symptom`. Empty for unknown symptoms.
    fn conditions_referencing(&self, symptom: &SymptomId) -> BTreeSet<ConditionId>;
}

/// Turns one turn's raw input into canonical observations.
pub trait Normalizer: Send + Sync {
    /// Normalize `input` against the vocabulary of `kb`.
    ///
    /// Unknown symptoms and unmatched text are recoverable and reported in the
    /// outcome. Returns `TriageError::EmptyInput` only when nothing at all
    /// could be extracted.
    fn normalize(&self, input: &RawInput, kb: &dyn KnowledgeBase) -> TriageResult<NormalizeOutcome>;
}

/// Merges observations into a session. Never fails.
///
/// The caller must serialize calls per session id; merges for different
/// sessions are independent.
pub trait Accumulator: Send + Sync {
    /// Apply `observations` last-write-wins per symptom and record a snapshot.
    ///
    /// An empty `observations` set must return `session` unchanged.
    fn merge(&self, session: SessionState, observations: &ObservationSet) -> SessionState;
}

/// Ranks candidate conditions for an observation set.
pub trait Scorer: Send + Sync {
    /// Score every condition that shares a present symptom with `observations`.
    ///
    /// Output is ordered by score descending, ties by condition id ascending,
    /// and truncated to the configured top-K.
    fn score(&self, observations: &ObservationSet, kb: &dyn KnowledgeBase) -> Vec<RankedCandidate>;
}

/// Decides whether a turn must be escalated.
///
/// Runs on every turn regardless of candidate scores: red flags are driven
/// by symptoms, not by ranking.
pub trait SafetyGate: Send + Sync {
    fn evaluate(
        &self,
        candidates: &[RankedCandidate],
        observations: &ObservationSet,
        kb: &dyn KnowledgeBase,
    ) -> EscalationSignal;
}
