//! # triage-reference
//!
//! Reference runtime for the symptom triage core.
//!
//! Bundles a small general-practice knowledge base and lexicon, wires the
//! reference components into an [`Analyzer`], and walks four scenarios:
//!
//! 1. **Flu vs cold**: two turns of respiratory symptoms; denials push the
//!    cold down the ranking.
//! 2. **Cardiac red flag**: chest pain with breathlessness escalates to an
//!    emergency although the cardiac score itself is modest.
//! 3. **Correction**: "actually, no fever" overrides an earlier hedge and the
//!    snapshot chain still verifies.
//! 4. **Sepsis across turns**: a fever reported as text and a fast heart rate
//!    reported as a structured tag complete a red flag together.
//!
//! All content is illustrative. Nothing here is medical advice.

use triage_contracts::{config::AnalysisConfig, error::TriageResult};
use triage_core::Analyzer;
use triage_kb::IndexedKnowledgeBase;
use triage_normalize::{Lexicon, SymptomNormalizer};
use triage_safety::RedFlagGate;
use triage_score::WeightedOverlapScorer;
use triage_session::SessionAccumulator;

pub mod scenarios;

// ── Bundled content ───────────────────────────────────────────────────────────

/// The reference knowledge base, TOML.
pub const REFERENCE_KNOWLEDGE: &str = include_str!("../knowledge/reference.toml");

/// The reference lexicon, TOML. Lists it omits keep the built-in defaults.
pub const REFERENCE_LEXICON: &str = include_str!("../lexicon/default.toml");

/// Load and validate the bundled knowledge base.
pub fn reference_knowledge_base() -> TriageResult<IndexedKnowledgeBase> {
    IndexedKnowledgeBase::from_toml_str(REFERENCE_KNOWLEDGE)
}

/// Parse the bundled lexicon.
pub fn reference_lexicon() -> TriageResult<Lexicon> {
    Lexicon::from_toml_str(REFERENCE_LEXICON)
}

/// Wire the reference components into an analyzer configured by `config`.
pub fn build_analyzer(config: &AnalysisConfig, lexicon: Lexicon) -> Analyzer {
    Analyzer::new(
        Box::new(SymptomNormalizer::new(lexicon, config.normalizer.clone())),
        Box::new(SessionAccumulator::new()),
        Box::new(WeightedOverlapScorer::new(config.scoring.clone())),
        Box::new(RedFlagGate::new(config.safety.clone())),
        config.safety.clone(),
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────────
