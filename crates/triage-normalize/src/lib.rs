//! # triage-normalize
//!
//! Turns what the user typed (or a list of structured symptom tags) into
//! canonical `SymptomObservation`s.
//!
//! [`SymptomNormalizer`] implements the
//! [`Normalizer`](triage_core::traits::Normalizer) trait. The vocabulary and
//! synonyms come from the knowledge base in use for the turn; the marker
//! words (negation, severity, hedges) come from a [`Lexicon`], which can be
//! loaded from TOML to support other languages and phrasings.

pub mod fuzzy;
pub mod lexicon;
pub mod normalizer;
pub mod text;

pub use lexicon::Lexicon;
pub use normalizer::SymptomNormalizer;

// ── Tests ─────────────────────────────────────────────────────────────────────
