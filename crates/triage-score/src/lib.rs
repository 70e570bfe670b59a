//! # triage-score
//!
//! Ranks candidate conditions for a set of observations.
//!
//! This crate provides [`WeightedOverlapScorer`], which implements the
//! [`triage_core::traits::Scorer`] trait. Scores are normalized to [0, 1]
//! per profile, so a condition with many weak symptoms is comparable with
//! one that has a few strong ones.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use triage_contracts::config::ScoringSettings;
//! use triage_score::WeightedOverlapScorer;
//!
//! let scorer = WeightedOverlapScorer::new(ScoringSettings::default());
//! let ranked = scorer.score(&session.observations, &*kb);
//! ```

pub mod scorer;

pub use scorer::{key_threshold, WeightedOverlapScorer};
