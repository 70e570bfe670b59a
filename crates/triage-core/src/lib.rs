//! # triage-core
//!
//! Component seams and the per-turn pipeline for symptom analysis.
//!
//! This crate provides:
//! - The five component traits (`KnowledgeBase`, `Normalizer`, `Accumulator`,
//!   `Scorer`, `SafetyGate`)
//! - The `Analyzer` that runs them in order for one conversation turn
//!
//! ## Usage
//!
//! ```rust,ignore
//! use triage_core::{Analyzer, traits::{KnowledgeBase, Normalizer, Scorer}};
//!
//! let report = analyzer.analyze_turn(session, &RawInput::text("no fever, bad headache"), &*kb)?;
//! ```

pub mod analyzer;
pub mod traits;

pub use analyzer::Analyzer;
