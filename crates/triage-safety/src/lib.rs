//! # triage-safety
//!
//! The safety gate: decides, on every turn, whether the user must be sent
//! to emergency care or to a clinician.
//!
//! [`RedFlagGate`] implements the
//! [`SafetyGate`](triage_core::traits::SafetyGate) trait. Red flags are
//! symptom-driven and checked before anything score-related.

pub mod gate;

pub use gate::RedFlagGate;

// ── Tests ─────────────────────────────────────────────────────────────────────
