//! # triage-session
//!
//! Multi-turn symptom accumulation with a tamper-evident history.
//!
//! ## Overview
//!
//! [`SessionAccumulator`] implements the
//! [`Accumulator`](triage_core::traits::Accumulator) trait: observations merge
//! last-write-wins per symptom, so "actually, no fever" overrides an earlier
//! "I have a fever". Each change appends a snapshot linked to the previous
//! one by SHA-256; editing any snapshot breaks the chain and is detected by
//! [`verify_history`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use triage_core::traits::Accumulator;
//! use triage_session::{summarize, SessionAccumulator};
//!
//! let accumulator = SessionAccumulator::new();
//! let session = accumulator.merge(session, &turn_observations);
//! assert!(accumulator.verify(&session));
//! let summary = summarize(&session);
//! ```

pub mod accumulator;
pub mod chain;
pub mod persist;
pub mod summary;

pub use accumulator::SessionAccumulator;
pub use chain::{hash_snapshot, verify_history};
pub use persist::{export_for_persistence, PersistenceConsent, SessionExport};
pub use summary::{summarize, ConsultationSummary};

// ── Tests ─────────────────────────────────────────────────────────────────────
