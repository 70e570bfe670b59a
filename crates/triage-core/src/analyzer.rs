//! The turn analyzer: the deterministic per-turn symptom analysis pipeline.
//!
//! The analyzer runs the stages in a fixed order:
//!
//!   RawInput → Normalize → Merge → Score → Safety Gate → Framing → TurnReport
//!
//! The safety gate runs on every turn, including turns whose input could not
//! be normalized: a session that already holds a red-flag combination must
//! keep escalating no matter what the user types next.

use tracing::{debug, info, warn};

use triage_contracts::{
    analysis::{
        EscalationSignal, NormalizeOutcome, RankedCandidate, RawInput, RecommendedAction,
        ResponseFraming, TurnReport, DISCLAIMER,
    },
    config::SafetySettings,
    error::{TriageError, TriageResult},
    session::SessionState,
};

use crate::traits::{Accumulator, KnowledgeBase, Normalizer, SafetyGate, Scorer};

/// Drives one conversation turn through every component.
///
/// One analyzer can serve any number of sessions concurrently: it holds only
/// immutable components and settings. The knowledge base is passed per call
/// so a hot reload takes effect on the next turn without rebuilding this.
pub struct Analyzer {
    normalizer: Box<dyn Normalizer>,
    accumulator: Box<dyn Accumulator>,
    scorer: Box<dyn Scorer>,
    gate: Box<dyn SafetyGate>,
    settings: SafetySettings,
}

impl Analyzer {
    /// Create an analyzer from its components and framing thresholds.
    pub fn new(
        normalizer: Box<dyn Normalizer>,
        accumulator: Box<dyn Accumulator>,
        scorer: Box<dyn Scorer>,
        gate: Box<dyn SafetyGate>,
        settings: SafetySettings,
    ) -> Self {
        Self {
            normalizer,
            accumulator,
            scorer,
            gate,
            settings,
        }
    }

    /// Analyze one turn.
    ///
    /// # Pipeline
    ///
    /// 1. `normalizer.normalize()`; `EmptyInput` is recovered as an empty
    ///    outcome plus a warning, the user is asked for more information
    /// 2. `accumulator.merge()` folds the new observations into the session
    /// 3. `scorer.score()` ranks candidates over the merged session
    /// 4. `gate.evaluate()` checks red flags and clinician advice
    /// 5. The response framing is derived from the signal and top score
    ///
    /// # Errors
    ///
    /// Only non-recoverable normalizer errors are returned. Recoverable
    /// problems appear in `TurnReport::warnings`.
    pub fn analyze_turn(
        &self,
        session: SessionState,
        input: &RawInput,
        kb: &dyn KnowledgeBase,
    ) -> TriageResult<TurnReport> {
        let session_id = session.session_id;

        debug!(
            session_id = %session_id,
            prior_observations = session.observations.len(),
            "turn analysis starting"
        );

        // ── Step 1: Normalize ────────────────────────────────────────────────
        let (outcome, needs_reprompt) = match self.normalizer.normalize(input, kb) {
            Ok(outcome) => (outcome, false),
            Err(TriageError::EmptyInput) => {
                warn!(session_id = %session_id, "input held no usable symptom information");
                let outcome = NormalizeOutcome {
                    warnings: vec![TriageError::EmptyInput],
                    ..NormalizeOutcome::default()
                };
                (outcome, true)
            }
            Err(e) => return Err(e),
        };

        for warning in &outcome.warnings {
            warn!(session_id = %session_id, warning = %warning, "normalizer diagnostic");
        }

        // ── Step 2: Merge into the session ───────────────────────────────────
        let session = self.accumulator.merge(session, &outcome.observations);

        // ── Step 3: Score the merged evidence ────────────────────────────────
        let candidates = self.scorer.score(&session.observations, kb);

        // ── Step 4: Safety gate, unconditionally ─────────────────────────────
        let escalation = self.gate.evaluate(&candidates, &session.observations, kb);

        if escalation.triggered {
            info!(
                session_id = %session_id,
                action = ?escalation.recommended_action,
                reason = escalation.reason.as_deref().unwrap_or(""),
                "turn escalated"
            );
        }

        // ── Step 5: Framing ──────────────────────────────────────────────────
        let framing = if needs_reprompt && candidates.is_empty() && !escalation.triggered {
            ResponseFraming::NeedsMoreInformation
        } else {
            self.frame(&candidates, &escalation)
        };

        debug!(
            session_id = %session_id,
            candidate_count = candidates.len(),
            framing = ?framing,
            "turn analysis complete"
        );

        Ok(TurnReport {
            session,
            candidates,
            escalation,
            framing,
            disclaimer: DISCLAIMER,
            unparsed_fragments: outcome.unparsed_fragments,
            warnings: outcome.warnings.iter().map(|w| w.to_string()).collect(),
        })
    }

    /// Pick how the answer should be framed for the user.
    ///
    /// Escalation always wins. Otherwise the top score decides between
    /// informational output and a low-confidence "consult a professional".
    pub fn frame(
        &self,
        candidates: &[RankedCandidate],
        escalation: &EscalationSignal,
    ) -> ResponseFraming {
        match escalation.recommended_action {
            RecommendedAction::Emergency => return ResponseFraming::Emergency,
            RecommendedAction::AdviseClinician => return ResponseFraming::ConsultClinician,
            RecommendedAction::None => {}
        }

        match candidates.first() {
            None => ResponseFraming::NeedsMoreInformation,
            Some(top) if top.score < self.settings.low_confidence_threshold => {
                ResponseFraming::LowConfidence
            }
            Some(_) => ResponseFraming::Informational,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
