//! Red-flag safety gate.
//!
//! Evaluation order:
//!
//! 1. Visit profiles in condition-id order. The first red flag whose every
//!    symptom is observed, not excluded, and at or above the flag's
//!    `min_severity` produces `Emergency`. Scores play no part here, so a
//!    dangerous combination hidden among weak candidates still escalates.
//! 2. Otherwise, if the top candidate scores above
//!    `high_confidence_threshold` and its profile `requires_clinician`,
//!    produce `AdviseClinician`.
//! 3. Otherwise, nothing triggers.
//!
//! Hedged observations count as present: a possible red flag is treated as
//! a red flag.

use tracing::{debug, info, warn};

use triage_contracts::{
    analysis::{EscalationSignal, RankedCandidate},
    condition::{ConditionProfile, RedFlag},
    config::SafetySettings,
    symptom::ObservationSet,
};
use triage_core::traits::{KnowledgeBase, SafetyGate};

#[derive(Debug, Clone, Default)]
pub struct RedFlagGate {
    settings: SafetySettings,
}

impl RedFlagGate {
    pub fn new(settings: SafetySettings) -> Self {
        Self { settings }
    }

    /// True when every symptom of `flag` is present at `min_severity` or worse.
    pub fn flag_raised(flag: &RedFlag, observations: &ObservationSet) -> bool {
        !flag.symptoms.is_empty()
            && flag.symptoms.iter().all(|symptom| {
                observations
                    .get(symptom)
                    .is_some_and(|o| !o.is_excluded() && o.severity >= flag.min_severity)
            })
    }

    fn red_flag(
        &self,
        observations: &ObservationSet,
        kb: &dyn KnowledgeBase,
    ) -> Option<EscalationSignal> {
        for profile in kb.profiles() {
            for flag in &profile.red_flags {
                if Self::flag_raised(flag, observations) {
                    let reason = emergency_reason(profile, flag);
                    warn!(
                        condition = %profile.condition,
                        combination = %flag.describe(),
                        "red flag raised"
                    );
                    return Some(EscalationSignal::emergency(profile.condition.clone(), reason));
                }
            }
        }
        None
    }

    fn clinician_advice(
        &self,
        candidates: &[RankedCandidate],
        kb: &dyn KnowledgeBase,
    ) -> Option<EscalationSignal> {
        let top = candidates.first()?;
        if top.score <= self.settings.high_confidence_threshold {
            return None;
        }
        let profile = kb.profile(&top.condition)?;
        if !profile.requires_clinician {
            return None;
        }
        info!(
            condition = %top.condition,
            score = top.score,
            "confident match on a condition that needs a clinician"
        );
        let reason = format!(
            "strong match ({:.0}%) for {}, which should be assessed by a clinician",
            top.score * 100.0,
            display_name(profile)
        );
        Some(EscalationSignal::advise_clinician(top.condition.clone(), reason))
    }
}

impl SafetyGate for RedFlagGate {
    fn evaluate(
        &self,
        candidates: &[RankedCandidate],
        observations: &ObservationSet,
        kb: &dyn KnowledgeBase,
    ) -> EscalationSignal {
        if let Some(signal) = self.red_flag(observations, kb) {
            return signal;
        }
        if let Some(signal) = self.clinician_advice(candidates, kb) {
            return signal;
        }
        debug!(candidates = candidates.len(), "no escalation");
        EscalationSignal::none()
    }
}

fn display_name(profile: &ConditionProfile) -> &str {
    if profile.name.is_empty() {
        profile.condition.as_str()
    } else {
        &profile.name
    }
}

fn emergency_reason(profile: &ConditionProfile, flag: &RedFlag) -> String {
    let mut reason = format!(
        "red flag for {}: {}",
        display_name(profile),
        flag.describe()
    );
    if let Some(note) = &flag.note {
        reason.push_str(" (");
        reason.push_str(note);
        reason.push(')');
    }
    reason
}
