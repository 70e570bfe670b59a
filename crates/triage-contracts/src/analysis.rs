//! Per-turn inputs and outputs of the analysis pipeline.
//!
//! `RawInput` is what the chat layer hands in. `RankedCandidate` and
//! `EscalationSignal` are what comes back, wrapped in a `TurnReport`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
    condition::ConditionId,
    error::TriageError,
    session::SessionState,
    symptom::{ObservationSet, Severity, SymptomId},
};

/// Fixed text attached to every report. The core never claims certainty.
pub const DISCLAIMER: &str = "This is not a medical diagnosis. The information is a \
     best-effort suggestion based on the symptoms you described; please consult a \
     qualified healthcare professional.";

/// Raw user input for one turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawInput {
    /// Free text as typed by the user.
    Text(String),
    /// Pre-tagged symptom codes from a structured front end.
    Tags(Vec<SymptomTag>),
}

impl RawInput {
    pub fn text(s: impl Into<String>) -> Self {
        RawInput::Text(s.into())
    }
}

/// A structured symptom tag. `code` may be a SymptomId or any known synonym.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomTag {
    pub code: String,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub excluded: bool,
}

impl SymptomTag {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            severity: None,
            excluded: false,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn excluded(mut self) -> Self {
        self.excluded = true;
        self
    }
}

/// Output of the normalizer: observations plus recoverable diagnostics.
///
/// Partial success is the common case, so unparsed text and unknown symptoms
/// are reported here rather than as errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizeOutcome {
    pub observations: ObservationSet,
    /// Input fragments that matched no known symptom, verbatim.
    pub unparsed_fragments: Vec<String>,
    /// Recoverable problems, e.g. `TriageError::UnknownSymptom`.
    pub warnings: Vec<TriageError>,
}

/// One scored candidate condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub condition: ConditionId,
    /// Normalized score in [0, 1].
    pub score: f64,
    /// Profile symptoms observed as present.
    pub matched_symptoms: BTreeSet<SymptomId>,
    /// High-weight profile symptoms never mentioned; worth asking about.
    pub missing_key_symptoms: BTreeSet<SymptomId>,
    /// Profile symptoms the user explicitly denied.
    #[serde(default)]
    pub contradicted_symptoms: BTreeSet<SymptomId>,
}

/// What the caller should tell the user to do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    #[default]
    None,
    AdviseClinician,
    Emergency,
}

/// Output of the safety gate. Always present, even when nothing triggered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EscalationSignal {
    pub triggered: bool,
    pub reason: Option<String>,
    pub recommended_action: RecommendedAction,
    /// The condition whose profile caused the escalation.
    #[serde(default)]
    pub condition: Option<ConditionId>,
}

impl EscalationSignal {
    /// The non-triggered signal.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn emergency(condition: ConditionId, reason: impl Into<String>) -> Self {
        Self {
            triggered: true,
            reason: Some(reason.into()),
            recommended_action: RecommendedAction::Emergency,
            condition: Some(condition),
        }
    }

    pub fn advise_clinician(condition: ConditionId, reason: impl Into<String>) -> Self {
        Self {
            triggered: true,
            reason: Some(reason.into()),
            recommended_action: RecommendedAction::AdviseClinician,
            condition: Some(condition),
        }
    }
}

/// How the chat layer should frame the turn's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFraming {
    /// Direct the user to emergency care immediately.
    Emergency,
    /// Suggest the user book a clinician visit.
    ConsultClinician,
    /// Candidates exist but none is convincing; lead with "consult a professional".
    LowConfidence,
    /// Share candidates as general information.
    Informational,
    /// Nothing to rank yet; ask the user to describe their symptoms.
    NeedsMoreInformation,
}

/// Everything the pipeline returns for one conversation turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnReport {
    /// The session after this turn's merge. The caller persists it.
    pub session: SessionState,
    pub candidates: Vec<RankedCandidate>,
    pub escalation: EscalationSignal,
    pub framing: ResponseFraming,
    pub disclaimer: &'static str,
    pub unparsed_fragments: Vec<String>,
    /// Recoverable diagnostics, rendered for display.
    pub warnings: Vec<String>,
}
