//! Condition profile types: the immutable records inside the knowledge base.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::symptom::{Severity, SymptomId};

/// Stable identifier for a health condition (e.g. "flu", "cardiac_event").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConditionId(pub String);

impl ConditionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConditionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConditionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One entry of the symptom vocabulary.
///
/// `synonyms` are the lowercase phrases the normalizer resolves to `id`. The
/// id itself (with underscores read as spaces) is always an implicit synonym.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomDefinition {
    pub id: SymptomId,
    /// Human-readable label used in summaries and escalation reasons.
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

/// A symptom combination that mandates escalation when fully present.
///
/// Every symptom in `symptoms` must be observed, not excluded, and reported at
/// `min_severity` or worse. Overall condition score is irrelevant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedFlag {
    pub symptoms: BTreeSet<SymptomId>,
    #[serde(default = "RedFlag::default_min_severity")]
    pub min_severity: Severity,
    /// Optional clinician-facing note, appended to the escalation reason.
    #[serde(default)]
    pub note: Option<String>,
}

impl RedFlag {
    fn default_min_severity() -> Severity {
        Severity::Mild
    }

    /// Render the combination as "a + b + c" for escalation reasons.
    pub fn describe(&self) -> String {
        self.symptoms
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(" + ")
    }
}

/// How strongly each symptom indicates a condition, plus its safety metadata.
///
/// Invariants (checked when the knowledge base loads): every weight is finite
/// and non-negative, and at least one weight is strictly positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionProfile {
    #[serde(rename = "id")]
    pub condition: ConditionId,
    /// Display name ("Influenza").
    #[serde(default)]
    pub name: String,
    #[serde(rename = "weights")]
    pub symptom_weights: BTreeMap<SymptomId, f64>,
    #[serde(default)]
    pub red_flags: Vec<RedFlag>,
    /// Small additive prior in [0, 1].
    #[serde(default)]
    pub base_rate: f64,
    /// A confident match should be routed to a professional.
    #[serde(default)]
    pub requires_clinician: bool,
    /// Guideline sources to consult first for this condition (ESC, NICE, CDC…).
    #[serde(default)]
    pub guidelines: Vec<String>,
}

impl ConditionProfile {
    /// Sum of all symptom weights; the normalizing denominator for scores.
    pub fn total_weight(&self) -> f64 {
        self.symptom_weights.values().sum()
    }

    pub fn weight(&self, symptom: &SymptomId) -> Option<f64> {
        self.symptom_weights.get(symptom).copied()
    }
}
