//! Symptom identity and observation types.
//!
//! A `SymptomObservation` is the normalized form of one user statement about
//! one symptom. Observations are collected into an `ObservationSet`, which
//! holds at most one observation per `SymptomId`.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Canonical key for a recognized symptom concept.
///
/// Many raw phrases ("temperature", "feverish", "pyrexia") normalize to one
/// SymptomId ("fever"). Ordered so that sets and maps iterate deterministically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymptomId(pub String);

impl SymptomId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SymptomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SymptomId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SymptomId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// How strongly the user experiences a symptom.
///
/// Ordered: `Mild < Moderate < Severe`. Red flags compare against this order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Mild,
    #[default]
    Moderate,
    Severe,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Mild => "mild",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
        };
        f.write_str(s)
    }
}

/// A single normalized statement about one symptom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomObservation {
    /// The canonical symptom this statement refers to.
    pub symptom: SymptomId,
    /// Reported intensity. Defaults to moderate when the user gave none.
    pub severity: Severity,
    /// How long ago the symptom started, when the user said so.
    #[serde(default)]
    pub onset: Option<Duration>,
    /// Parsing confidence in [0, 1]. Zero means the symptom is excluded.
    pub certainty: f64,
    /// Explicit exclusion ("no fever", "denies chest pain").
    #[serde(default)]
    pub excluded: bool,
}

impl SymptomObservation {
    /// A symptom the user reports having, at full certainty.
    pub fn present(symptom: impl Into<SymptomId>, severity: Severity) -> Self {
        Self {
            symptom: symptom.into(),
            severity,
            onset: None,
            certainty: 1.0,
            excluded: false,
        }
    }

    /// A symptom the user explicitly denies.
    pub fn absent(symptom: impl Into<SymptomId>) -> Self {
        Self {
            symptom: symptom.into(),
            severity: Severity::default(),
            onset: None,
            certainty: 0.0,
            excluded: true,
        }
    }

    /// Override the parsing certainty, clamped to [0, 1].
    pub fn with_certainty(mut self, certainty: f64) -> Self {
        self.certainty = certainty.clamp(0.0, 1.0);
        self
    }

    pub fn with_onset(mut self, onset: Duration) -> Self {
        self.onset = Some(onset);
        self
    }

    /// True when this observation rules the symptom out rather than in.
    pub fn is_excluded(&self) -> bool {
        self.excluded || self.certainty <= 0.0
    }
}

/// A set of observations keyed by symptom: at most one entry per SymptomId.
///
/// Inserting an observation for a symptom that is already present replaces
/// the earlier one. This is the "latest wins" rule the session relies on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObservationSet {
    inner: BTreeMap<SymptomId, SymptomObservation>,
}

impl ObservationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `observation`, returning the observation it replaced, if any.
    pub fn insert(&mut self, observation: SymptomObservation) -> Option<SymptomObservation> {
        self.inner.insert(observation.symptom.clone(), observation)
    }

    pub fn remove(&mut self, symptom: &SymptomId) -> Option<SymptomObservation> {
        self.inner.remove(symptom)
    }

    pub fn get(&self, symptom: &SymptomId) -> Option<&SymptomObservation> {
        self.inner.get(symptom)
    }

    pub fn contains(&self, symptom: &SymptomId) -> bool {
        self.inner.contains_key(symptom)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// All observations in symptom-id order.
    pub fn iter(&self) -> impl Iterator<Item = &SymptomObservation> {
        self.inner.values()
    }

    /// Observations that count as evidence for a symptom.
    pub fn present(&self) -> impl Iterator<Item = &SymptomObservation> {
        self.inner.values().filter(|o| !o.is_excluded())
    }

    /// Observations that rule a symptom out.
    pub fn excluded(&self) -> impl Iterator<Item = &SymptomObservation> {
        self.inner.values().filter(|o| o.is_excluded())
    }

    /// True when `symptom` is observed and not excluded.
    pub fn is_present(&self, symptom: &SymptomId) -> bool {
        self.get(symptom).is_some_and(|o| !o.is_excluded())
    }
}

impl FromIterator<SymptomObservation> for ObservationSet {
    fn from_iter<I: IntoIterator<Item = SymptomObservation>>(iter: I) -> Self {
        let mut set = ObservationSet::new();
        for observation in iter {
            set.insert(observation);
        }
        set
    }
}

impl IntoIterator for ObservationSet {
    type Item = SymptomObservation;
    type IntoIter = std::collections::btree_map::IntoValues<SymptomId, SymptomObservation>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_values()
    }
}
