//! Validated, indexed knowledge base.
//!
//! `IndexedKnowledgeBase` is built once from a `KnowledgeDocument` and is
//! immutable afterwards. Construction runs every integrity check and fails
//! fast: a knowledge base that loads is one the scorer can trust.
//!
//! Build order:
//!
//! 1. Vocabulary. Symptom ids must be unique, and no phrase (label, synonym,
//!    or the id with underscores read as spaces) may resolve to two symptoms.
//! 2. Profiles. Weights finite and non-negative with at least one positive,
//!    every referenced symptom in the vocabulary, `base_rate` in [0, 1],
//!    red flags non-empty and known, condition ids unique.
//! 3. Inverse index from symptom to the conditions that weight it positively.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, info};

use triage_contracts::{
    condition::{ConditionId, ConditionProfile, SymptomDefinition},
    error::{TriageError, TriageResult},
    symptom::SymptomId,
};
use triage_core::traits::KnowledgeBase;

use crate::source::{KnowledgeDocument, KnowledgeSource};

/// Condition name used in `MalformedProfile` errors raised by the vocabulary.
pub const VOCABULARY: &str = "<vocabulary>";

/// A read-only knowledge base with indexed lookups in every direction:
/// hashed for phrases and inverse symptom lookups, ordered for profiles.
#[derive(Debug, Clone)]
pub struct IndexedKnowledgeBase {
    vocabulary: BTreeMap<SymptomId, SymptomDefinition>,
    phrase_index: HashMap<String, SymptomId>,
    // Sorted copy of `phrase_index` so fuzzy matching iterates deterministically.
    phrase_list: Vec<(String, SymptomId)>,
    profiles: BTreeMap<ConditionId, ConditionProfile>,
    by_symptom: HashMap<SymptomId, BTreeSet<ConditionId>>,
}

/// Load, validate, and index a knowledge base from `source`.
pub fn load(source: &KnowledgeSource) -> TriageResult<IndexedKnowledgeBase> {
    let document = KnowledgeDocument::from_source(source)?;
    IndexedKnowledgeBase::from_document(document)
}

impl IndexedKnowledgeBase {
    /// Validate `document` and build the indexes.
    pub fn from_document(document: KnowledgeDocument) -> TriageResult<Self> {
        let (vocabulary, phrase_index) = index_vocabulary(document.symptoms)?;

        if document.conditions.is_empty() {
            return Err(TriageError::KnowledgeSource {
                reason: "knowledge base defines no conditions".to_string(),
            });
        }

        let mut profiles = BTreeMap::new();
        let mut by_symptom: HashMap<SymptomId, BTreeSet<ConditionId>> = HashMap::new();
        for profile in document.conditions {
            validate_profile(&profile, &vocabulary)?;
            if profiles.contains_key(&profile.condition) {
                return Err(TriageError::DuplicateCondition {
                    condition: profile.condition.to_string(),
                });
            }
            for (symptom, weight) in &profile.symptom_weights {
                if *weight > 0.0 {
                    by_symptom
                        .entry(symptom.clone())
                        .or_default()
                        .insert(profile.condition.clone());
                }
            }
            debug!(
                condition = %profile.condition,
                symptoms = profile.symptom_weights.len(),
                red_flags = profile.red_flags.len(),
                "indexed condition profile"
            );
            profiles.insert(profile.condition.clone(), profile);
        }

        let mut phrase_list: Vec<(String, SymptomId)> = phrase_index
            .iter()
            .map(|(phrase, id)| (phrase.clone(), id.clone()))
            .collect();
        phrase_list.sort();

        info!(
            symptoms = vocabulary.len(),
            phrases = phrase_list.len(),
            conditions = profiles.len(),
            "knowledge base loaded"
        );

        Ok(Self {
            vocabulary,
            phrase_index,
            phrase_list,
            profiles,
            by_symptom,
        })
    }

    /// Parse a TOML document and build the knowledge base.
    pub fn from_toml_str(s: &str) -> TriageResult<Self> {
        Self::from_document(KnowledgeDocument::from_toml_str(s)?)
    }

    /// Parse a JSON document and build the knowledge base.
    pub fn from_json_str(s: &str) -> TriageResult<Self> {
        Self::from_document(KnowledgeDocument::from_json_str(s)?)
    }

    /// Number of condition profiles.
    pub fn condition_count(&self) -> usize {
        self.profiles.len()
    }

    /// Number of vocabulary entries.
    pub fn symptom_count(&self) -> usize {
        self.vocabulary.len()
    }

    /// Display label for `symptom`, falling back to the id.
    pub fn label<'a>(&'a self, symptom: &'a SymptomId) -> &'a str {
        match self.vocabulary.get(symptom) {
            Some(def) if !def.label.is_empty() => &def.label,
            _ => symptom.as_str(),
        }
    }
}

impl KnowledgeBase for IndexedKnowledgeBase {
    fn contains_symptom(&self, symptom: &SymptomId) -> bool {
        self.vocabulary.contains_key(symptom)
    }

    fn symptom(&self, symptom: &SymptomId) -> Option<&SymptomDefinition> {
        self.vocabulary.get(symptom)
    }

    fn resolve_phrase(&self, phrase: &str) -> Option<&SymptomId> {
        self.phrase_index.get(&normalize_phrase(phrase))
    }

    fn phrases(&self) -> Box<dyn Iterator<Item = (&str, &SymptomId)> + '_> {
        Box::new(self.phrase_list.iter().map(|(p, id)| (p.as_str(), id)))
    }

    fn profile(&self, condition: &ConditionId) -> Option<&ConditionProfile> {
        self.profiles.get(condition)
    }

    fn profiles(&self) -> Box<dyn Iterator<Item = &ConditionProfile> + '_> {
        Box::new(self.profiles.values())
    }

    fn symptoms_for(&self, condition: &ConditionId) -> BTreeSet<SymptomId> {
        self.profiles
            .get(condition)
            .map(|p| p.symptom_weights.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn conditions_referencing(&self, symptom: &SymptomId) -> BTreeSet<ConditionId> {
        self.by_symptom.get(symptom).cloned().unwrap_or_default()
    }
}

// ── Validation ───────────────────────────────────────────────────────────────

/// Lowercase and collapse internal whitespace so "Shortness  of Breath"
/// and "shortness of breath" index identically.
fn normalize_phrase(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

fn vocabulary_error(reason: String) -> TriageError {
    TriageError::MalformedProfile {
        condition: VOCABULARY.to_string(),
        reason,
    }
}

type VocabularyIndex = (
    BTreeMap<SymptomId, SymptomDefinition>,
    HashMap<String, SymptomId>,
);

fn index_vocabulary(symptoms: Vec<SymptomDefinition>) -> TriageResult<VocabularyIndex> {
    let mut vocabulary = BTreeMap::new();
    let mut phrases: HashMap<String, SymptomId> = HashMap::new();

    for def in symptoms {
        if def.id.as_str().trim().is_empty() {
            return Err(vocabulary_error("symptom with empty id".to_string()));
        }
        if vocabulary.contains_key(&def.id) {
            return Err(vocabulary_error(format!(
                "symptom '{}' is defined more than once",
                def.id
            )));
        }

        let implicit = def.id.as_str().replace('_', " ");
        let candidates = std::iter::once(implicit.as_str())
            .chain(std::iter::once(def.label.as_str()))
            .chain(def.synonyms.iter().map(String::as_str));

        for raw in candidates {
            let phrase = normalize_phrase(raw);
            if phrase.is_empty() {
                continue;
            }
            match phrases.get(&phrase) {
                Some(owner) if owner != &def.id => {
                    return Err(vocabulary_error(format!(
                        "phrase '{}' maps to both '{}' and '{}'",
                        phrase, owner, def.id
                    )));
                }
                Some(_) => {}
                None => {
                    phrases.insert(phrase, def.id.clone());
                }
            }
        }

        vocabulary.insert(def.id.clone(), def);
    }

    Ok((vocabulary, phrases))
}

fn validate_profile(
    profile: &ConditionProfile,
    vocabulary: &BTreeMap<SymptomId, SymptomDefinition>,
) -> TriageResult<()> {
    let malformed = |reason: String| TriageError::MalformedProfile {
        condition: profile.condition.to_string(),
        reason,
    };

    if profile.condition.as_str().trim().is_empty() {
        return Err(malformed("condition id is empty".to_string()));
    }

    for (symptom, weight) in &profile.symptom_weights {
        if !weight.is_finite() || *weight < 0.0 {
            return Err(malformed(format!(
                "weight for '{}' must be finite and non-negative, got {}",
                symptom, weight
            )));
        }
        if !vocabulary.contains_key(symptom) {
            return Err(malformed(format!("references unknown symptom '{}'", symptom)));
        }
    }
    if !profile.symptom_weights.values().any(|w| *w > 0.0) {
        return Err(malformed("needs at least one positive weight".to_string()));
    }

    if !profile.base_rate.is_finite() || !(0.0..=1.0).contains(&profile.base_rate) {
        return Err(malformed(format!(
            "base_rate must be in [0, 1], got {}",
            profile.base_rate
        )));
    }

    for (i, flag) in profile.red_flags.iter().enumerate() {
        if flag.symptoms.is_empty() {
            return Err(malformed(format!("red flag #{} lists no symptoms", i + 1)));
        }
        if let Some(unknown) = flag.symptoms.iter().find(|s| !vocabulary.contains_key(*s)) {
            return Err(malformed(format!(
                "red flag #{} references unknown symptom '{}'",
                i + 1,
                unknown
            )));
        }
    }

    Ok(())
}
