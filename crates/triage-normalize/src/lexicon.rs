//! Marker words the normalizer recognizes around symptom phrases.
//!
//! The lexicon is data, not code: a TOML file may replace any list, and
//! lists it leaves out keep their built-in defaults.
//!
//! ```toml
//! negation_before = ["no", "not", "denies", "kein", "sans"]
//! severe = ["severe", "terrible", "crushing"]
//!
//! [aliases]
//! "tummy ache" = "abdominal_pain"
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use triage_contracts::{
    error::{TriageError, TriageResult},
    symptom::{Severity, SymptomId},
};

/// Word lists consulted in the token window around a matched phrase.
///
/// Every entry is a single lowercase token. Multi-word phrases only make
/// sense in `aliases`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lexicon {
    /// Negation markers that precede a phrase ("no fever").
    pub negation_before: BTreeSet<String>,
    /// Negation markers that follow a phrase ("fever is gone").
    pub negation_after: BTreeSet<String>,
    pub mild: BTreeSet<String>,
    pub moderate: BTreeSet<String>,
    pub severe: BTreeSet<String>,
    /// Uncertainty markers ("maybe a cough").
    pub hedges: BTreeSet<String>,
    /// Words that turn a directly preceding negation into a hedge ("not sure").
    pub uncertain: BTreeSet<String>,
    /// Words that end one clause and start another ("but", "however").
    pub clause_breaks: BTreeSet<String>,
    /// List joiners across which a negation keeps applying ("no fever or cough").
    pub connectors: BTreeSet<String>,
    /// Words that carry no symptom content on their own.
    pub filler: BTreeSet<String>,
    /// Extra phrases mapped to symptom ids, on top of the knowledge base synonyms.
    pub aliases: BTreeMap<String, SymptomId>,
}

fn words(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(|w| w.to_string()).collect()
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            negation_before: words(&[
                "no", "not", "denies", "denied", "deny", "without", "never", "nor", "neither",
                "don't", "doesn't", "didn't", "haven't", "hasn't", "isn't", "aren't", "wasn't",
                "kein", "keine", "keinen", "nicht", "nie", "pas", "sans", "jamais", "sin",
            ]),
            negation_after: words(&["absent", "gone", "resolved", "none", "disappeared"]),
            mild: words(&["mild", "mildly", "slight", "slightly", "little", "minor", "light"]),
            moderate: words(&["moderate", "moderately", "bad", "fairly", "considerable"]),
            severe: words(&[
                "severe", "severely", "terrible", "awful", "worst", "crushing", "extreme",
                "unbearable", "intense", "excruciating", "horrible", "stark", "starke",
            ]),
            hedges: words(&[
                "maybe", "might", "possibly", "probably", "perhaps", "think", "guess", "unsure",
                "vielleicht",
            ]),
            uncertain: words(&["sure", "certain", "sicher"]),
            clause_breaks: words(&["but", "however", "although", "though", "aber"]),
            connectors: words(&["and", "or", "nor", "und", "oder", "et", "ou"]),
            filler: words(&[
                "i", "i'm", "im", "i've", "ive", "me", "my", "a", "an", "the", "have", "has",
                "had", "having", "am", "is", "are", "was", "were", "be", "been", "it", "it's",
                "its", "of", "with", "for", "since", "in", "on", "at", "to", "this", "that",
                "also", "some", "feel", "feeling", "felt", "got", "get", "getting", "very",
                "really", "quite", "just", "still", "now", "today", "there", "ago", "bit",
                "ich", "habe", "hab", "seit", "j'ai", "depuis", "une", "un", "de",
            ]),
            aliases: BTreeMap::new(),
        }
    }
}

impl Lexicon {
    /// Parse a TOML lexicon; lists it omits keep their defaults.
    pub fn from_toml_str(s: &str) -> TriageResult<Self> {
        let mut lexicon: Lexicon = toml::from_str(s).map_err(|e| TriageError::KnowledgeSource {
            reason: format!("failed to parse lexicon TOML: {}", e),
        })?;
        lexicon.canonicalize();
        Ok(lexicon)
    }

    /// Read the file at `path` and parse it with `from_toml_str`.
    pub fn from_file(path: &Path) -> TriageResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| TriageError::KnowledgeSource {
            reason: format!("failed to read lexicon '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Lowercase every entry and collapse whitespace in alias phrases.
    fn canonicalize(&mut self) {
        for list in [
            &mut self.negation_before,
            &mut self.negation_after,
            &mut self.mild,
            &mut self.moderate,
            &mut self.severe,
            &mut self.hedges,
            &mut self.uncertain,
            &mut self.clause_breaks,
            &mut self.connectors,
            &mut self.filler,
        ] {
            *list = list.iter().map(|w| w.trim().to_lowercase()).collect();
        }
        self.aliases = std::mem::take(&mut self.aliases)
            .into_iter()
            .map(|(phrase, id)| {
                let phrase = phrase
                    .split_whitespace()
                    .map(str::to_lowercase)
                    .collect::<Vec<_>>()
                    .join(" ");
                (phrase, id)
            })
            .collect();
    }

    /// Severity named by `token`, if it is a severity modifier.
    pub fn severity_of(&self, token: &str) -> Option<Severity> {
        if self.severe.contains(token) {
            Some(Severity::Severe)
        } else if self.moderate.contains(token) {
            Some(Severity::Moderate)
        } else if self.mild.contains(token) {
            Some(Severity::Mild)
        } else {
            None
        }
    }

    pub fn is_clause_break(&self, token: &str) -> bool {
        self.clause_breaks.contains(token)
    }

    pub fn is_connector(&self, token: &str) -> bool {
        self.connectors.contains(token)
    }

    /// True for tokens that are markers or filler rather than content.
    ///
    /// Numbers count as non-content: they only ever feed the onset parser.
    pub fn is_structural(&self, token: &str) -> bool {
        token.chars().all(|c| c.is_ascii_digit())
            || self.filler.contains(token)
            || self.connectors.contains(token)
            || self.clause_breaks.contains(token)
            || self.negation_before.contains(token)
            || self.negation_after.contains(token)
            || self.hedges.contains(token)
            || self.uncertain.contains(token)
            || self.severity_of(token).is_some()
    }
}
