//! Free-text and tag normalization.
//!
//! Matching algorithm per clause:
//!
//! 1. Walk the tokens left to right. At each position try the longest span
//!    first and take the first exact phrase hit (knowledge base synonyms,
//!    then lexicon aliases).
//! 2. With no exact hit, try fuzzy matching on spans of at least four chars
//!    whose edges are content words. Certainty becomes the similarity.
//! 3. For each match, inspect up to `negation_window` non-filler tokens on
//!    each side, never crossing another match: pre/post negation markers
//!    exclude the symptom, severity modifiers set severity, hedges scale
//!    certainty. A negation followed by "sure" or "certain" is a hedge.
//!    A negation also carries forward across a bare connector, so
//!    "no fever or cough" denies both.
//! 4. An onset ("3 days") applies to the clause's symptoms. An onset in a
//!    clause with no symptom applies to every symptom still lacking one.
//!
//! A clause with no match but with content words is reported verbatim as an
//! unparsed fragment.

use std::time::Duration;

use tracing::debug;

use triage_contracts::{
    analysis::{NormalizeOutcome, RawInput, SymptomTag},
    config::NormalizerSettings,
    error::{TriageError, TriageResult},
    symptom::{SymptomId, SymptomObservation},
};
use triage_core::traits::{KnowledgeBase, Normalizer};

use crate::fuzzy;
use crate::lexicon::Lexicon;
use crate::text::{self, Clause, Token};

/// Minimum span length, in chars, for fuzzy matching.
const MIN_FUZZY_CHARS: usize = 4;

/// A `Normalizer` driven by a `Lexicon` and the knowledge base vocabulary.
#[derive(Debug, Clone)]
pub struct SymptomNormalizer {
    lexicon: Lexicon,
    settings: NormalizerSettings,
}

/// One phrase hit inside a clause: tokens `[start, end)`.
#[derive(Debug, Clone)]
struct PhraseMatch {
    start: usize,
    end: usize,
    symptom: SymptomId,
    certainty: f64,
}

impl SymptomNormalizer {
    pub fn new(lexicon: Lexicon, settings: NormalizerSettings) -> Self {
        Self { lexicon, settings }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    // ── Tags ─────────────────────────────────────────────────────────────────

    fn normalize_tags(&self, tags: &[SymptomTag], kb: &dyn KnowledgeBase) -> NormalizeOutcome {
        let mut outcome = NormalizeOutcome::default();
        for tag in tags {
            let code = tag.code.trim().to_lowercase();
            if code.is_empty() {
                continue;
            }
            let Some(symptom) = self.resolve_exact(&code, kb).or_else(|| {
                self.resolve_exact(&code.replace('_', " "), kb)
            }) else {
                debug!(code = %code, "unknown symptom tag");
                outcome.warnings.push(TriageError::UnknownSymptom {
                    symptom: tag.code.clone(),
                });
                outcome.unparsed_fragments.push(tag.code.clone());
                continue;
            };
            if !kb.contains_symptom(&symptom) {
                outcome.warnings.push(TriageError::UnknownSymptom {
                    symptom: symptom.to_string(),
                });
                continue;
            }
            let observation = if tag.excluded {
                SymptomObservation::absent(symptom)
            } else {
                SymptomObservation::present(
                    symptom,
                    tag.severity.unwrap_or(self.settings.default_severity),
                )
            };
            outcome.observations.insert(observation);
        }
        outcome
    }

    // ── Free text ────────────────────────────────────────────────────────────

    fn normalize_text(&self, input: &str, kb: &dyn KnowledgeBase) -> NormalizeOutcome {
        let mut outcome = NormalizeOutcome::default();
        let max_tokens = self.max_phrase_tokens(kb);
        let mut orphan_onset: Option<Duration> = None;

        for clause in text::clauses(input, &self.lexicon) {
            let matches = self.match_clause(&clause, kb, max_tokens);
            let onset = text::parse_onset(clause.text);

            if matches.is_empty() {
                if onset.is_some() {
                    orphan_onset = orphan_onset.or(onset);
                } else if clause
                    .tokens
                    .iter()
                    .any(|t| !self.lexicon.is_structural(&t.text))
                {
                    debug!(fragment = clause.text, "unparsed fragment");
                    outcome.unparsed_fragments.push(clause.text.to_string());
                }
                continue;
            }

            let mut previous_negated = false;
            for (i, m) in matches.iter().enumerate() {
                let before_limit = if i == 0 { 0 } else { matches[i - 1].end };
                let after_limit = matches
                    .get(i + 1)
                    .map_or(clause.tokens.len(), |next| next.start);
                let carried = previous_negated
                    && clause.tokens[before_limit..m.start]
                        .iter()
                        .all(|t| self.lexicon.is_connector(&t.text));

                let observation = self.observe(&clause, m, before_limit, after_limit, carried);
                previous_negated = observation.excluded;

                if !kb.contains_symptom(&observation.symptom) {
                    outcome.warnings.push(TriageError::UnknownSymptom {
                        symptom: observation.symptom.to_string(),
                    });
                    continue;
                }
                let observation = match onset {
                    Some(onset) if !observation.excluded => observation.with_onset(onset),
                    _ => observation,
                };
                debug!(
                    symptom = %observation.symptom,
                    severity = %observation.severity,
                    certainty = observation.certainty,
                    excluded = observation.excluded,
                    "matched symptom"
                );
                // Later mentions replace earlier ones.
                outcome.observations.insert(observation);
            }
        }

        if let Some(onset) = orphan_onset {
            let missing: Vec<SymptomObservation> = outcome
                .observations
                .present()
                .filter(|o| o.onset.is_none())
                .cloned()
                .collect();
            for observation in missing {
                outcome.observations.insert(observation.with_onset(onset));
            }
        }

        outcome
    }

    /// Greedy longest-first matching over one clause.
    fn match_clause(
        &self,
        clause: &Clause<'_>,
        kb: &dyn KnowledgeBase,
        max_tokens: usize,
    ) -> Vec<PhraseMatch> {
        let tokens = &clause.tokens;
        let mut matches = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            let longest = max_tokens.min(tokens.len() - i);
            let hit = (1..=longest)
                .rev()
                .find_map(|len| {
                    self.resolve_exact(&clause.span(i, i + len), kb)
                        .map(|symptom| (len, symptom, 1.0))
                })
                .or_else(|| {
                    (1..=longest)
                        .rev()
                        .find_map(|len| self.resolve_fuzzy(clause, i, i + len, kb))
                });

            match hit {
                Some((len, symptom, certainty)) => {
                    matches.push(PhraseMatch {
                        start: i,
                        end: i + len,
                        symptom,
                        certainty,
                    });
                    i += len;
                }
                None => i += 1,
            }
        }
        matches
    }

    fn resolve_exact(&self, phrase: &str, kb: &dyn KnowledgeBase) -> Option<SymptomId> {
        kb.resolve_phrase(phrase)
            .cloned()
            .or_else(|| self.lexicon.aliases.get(phrase).cloned())
    }

    fn resolve_fuzzy(
        &self,
        clause: &Clause<'_>,
        start: usize,
        end: usize,
        kb: &dyn KnowledgeBase,
    ) -> Option<(usize, SymptomId, f64)> {
        let tokens = &clause.tokens;
        if self.lexicon.is_structural(&tokens[start].text)
            || self.lexicon.is_structural(&tokens[end - 1].text)
        {
            return None;
        }
        let span = clause.span(start, end);
        if span.chars().count() < MIN_FUZZY_CHARS {
            return None;
        }
        let aliases = self
            .lexicon
            .aliases
            .iter()
            .map(|(phrase, id)| (phrase.as_str(), id));
        let (symptom, score) =
            fuzzy::best_match(&span, kb.phrases().chain(aliases), self.settings.fuzzy_threshold)?;
        debug!(span = %span, symptom = %symptom, similarity = score, "fuzzy match");
        Some((end - start, symptom.clone(), score))
    }

    /// Read the marker window around `m` and build its observation.
    fn observe(
        &self,
        clause: &Clause<'_>,
        m: &PhraseMatch,
        before_limit: usize,
        after_limit: usize,
        carried_negation: bool,
    ) -> SymptomObservation {
        let before = self.window_before(&clause.tokens, m.start, before_limit);
        let after = self.window_after(&clause.tokens, m.end, after_limit);

        // A negation followed by an uncertainty word ("not sure") hedges.
        let mut negated = carried_negation;
        let mut hedged = false;
        for (k, token) in before.iter().enumerate() {
            if self.lexicon.hedges.contains(*token) {
                hedged = true;
            } else if self.lexicon.negation_before.contains(*token) {
                match before.get(k + 1) {
                    Some(next) if self.lexicon.uncertain.contains(*next) => hedged = true,
                    _ => negated = true,
                }
            }
        }
        negated = negated
            || after
                .iter()
                .any(|t| self.lexicon.negation_after.contains(*t));
        if negated {
            return SymptomObservation::absent(m.symptom.clone());
        }

        // Nearest modifier wins, looking backwards first.
        let severity = before
            .iter()
            .rev()
            .chain(after.iter())
            .find_map(|t| self.lexicon.severity_of(t))
            .unwrap_or(self.settings.default_severity);

        let certainty = if hedged {
            m.certainty * self.settings.hedge_certainty
        } else {
            m.certainty
        };

        SymptomObservation::present(m.symptom.clone(), severity).with_certainty(certainty)
    }

    /// The last `negation_window` non-filler tokens in `[limit, start)`, in
    /// reading order.
    fn window_before<'t>(&self, tokens: &'t [Token], start: usize, limit: usize) -> Vec<&'t str> {
        let mut window: Vec<&str> = tokens[limit..start]
            .iter()
            .rev()
            .map(|t| t.text.as_str())
            .filter(|t| !self.lexicon.filler.contains(*t))
            .take(self.settings.negation_window)
            .collect();
        window.reverse();
        window
    }

    /// The first `negation_window` non-filler tokens in `[end, limit)`.
    fn window_after<'t>(&self, tokens: &'t [Token], end: usize, limit: usize) -> Vec<&'t str> {
        tokens[end..limit]
            .iter()
            .map(|t| t.text.as_str())
            .filter(|t| !self.lexicon.filler.contains(*t))
            .take(self.settings.negation_window)
            .collect()
    }

    /// Token count of the longest known phrase.
    fn max_phrase_tokens(&self, kb: &dyn KnowledgeBase) -> usize {
        let aliases = self.lexicon.aliases.keys().map(String::as_str);
        kb.phrases()
            .map(|(phrase, _)| phrase)
            .chain(aliases)
            .map(|phrase| phrase.split_whitespace().count())
            .max()
            .unwrap_or(1)
            .max(1)
    }
}

impl Normalizer for SymptomNormalizer {
    fn normalize(&self, input: &RawInput, kb: &dyn KnowledgeBase) -> TriageResult<NormalizeOutcome> {
        let outcome = match input {
            RawInput::Text(text) => self.normalize_text(text, kb),
            RawInput::Tags(tags) => self.normalize_tags(tags, kb),
        };

        if outcome.observations.is_empty() && outcome.unparsed_fragments.is_empty() {
            debug!(warnings = outcome.warnings.len(), "no usable symptom information");
            return Err(TriageError::EmptyInput);
        }

        debug!(
            observations = outcome.observations.len(),
            fragments = outcome.unparsed_fragments.len(),
            warnings = outcome.warnings.len(),
            "normalized input"
        );
        Ok(outcome)
    }
}
