//! Weighted-overlap scorer.
//!
//! For each condition that shares at least one present symptom with the
//! observations:
//!
//! ```text
//! raw   = Σ matched  weight · certainty · severity_factor
//!       − Σ excluded weight · exclusion_penalty
//!       + base_rate
//! score = clamp(raw / Σ weight, 0, 1)
//! ```
//!
//! Conditions with no present overlap are never emitted, whatever their
//! base rate. Output is ordered by score descending, ties by condition id
//! ascending, and truncated to `top_k`.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use tracing::debug;

use triage_contracts::{
    analysis::RankedCandidate,
    condition::{ConditionId, ConditionProfile},
    config::ScoringSettings,
    symptom::ObservationSet,
};
use triage_core::traits::{KnowledgeBase, Scorer};

#[derive(Debug, Clone, Default)]
pub struct WeightedOverlapScorer {
    settings: ScoringSettings,
}

impl WeightedOverlapScorer {
    pub fn new(settings: ScoringSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ScoringSettings {
        &self.settings
    }

    /// Score one profile against `observations`, without any ranking.
    pub fn score_profile(
        &self,
        profile: &ConditionProfile,
        observations: &ObservationSet,
    ) -> RankedCandidate {
        let mut raw = profile.base_rate;
        let mut matched_symptoms = BTreeSet::new();
        let mut contradicted_symptoms = BTreeSet::new();

        for (symptom, &weight) in &profile.symptom_weights {
            if weight <= 0.0 {
                continue;
            }
            let Some(observation) = observations.get(symptom) else {
                continue;
            };
            if observation.is_excluded() {
                raw -= weight * self.settings.exclusion_penalty;
                contradicted_symptoms.insert(symptom.clone());
            } else {
                let factor = self.settings.severity_factors.factor(observation.severity);
                raw += weight * observation.certainty * factor;
                matched_symptoms.insert(symptom.clone());
            }
        }

        let threshold = key_threshold(profile, self.settings.key_symptom_percentile);
        let missing_key_symptoms = profile
            .symptom_weights
            .iter()
            .filter(|(symptom, weight)| {
                **weight > 0.0 && **weight >= threshold && !observations.contains(symptom)
            })
            .map(|(symptom, _)| symptom.clone())
            .collect();

        let total = profile.total_weight();
        let score = if total > 0.0 {
            (raw / total).clamp(0.0, 1.0)
        } else {
            0.0
        };

        RankedCandidate {
            condition: profile.condition.clone(),
            score,
            matched_symptoms,
            missing_key_symptoms,
            contradicted_symptoms,
        }
    }
}

impl Scorer for WeightedOverlapScorer {
    fn score(&self, observations: &ObservationSet, kb: &dyn KnowledgeBase) -> Vec<RankedCandidate> {
        let candidates: BTreeSet<ConditionId> = observations
            .present()
            .flat_map(|o| kb.conditions_referencing(&o.symptom))
            .collect();

        let mut ranked: Vec<RankedCandidate> = candidates
            .iter()
            .filter_map(|condition| kb.profile(condition))
            .map(|profile| self.score_profile(profile, observations))
            .collect();

        ranked.sort_by(rank_order);
        let considered = ranked.len();
        ranked.truncate(self.settings.top_k);

        debug!(
            observations = observations.len(),
            considered,
            returned = ranked.len(),
            top = ranked.first().map(|c| c.condition.as_str()).unwrap_or("-"),
            top_score = ranked.first().map_or(0.0, |c| c.score),
            "scored candidates"
        );
        ranked
    }
}

/// Score descending, then condition id ascending.
fn rank_order(a: &RankedCandidate, b: &RankedCandidate) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.condition.cmp(&b.condition))
}

/// The `percentile` of the profile's weights, lower-rank interpolation.
///
/// With weights sorted ascending, this is the weight at index
/// `floor(percentile · (n − 1))`. A weight at or above it is "key".
pub fn key_threshold(profile: &ConditionProfile, percentile: f64) -> f64 {
    let mut weights: Vec<f64> = profile.symptom_weights.values().copied().collect();
    if weights.is_empty() {
        return f64::INFINITY;
    }
    weights.sort_by(f64::total_cmp);
    let rank = (percentile.clamp(0.0, 1.0) * (weights.len() - 1) as f64).floor() as usize;
    weights[rank.min(weights.len() - 1)]
}
