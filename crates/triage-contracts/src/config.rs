//! Tunable thresholds for the analysis pipeline.
//!
//! Every knob has a documented default; there are no hidden constants in the
//! scoring or gating code. A config file only needs the keys it overrides:
//!
//! ```toml
//! [normalizer]
//! fuzzy_threshold = 0.9
//!
//! [scoring]
//! top_k = 3
//! exclusion_penalty = 0.5
//!
//! [safety]
//! high_confidence_threshold = 0.85
//! ```
//!
//! Values are clinical-tuning defaults, not requirements. Validate with
//! `AnalysisConfig::validate()`, which `from_toml_str` calls for you.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    error::{TriageError, TriageResult},
    symptom::Severity,
};

/// Top-level configuration, one section per pipeline stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub normalizer: NormalizerSettings,
    pub scoring: ScoringSettings,
    pub safety: SafetySettings,
}

/// Symptom Normalizer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerSettings {
    /// Minimum similarity (1 − edit distance / length) for a fuzzy phrase match.
    pub fuzzy_threshold: f64,
    /// Tokens inspected on each side of a phrase for negation/severity markers.
    pub negation_window: usize,
    /// Certainty multiplier when a hedge ("maybe", "I think") precedes a phrase.
    pub hedge_certainty: f64,
    /// Severity assigned when the user gives no modifier.
    pub default_severity: Severity,
}

impl Default for NormalizerSettings {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 0.85,
            negation_window: 3,
            hedge_certainty: 0.5,
            default_severity: Severity::Moderate,
        }
    }
}

/// Matcher/Scorer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSettings {
    /// Fraction of a symptom's weight subtracted when the user denies it.
    pub exclusion_penalty: f64,
    /// Percentile of a profile's weights at or above which a symptom is "key".
    pub key_symptom_percentile: f64,
    /// Maximum number of candidates returned.
    pub top_k: usize,
    pub severity_factors: SeverityFactors,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            exclusion_penalty: 0.5,
            key_symptom_percentile: 0.75,
            top_k: 5,
            severity_factors: SeverityFactors::default(),
        }
    }
}

/// Multipliers applied to matched symptom weights by reported severity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityFactors {
    pub mild: f64,
    pub moderate: f64,
    pub severe: f64,
}

impl SeverityFactors {
    pub fn factor(&self, severity: Severity) -> f64 {
        match severity {
            Severity::Mild => self.mild,
            Severity::Moderate => self.moderate,
            Severity::Severe => self.severe,
        }
    }
}

impl Default for SeverityFactors {
    fn default() -> Self {
        Self {
            mild: 0.6,
            moderate: 0.8,
            severe: 1.0,
        }
    }
}

/// Safety Gate and response-framing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetySettings {
    /// Top score above which a `requires_clinician` condition triggers advice.
    pub high_confidence_threshold: f64,
    /// Top score below which the answer is framed as low confidence.
    pub low_confidence_threshold: f64,
}

impl Default for SafetySettings {
    fn default() -> Self {
        Self {
            high_confidence_threshold: 0.85,
            low_confidence_threshold: 0.4,
        }
    }
}

impl AnalysisConfig {
    /// Parse `s` as TOML, fill unset keys with defaults, and validate.
    ///
    /// Returns `TriageError::InvalidConfiguration` for malformed TOML and for
    /// any value outside its valid range.
    pub fn from_toml_str(s: &str) -> TriageResult<Self> {
        let config: AnalysisConfig =
            toml::from_str(s).map_err(|e| TriageError::InvalidConfiguration {
                reason: format!("failed to parse config TOML: {}", e),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Read the file at `path` and parse it with `from_toml_str`.
    pub fn from_file(path: &Path) -> TriageResult<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| TriageError::InvalidConfiguration {
                reason: format!("failed to read config file '{}': {}", path.display(), e),
            })?;
        Self::from_toml_str(&contents)
    }

    /// Check every threshold against its valid range.
    pub fn validate(&self) -> TriageResult<()> {
        let n = &self.normalizer;
        in_range("normalizer.fuzzy_threshold", n.fuzzy_threshold, 0.0, 1.0, false)?;
        in_range("normalizer.hedge_certainty", n.hedge_certainty, 0.0, 1.0, false)?;
        if n.negation_window == 0 {
            return Err(invalid("normalizer.negation_window must be at least 1"));
        }

        let s = &self.scoring;
        if !s.exclusion_penalty.is_finite() || s.exclusion_penalty <= 0.0 {
            return Err(invalid(format!(
                "scoring.exclusion_penalty must be a positive number, got {}",
                s.exclusion_penalty
            )));
        }
        in_range(
            "scoring.key_symptom_percentile",
            s.key_symptom_percentile,
            0.0,
            1.0,
            true,
        )?;
        if s.top_k == 0 {
            return Err(invalid("scoring.top_k must be at least 1"));
        }
        let f = &s.severity_factors;
        in_range("scoring.severity_factors.mild", f.mild, 0.0, 1.0, false)?;
        in_range("scoring.severity_factors.moderate", f.moderate, 0.0, 1.0, false)?;
        in_range("scoring.severity_factors.severe", f.severe, 0.0, 1.0, false)?;

        let g = &self.safety;
        in_range(
            "safety.high_confidence_threshold",
            g.high_confidence_threshold,
            0.0,
            1.0,
            false,
        )?;
        in_range(
            "safety.low_confidence_threshold",
            g.low_confidence_threshold,
            0.0,
            1.0,
            true,
        )?;

        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> TriageError {
    TriageError::InvalidConfiguration {
        reason: reason.into(),
    }
}

/// `value` must lie in `(low, high]`, or `[low, high]` when `low_inclusive`.
fn in_range(name: &str, value: f64, low: f64, high: f64, low_inclusive: bool) -> TriageResult<()> {
    let above_low = if low_inclusive { value >= low } else { value > low };
    if value.is_finite() && above_low && value <= high {
        Ok(())
    } else {
        let open = if low_inclusive { '[' } else { '(' };
        Err(invalid(format!(
            "{name} must be in {open}{low}, {high}], got {value}"
        )))
    }
}
