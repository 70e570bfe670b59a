//! # triage-contracts
//!
//! Shared types, configuration, and error taxonomy for the symptom triage core.
//!
//! All crates in the workspace import from here. No scoring, parsing, or
//! gating logic lives in this crate, only data definitions, config
//! validation, and error types.

pub mod analysis;
pub mod condition;
pub mod config;
pub mod error;
pub mod session;
pub mod symptom;

#[cfg(test)]
mod tests {
    use super::*;
    use analysis::{EscalationSignal, RecommendedAction};
    use config::AnalysisConfig;
    use error::TriageError;
    use session::{SessionId, SessionState};
    use symptom::{ObservationSet, Severity, SymptomId, SymptomObservation};

    // ── ObservationSet ───────────────────────────────────────────────────────

    #[test]
    fn observation_set_latest_wins_per_symptom() {
        let mut set = ObservationSet::new();
        set.insert(SymptomObservation::present("fever", Severity::Mild));
        let replaced = set.insert(SymptomObservation::absent("fever"));

        assert_eq!(set.len(), 1, "one entry per symptom");
        assert_eq!(replaced.unwrap().severity, Severity::Mild);
        assert!(set.get(&SymptomId::from("fever")).unwrap().is_excluded());
    }

    #[test]
    fn observation_set_splits_present_and_excluded() {
        let set: ObservationSet = vec![
            SymptomObservation::present("cough", Severity::Mild),
            SymptomObservation::absent("fever"),
            SymptomObservation::present("headache", Severity::Severe).with_certainty(0.0),
        ]
        .into_iter()
        .collect();

        let present: Vec<&str> = set.present().map(|o| o.symptom.as_str()).collect();
        let excluded: Vec<&str> = set.excluded().map(|o| o.symptom.as_str()).collect();

        assert_eq!(present, vec!["cough"]);
        // Zero certainty counts as an exclusion even without the flag.
        assert_eq!(excluded, vec!["fever", "headache"]);
    }

    #[test]
    fn with_certainty_clamps() {
        let obs = SymptomObservation::present("cough", Severity::Mild).with_certainty(1.7);
        assert_eq!(obs.certainty, 1.0);
        let obs = obs.with_certainty(-0.2);
        assert_eq!(obs.certainty, 0.0);
        assert!(obs.is_excluded());
    }

    #[test]
    fn severity_is_ordered() {
        assert!(Severity::Mild < Severity::Moderate);
        assert!(Severity::Moderate < Severity::Severe);
        assert_eq!(Severity::default(), Severity::Moderate);
    }

    #[test]
    fn observation_set_serializes_as_map() {
        let set: ObservationSet = vec![SymptomObservation::present("cough", Severity::Mild)]
            .into_iter()
            .collect();
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json["cough"]["severity"], "mild");
        let decoded: ObservationSet = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, set);
    }

    // ── SessionState ─────────────────────────────────────────────────────────

    #[test]
    fn session_ids_are_unique() {
        let ids: std::collections::HashSet<String> =
            (0..100).map(|_| SessionId::new().to_string()).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn fresh_session_has_genesis_head_and_no_snapshots() {
        let session = SessionState::new();
        assert!(session.observations.is_empty());
        assert_eq!(session.head_hash(), session::SessionSnapshot::GENESIS_HASH);
        assert!(session.snapshot_back(0).is_none());
    }

    // ── EscalationSignal ─────────────────────────────────────────────────────

    #[test]
    fn default_escalation_is_not_triggered() {
        let signal = EscalationSignal::none();
        assert!(!signal.triggered);
        assert_eq!(signal.recommended_action, RecommendedAction::None);
        assert!(signal.reason.is_none());
    }

    #[test]
    fn recommended_action_serializes_snake_case() {
        let json = serde_json::to_string(&RecommendedAction::AdviseClinician).unwrap();
        assert_eq!(json, "\"advise_clinician\"");
    }

    // ── AnalysisConfig ───────────────────────────────────────────────────────

    #[test]
    fn default_config_is_valid() {
        let config = AnalysisConfig::default();
        config.validate().unwrap();
        assert_eq!(config.scoring.top_k, 5);
        assert_eq!(config.scoring.exclusion_penalty, 0.5);
        assert_eq!(config.scoring.key_symptom_percentile, 0.75);
        assert_eq!(config.normalizer.fuzzy_threshold, 0.85);
        assert_eq!(config.safety.high_confidence_threshold, 0.85);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = AnalysisConfig::from_toml_str(
            r#"
            [scoring]
            top_k = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.scoring.top_k, 3);
        assert_eq!(config.scoring.exclusion_penalty, 0.5);
        assert_eq!(config.normalizer.negation_window, 3);
    }

    #[test]
    fn negative_penalty_is_invalid() {
        let result = AnalysisConfig::from_toml_str(
            r#"
            [scoring]
            exclusion_penalty = -0.5
            "#,
        );
        match result {
            Err(TriageError::InvalidConfiguration { reason }) => {
                assert!(reason.contains("exclusion_penalty"), "got: {reason}");
            }
            other => panic!("expected InvalidConfiguration, got {:?}", other),
        }
    }

    #[test]
    fn zero_top_k_is_invalid() {
        let mut config = AnalysisConfig::default();
        config.scoring.top_k = 0;
        assert!(matches!(
            config.validate(),
            Err(TriageError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn threshold_above_one_is_invalid() {
        let mut config = AnalysisConfig::default();
        config.safety.high_confidence_threshold = 1.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("high_confidence_threshold"));
    }

    #[test]
    fn malformed_config_toml_is_invalid_configuration() {
        let result = AnalysisConfig::from_toml_str("this is not [[ toml");
        match result {
            Err(TriageError::InvalidConfiguration { reason }) => {
                assert!(reason.contains("failed to parse config TOML"));
            }
            other => panic!("expected InvalidConfiguration, got {:?}", other),
        }
    }

    // ── TriageError display messages ─────────────────────────────────────────

    #[test]
    fn error_unknown_symptom_display() {
        let err = TriageError::UnknownSymptom {
            symptom: "blurgh".to_string(),
        };
        assert!(err.to_string().contains("blurgh"));
        assert!(err.is_recoverable());
    }

    #[test]
    fn error_malformed_profile_display() {
        let err = TriageError::MalformedProfile {
            condition: "flu".to_string(),
            reason: "no positive weight".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("flu"));
        assert!(msg.contains("no positive weight"));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn error_duplicate_condition_display() {
        let err = TriageError::DuplicateCondition {
            condition: "flu".to_string(),
        };
        assert!(err.to_string().contains("duplicate condition 'flu'"));
    }

    #[test]
    fn error_empty_input_is_recoverable() {
        assert!(TriageError::EmptyInput.is_recoverable());
        assert!(!TriageError::InvalidConfiguration {
            reason: "x".to_string()
        }
        .is_recoverable());
    }
}
