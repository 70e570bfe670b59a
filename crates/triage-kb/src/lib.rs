//! # triage-kb
//!
//! The condition knowledge base: symptom vocabulary, condition profiles, and
//! red flags, loaded from TOML or JSON and validated before anything serves.
//!
//! ## Overview
//!
//! [`IndexedKnowledgeBase`] implements the
//! [`KnowledgeBase`](triage_core::traits::KnowledgeBase) trait. It is
//! immutable once built. Updating it means loading a new document and
//! publishing it through a [`KnowledgeBaseHandle`], which swaps the base
//! atomically for subsequent turns.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::PathBuf;
//! use triage_kb::{load, KnowledgeBaseHandle, KnowledgeSource};
//!
//! let kb = load(&KnowledgeSource::File(PathBuf::from("knowledge/reference.toml")))?;
//! let handle = KnowledgeBaseHandle::new(kb);
//! let kb_for_this_turn = handle.current();
//! ```

pub mod handle;
pub mod index;
pub mod source;

pub use handle::KnowledgeBaseHandle;
pub use index::{load, IndexedKnowledgeBase};
pub use source::{KnowledgeDocument, KnowledgeSource};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Arc;

    use triage_contracts::{
        condition::ConditionId, error::TriageError, symptom::SymptomId,
    };
    use triage_core::traits::KnowledgeBase;

    use crate::{index::VOCABULARY, IndexedKnowledgeBase, KnowledgeBaseHandle, KnowledgeSource};

    // ── Helpers ───────────────────────────────────────────────────────────────

    const RESPIRATORY: &str = r#"
        [[symptoms]]
        id = "fever"
        label = "Fever"
        synonyms = ["high temperature", "feverish"]

        [[symptoms]]
        id = "cough"

        [[symptoms]]
        id = "congestion"
        synonyms = ["stuffy nose", "blocked nose"]

        [[symptoms]]
        id = "chest_pain"

        [[symptoms]]
        id = "shortness_of_breath"
        synonyms = ["breathless", "can't breathe"]

        [[conditions]]
        id = "flu"
        name = "Influenza"
        base_rate = 0.05
        weights = { fever = 0.6, cough = 0.4 }
        guidelines = ["CDC"]

        [[conditions]]
        id = "common_cold"
        name = "Common cold"
        weights = { cough = 0.3, congestion = 0.7 }

        [[conditions]]
        id = "cardiac_event"
        requires_clinician = true
        weights = { chest_pain = 0.7, shortness_of_breath = 0.3 }

        [[conditions.red_flags]]
        symptoms = ["chest_pain", "shortness_of_breath"]
        note = "possible acute coronary syndrome"
    "#;

    fn respiratory() -> IndexedKnowledgeBase {
        IndexedKnowledgeBase::from_toml_str(RESPIRATORY).unwrap()
    }

    fn expect_malformed(toml: &str) -> (String, String) {
        match IndexedKnowledgeBase::from_toml_str(toml) {
            Err(TriageError::MalformedProfile { condition, reason }) => (condition, reason),
            other => panic!("expected MalformedProfile, got {:?}", other),
        }
    }

    fn set(ids: &[&str]) -> BTreeSet<ConditionId> {
        ids.iter().map(|s| ConditionId::from(*s)).collect()
    }

    // ── 1. loading and lookups ────────────────────────────────────────────────

    #[test]
    fn test_loads_and_counts() {
        let kb = respiratory();
        assert_eq!(kb.condition_count(), 3);
        assert_eq!(kb.symptom_count(), 5);
        assert!(kb.contains_symptom(&SymptomId::from("fever")));
        assert!(!kb.contains_symptom(&SymptomId::from("rash")));
    }

    #[test]
    fn test_profiles_iterate_in_id_order() {
        let kb = respiratory();
        let ids: Vec<&str> = kb.profiles().map(|p| p.condition.as_str()).collect();
        assert_eq!(ids, vec!["cardiac_event", "common_cold", "flu"]);
    }

    #[test]
    fn test_profile_fields_survive_loading() {
        let kb = respiratory();
        let flu = kb.profile(&ConditionId::from("flu")).unwrap();
        assert_eq!(flu.name, "Influenza");
        assert_eq!(flu.base_rate, 0.05);
        assert_eq!(flu.guidelines, vec!["CDC".to_string()]);
        assert!((flu.total_weight() - 1.0).abs() < 1e-12);

        let cardiac = kb.profile(&ConditionId::from("cardiac_event")).unwrap();
        assert!(cardiac.requires_clinician);
        assert_eq!(cardiac.red_flags.len(), 1);
        assert_eq!(
            cardiac.red_flags[0].describe(),
            "chest_pain + shortness_of_breath"
        );
    }

    // ── 2. inverse index ──────────────────────────────────────────────────────

    #[test]
    fn test_conditions_referencing() {
        let kb = respiratory();
        assert_eq!(
            kb.conditions_referencing(&SymptomId::from("cough")),
            set(&["common_cold", "flu"])
        );
        assert_eq!(
            kb.conditions_referencing(&SymptomId::from("fever")),
            set(&["flu"])
        );
        assert!(kb
            .conditions_referencing(&SymptomId::from("rash"))
            .is_empty());
    }

    #[test]
    fn test_zero_weight_is_not_indexed_as_evidence() {
        let kb = IndexedKnowledgeBase::from_toml_str(
            r#"
            [[symptoms]]
            id = "fever"
            [[symptoms]]
            id = "cough"

            [[conditions]]
            id = "flu"
            weights = { fever = 1.0, cough = 0.0 }
            "#,
        )
        .unwrap();
        assert!(kb
            .conditions_referencing(&SymptomId::from("cough"))
            .is_empty());
        // Still part of the profile.
        assert!(kb
            .symptoms_for(&ConditionId::from("flu"))
            .contains(&SymptomId::from("cough")));
    }

    #[test]
    fn test_symptoms_for_unknown_condition_is_empty() {
        let kb = respiratory();
        assert!(kb.symptoms_for(&ConditionId::from("plague")).is_empty());
    }

    // ── 3. phrase resolution ──────────────────────────────────────────────────

    #[test]
    fn test_resolve_synonyms_labels_and_ids() {
        let kb = respiratory();
        let resolve = |p: &str| kb.resolve_phrase(p).map(|s| s.as_str().to_string());

        assert_eq!(resolve("high temperature").as_deref(), Some("fever"));
        assert_eq!(resolve("Fever").as_deref(), Some("fever"));
        assert_eq!(resolve("shortness of breath").as_deref(), Some("shortness_of_breath"));
        assert_eq!(resolve("  Stuffy   Nose ").as_deref(), Some("congestion"));
        assert_eq!(resolve("rash"), None);
    }

    #[test]
    fn test_phrases_are_sorted() {
        let kb = respiratory();
        let phrases: Vec<&str> = kb.phrases().map(|(p, _)| p).collect();
        let mut sorted = phrases.clone();
        sorted.sort();
        assert_eq!(phrases, sorted);
        assert!(phrases.contains(&"breathless"));
    }

    #[test]
    fn test_label_falls_back_to_id() {
        let kb = respiratory();
        let fever = SymptomId::from("fever");
        let cough = SymptomId::from("cough");
        assert_eq!(kb.label(&fever), "Fever");
        assert_eq!(kb.label(&cough), "cough");
    }

    // ── 4. validation ─────────────────────────────────────────────────────────

    #[test]
    fn test_negative_weight_is_malformed() {
        let (condition, reason) = expect_malformed(
            r#"
            [[symptoms]]
            id = "fever"
            [[conditions]]
            id = "flu"
            weights = { fever = -0.2 }
            "#,
        );
        assert_eq!(condition, "flu");
        assert!(reason.contains("non-negative"), "got: {reason}");
    }

    #[test]
    fn test_all_zero_weights_are_malformed() {
        let (condition, reason) = expect_malformed(
            r#"
            [[symptoms]]
            id = "fever"
            [[conditions]]
            id = "flu"
            weights = { fever = 0.0 }
            "#,
        );
        assert_eq!(condition, "flu");
        assert!(reason.contains("positive weight"), "got: {reason}");
    }

    #[test]
    fn test_unknown_symptom_in_profile_is_malformed() {
        let (condition, reason) = expect_malformed(
            r#"
            [[symptoms]]
            id = "fever"
            [[conditions]]
            id = "flu"
            weights = { fever = 0.5, sneezing = 0.5 }
            "#,
        );
        assert_eq!(condition, "flu");
        assert!(reason.contains("sneezing"), "got: {reason}");
    }

    #[test]
    fn test_base_rate_out_of_range_is_malformed() {
        let (_, reason) = expect_malformed(
            r#"
            [[symptoms]]
            id = "fever"
            [[conditions]]
            id = "flu"
            base_rate = 1.5
            weights = { fever = 1.0 }
            "#,
        );
        assert!(reason.contains("base_rate"), "got: {reason}");
    }

    #[test]
    fn test_empty_red_flag_is_malformed() {
        let (condition, reason) = expect_malformed(
            r#"
            [[symptoms]]
            id = "chest_pain"
            [[conditions]]
            id = "cardiac_event"
            weights = { chest_pain = 1.0 }
            [[conditions.red_flags]]
            symptoms = []
            "#,
        );
        assert_eq!(condition, "cardiac_event");
        assert!(reason.contains("red flag #1"), "got: {reason}");
    }

    #[test]
    fn test_duplicate_condition_is_rejected() {
        let result = IndexedKnowledgeBase::from_toml_str(
            r#"
            [[symptoms]]
            id = "fever"
            [[conditions]]
            id = "flu"
            weights = { fever = 1.0 }
            [[conditions]]
            id = "flu"
            weights = { fever = 0.5 }
            "#,
        );
        assert_eq!(
            result.unwrap_err(),
            TriageError::DuplicateCondition {
                condition: "flu".to_string()
            }
        );
    }

    #[test]
    fn test_conflicting_synonym_is_a_vocabulary_error() {
        let (condition, reason) = expect_malformed(
            r#"
            [[symptoms]]
            id = "fever"
            synonyms = ["hot"]
            [[symptoms]]
            id = "flushing"
            synonyms = ["hot"]
            [[conditions]]
            id = "flu"
            weights = { fever = 1.0 }
            "#,
        );
        assert_eq!(condition, VOCABULARY);
        assert!(reason.contains("'hot'"), "got: {reason}");
    }

    #[test]
    fn test_duplicate_symptom_id_is_a_vocabulary_error() {
        let (condition, _) = expect_malformed(
            r#"
            [[symptoms]]
            id = "fever"
            [[symptoms]]
            id = "fever"
            [[conditions]]
            id = "flu"
            weights = { fever = 1.0 }
            "#,
        );
        assert_eq!(condition, VOCABULARY);
    }

    #[test]
    fn test_no_conditions_is_rejected() {
        let result = IndexedKnowledgeBase::from_toml_str(
            r#"
            [[symptoms]]
            id = "fever"
            "#,
        );
        assert!(matches!(result, Err(TriageError::KnowledgeSource { .. })));
    }

    #[test]
    fn test_toml_parse_error() {
        match IndexedKnowledgeBase::from_toml_str("this is not valid toml ][[[") {
            Err(TriageError::KnowledgeSource { reason }) => {
                assert!(
                    reason.contains("failed to parse knowledge base TOML"),
                    "expected parse error message, got: {reason}"
                );
            }
            other => panic!("expected KnowledgeSource, got {:?}", other),
        }
    }

    // ── 5. sources ────────────────────────────────────────────────────────────

    #[test]
    fn test_json_source() {
        let json = r#"{
            "symptoms": [{ "id": "fever" }, { "id": "cough" }],
            "conditions": [
                { "id": "flu", "weights": { "fever": 0.6, "cough": 0.4 } }
            ]
        }"#;
        let kb = crate::load(&KnowledgeSource::Json(json.to_string())).unwrap();
        assert_eq!(kb.condition_count(), 1);
        assert_eq!(
            kb.resolve_phrase("cough"),
            Some(&SymptomId::from("cough"))
        );
    }

    #[test]
    fn test_file_source_and_missing_file() {
        let path = std::env::temp_dir().join(format!(
            "triage-kb-test-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, RESPIRATORY).unwrap();
        let kb = crate::load(&KnowledgeSource::File(path.clone())).unwrap();
        assert_eq!(kb.condition_count(), 3);
        std::fs::remove_file(&path).unwrap();

        match crate::load(&KnowledgeSource::File(path)) {
            Err(TriageError::KnowledgeSource { reason }) => {
                assert!(reason.contains("failed to read knowledge base"));
            }
            other => panic!("expected KnowledgeSource, got {:?}", other),
        }
    }

    // ── 6. hot reload ─────────────────────────────────────────────────────────

    #[test]
    fn test_reload_swaps_for_new_readers_only() {
        let handle = KnowledgeBaseHandle::new(respiratory());
        let in_flight = handle.current();

        let replacement = r#"
            [[symptoms]]
            id = "fever"
            [[conditions]]
            id = "flu"
            weights = { fever = 1.0 }
        "#;
        handle
            .reload(&KnowledgeSource::Toml(replacement.to_string()))
            .unwrap();

        assert_eq!(in_flight.condition_count(), 3, "old snapshot is untouched");
        assert_eq!(handle.current().condition_count(), 1);
    }

    #[test]
    fn test_failed_reload_keeps_previous_base() {
        let handle = KnowledgeBaseHandle::new(respiratory());
        let bad = r#"
            [[symptoms]]
            id = "fever"
            [[conditions]]
            id = "flu"
            weights = { fever = -1.0 }
        "#;
        let result = handle.reload(&KnowledgeSource::Toml(bad.to_string()));
        assert!(matches!(result, Err(TriageError::MalformedProfile { .. })));
        assert_eq!(handle.current().condition_count(), 3);
    }

    #[test]
    fn test_reload_returns_the_base_it_published() {
        let handle = KnowledgeBaseHandle::new(respiratory());
        let single = KnowledgeSource::Toml(
            r#"
            [[symptoms]]
            id = "fever"
            [[conditions]]
            id = "flu"
            weights = { fever = 1.0 }
            "#
            .to_string(),
        );

        let reloaded = handle.reload(&single).unwrap();
        assert!(Arc::ptr_eq(&reloaded, &handle.current()));

        // Concurrent publishers never leak into what reload returns.
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..50 {
                        handle.publish(respiratory());
                    }
                });
            }
            for _ in 0..50 {
                let reloaded = handle.reload(&single).unwrap();
                assert_eq!(reloaded.condition_count(), 1);
            }
        });
    }

    #[test]
    fn test_publish_returns_previous() {
        let handle = KnowledgeBaseHandle::new(respiratory());
        let single = IndexedKnowledgeBase::from_toml_str(
            r#"
            [[symptoms]]
            id = "fever"
            [[conditions]]
            id = "flu"
            weights = { fever = 1.0 }
            "#,
        )
        .unwrap();
        let previous = handle.publish(single);
        assert_eq!(previous.condition_count(), 3);
        assert_eq!(handle.current().condition_count(), 1);
    }
}
