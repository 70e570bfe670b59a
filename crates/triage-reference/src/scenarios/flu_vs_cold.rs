//! Scenario 1: Flu vs Cold
//!
//! Two turns of respiratory complaints in one session:
//!
//!   Turn 1: fever, a bad cough for two days, body aches
//!           → influenza leads; the cold trails and is missing its key
//!             symptoms (congestion, sneezing, sore throat)
//!   Turn 2: no runny nose, no sneezing, exhausted
//!           → the denials count against the cold; fatigue adds to flu
//!
//! Neither turn escalates: influenza does not require a clinician and no red
//! flag combination is present.

use triage_contracts::{
    analysis::{RawInput, TurnReport},
    error::TriageResult,
};
use triage_kb::IndexedKnowledgeBase;

use super::{play, print_turn};

/// The user's messages, in order.
pub fn turns() -> Vec<RawInput> {
    vec![
        RawInput::text("I've had a fever and a bad cough for two days, and body aches"),
        RawInput::text("No runny nose, no sneezing, but I'm exhausted"),
    ]
}

/// Run the turns and return every report.
pub fn run() -> TriageResult<(IndexedKnowledgeBase, Vec<TurnReport>)> {
    play(&turns())
}

/// Run Scenario 1: Flu vs Cold.
pub fn run_scenario() -> TriageResult<()> {
    println!("=== Scenario 1: Flu vs Cold ===");
    println!();

    let inputs = turns();
    let (kb, reports) = run()?;
    for (i, (input, report)) in inputs.iter().zip(&reports).enumerate() {
        print_turn(i + 1, input, report, &kb);
        println!();
    }

    if let Some(last) = reports.last() {
        let leader = last
            .candidates
            .first()
            .map(|c| c.condition.as_str())
            .unwrap_or("-");
        println!("  Leading candidate:      {}", leader);
        println!("  Disclaimer:             {}", last.disclaimer);
    }
    println!("  Scenario 1 complete.");
    println!();
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use triage_contracts::{
        analysis::{RankedCandidate, RecommendedAction, ResponseFraming},
        condition::ConditionId,
        symptom::{Severity, SymptomId},
    };
    use triage_core::traits::KnowledgeBase;
    use triage_score::WeightedOverlapScorer;

    use super::*;

    fn find<'a>(report: &'a TurnReport, condition: &str) -> &'a RankedCandidate {
        report
            .candidates
            .iter()
            .find(|c| c.condition.as_str() == condition)
            .unwrap_or_else(|| panic!("{} not among candidates", condition))
    }

    #[test]
    fn test_first_turn_ranks_flu_above_cold() {
        let (_, reports) = run().unwrap();
        let first = &reports[0];

        assert_eq!(first.candidates[0].condition.as_str(), "flu");
        let flu = find(first, "flu");
        let cold = find(first, "common_cold");
        assert!(flu.score > cold.score);
        assert!((flu.score - 0.58).abs() < 1e-9, "flu scored {}", flu.score);
        assert!(cold
            .missing_key_symptoms
            .contains(&SymptomId::from("congestion")));
    }

    #[test]
    fn test_first_turn_reads_severity_and_onset() {
        let (_, reports) = run().unwrap();
        let observations = &reports[0].session.observations;

        let cough = observations.get(&SymptomId::from("cough")).unwrap();
        assert_eq!(cough.severity, Severity::Moderate);
        let fever = observations.get(&SymptomId::from("fever")).unwrap();
        assert_eq!(fever.onset.map(|d| d.as_secs()), Some(2 * 86_400));
        assert!(observations.is_present(&SymptomId::from("body_aches")));
    }

    #[test]
    fn test_denials_push_the_cold_down() {
        let (kb, reports) = run().unwrap();
        let before = find(&reports[0], "common_cold").score;
        let after_turn = &reports[1];

        // Scored to zero, the cold falls out of the top five.
        assert!(after_turn
            .candidates
            .iter()
            .all(|c| c.condition.as_str() != "common_cold"));
        let profile = kb.profile(&ConditionId::from("common_cold")).unwrap();
        let after = WeightedOverlapScorer::default()
            .score_profile(profile, &after_turn.session.observations);

        assert!(after.score < before);
        assert_eq!(after.score, 0.0);
        assert!(after
            .contradicted_symptoms
            .contains(&SymptomId::from("congestion")));
        assert!(after
            .contradicted_symptoms
            .contains(&SymptomId::from("sneezing")));
        assert!(!after
            .missing_key_symptoms
            .contains(&SymptomId::from("congestion")));

        let flu = find(after_turn, "flu");
        assert!((flu.score - 0.70).abs() < 1e-9, "flu scored {}", flu.score);
    }

    #[test]
    fn test_no_escalation_and_informational_framing() {
        let (_, reports) = run().unwrap();
        for report in &reports {
            assert!(!report.escalation.triggered);
            assert_eq!(report.escalation.recommended_action, RecommendedAction::None);
            assert_eq!(report.framing, ResponseFraming::Informational);
        }
        assert_eq!(reports[1].session.history.len(), 2);
    }

    #[test]
    fn test_run_scenario_succeeds() {
        run_scenario().unwrap();
    }
}
