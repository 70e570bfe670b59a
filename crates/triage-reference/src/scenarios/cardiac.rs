//! Scenario 2: Cardiac Red Flag
//!
//! Red-flag detection is symptom-driven, not score-driven. Two sub-cases:
//!
//! Sub-case A: severe chest pain + shortness of breath
//!             → Emergency for the cardiac profile, although respiratory
//!               distress outranks it on score
//! Sub-case B: chest tightness + "maybe some sweating"
//!             → Emergency; a hedged mention still completes the flag

use triage_contracts::{
    analysis::{RawInput, TurnReport},
    error::TriageResult,
};
use triage_kb::IndexedKnowledgeBase;

use super::{play_one, print_turn};

pub fn breathless_input() -> RawInput {
    RawInput::text("I have severe chest pain and I'm really short of breath")
}

pub fn hedged_sweating_input() -> RawInput {
    RawInput::text("Chest tightness, maybe some sweating")
}

/// Run each sub-case as a single-turn session.
pub fn run() -> TriageResult<(IndexedKnowledgeBase, TurnReport, TurnReport)> {
    let (kb, breathless) = play_one(&breathless_input())?;
    let (_, hedged) = play_one(&hedged_sweating_input())?;
    Ok((kb, breathless, hedged))
}

/// Run Scenario 2: Cardiac Red Flag.
pub fn run_scenario() -> TriageResult<()> {
    println!("=== Scenario 2: Cardiac Red Flag ===");
    println!();

    let (kb, breathless, hedged) = run()?;

    println!("  Sub-case A: chest pain with breathlessness");
    print_turn(1, &breathless_input(), &breathless, &kb);
    if let Some(cardiac) = breathless
        .candidates
        .iter()
        .find(|c| c.condition.as_str() == "cardiac_event")
    {
        println!("    Cardiac score:  {:.2} (escalated regardless)", cardiac.score);
    }
    println!();

    println!("  Sub-case B: hedged sweating with chest tightness");
    print_turn(1, &hedged_sweating_input(), &hedged, &kb);
    println!();

    println!("  Scenario 2 complete.");
    println!();
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use triage_contracts::{
        analysis::{RecommendedAction, ResponseFraming},
        symptom::{Severity, SymptomId},
    };

    use super::*;

    #[test]
    fn test_chest_pain_and_breathlessness_escalate() {
        let (_, report, _) = run().unwrap();

        assert!(report.escalation.triggered);
        assert_eq!(report.escalation.recommended_action, RecommendedAction::Emergency);
        assert_eq!(
            report.escalation.condition.as_ref().map(|c| c.as_str()),
            Some("cardiac_event")
        );
        let reason = report.escalation.reason.as_deref().unwrap();
        assert!(
            reason.contains("chest_pain + shortness_of_breath"),
            "reason should name the combination: {}",
            reason
        );
        assert_eq!(report.framing, ResponseFraming::Emergency);
    }

    #[test]
    fn test_escalation_does_not_depend_on_cardiac_score() {
        let (_, report, _) = run().unwrap();

        // Respiratory distress leads on score; the cardiac profile is modest.
        assert_eq!(report.candidates[0].condition.as_str(), "respiratory_distress");
        let cardiac = report
            .candidates
            .iter()
            .find(|c| c.condition.as_str() == "cardiac_event")
            .unwrap();
        assert!(cardiac.score < 0.5, "cardiac scored {}", cardiac.score);
    }

    #[test]
    fn test_severity_is_read_from_modifiers() {
        let (_, report, _) = run().unwrap();
        let observations = &report.session.observations;

        let chest = observations.get(&SymptomId::from("chest_pain")).unwrap();
        assert_eq!(chest.severity, Severity::Severe);
        let breath = observations
            .get(&SymptomId::from("shortness_of_breath"))
            .unwrap();
        assert_eq!(breath.severity, Severity::Moderate);
    }

    #[test]
    fn test_hedged_mention_completes_red_flag() {
        let (_, _, report) = run().unwrap();

        let sweating = report
            .session
            .observations
            .get(&SymptomId::from("diaphoresis"))
            .unwrap();
        assert!((sweating.certainty - 0.5).abs() < 1e-9);
        assert_eq!(report.escalation.recommended_action, RecommendedAction::Emergency);
        assert!(report
            .escalation
            .reason
            .as_deref()
            .unwrap()
            .contains("chest_pain + diaphoresis"));
    }

    #[test]
    fn test_run_scenario_succeeds() {
        run_scenario().unwrap();
    }
}
