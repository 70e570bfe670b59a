//! End-to-end triage scenarios.
//!
//! Each scenario is a self-contained module that runs real components
//! (normalizer, accumulator, scorer, safety gate) against the bundled
//! knowledge base and prints what each turn produced.

use tracing::debug;

use triage_contracts::{
    analysis::{RawInput, TurnReport},
    config::AnalysisConfig,
    error::TriageResult,
    session::SessionState,
};
use triage_core::traits::KnowledgeBase;
use triage_kb::IndexedKnowledgeBase;

use crate::{build_analyzer, reference_knowledge_base, reference_lexicon};

pub mod cardiac;
pub mod correction;
pub mod flu_vs_cold;
pub mod sepsis;

/// Run `turns` in order through one fresh session with the default config.
///
/// Returns the knowledge base used and one report per turn; each report's
/// session is the input to the next turn.
pub fn play(turns: &[RawInput]) -> TriageResult<(IndexedKnowledgeBase, Vec<TurnReport>)> {
    let kb = reference_knowledge_base()?;
    let analyzer = build_analyzer(&AnalysisConfig::default(), reference_lexicon()?);

    let mut session = SessionState::new();
    let mut reports = Vec::with_capacity(turns.len());
    for (index, input) in turns.iter().enumerate() {
        debug!(session_id = %session.session_id, turn = index + 1, "scenario turn");
        let report = analyzer.analyze_turn(session, input, &kb)?;
        session = report.session.clone();
        reports.push(report);
    }
    Ok((kb, reports))
}

/// Analyze a single turn in a fresh session.
pub fn play_one(input: &RawInput) -> TriageResult<(IndexedKnowledgeBase, TurnReport)> {
    let kb = reference_knowledge_base()?;
    let analyzer = build_analyzer(&AnalysisConfig::default(), reference_lexicon()?);
    let report = analyzer.analyze_turn(SessionState::new(), input, &kb)?;
    Ok((kb, report))
}

/// Print one turn report in the demo's column layout.
pub fn print_turn(number: usize, input: &RawInput, report: &TurnReport, kb: &IndexedKnowledgeBase) {
    println!("  Turn {}: {}", number, describe_input(input));

    let present: Vec<String> = report
        .session
        .observations
        .present()
        .map(|o| {
            if o.certainty < 1.0 {
                format!("{} ({}, certainty {:.2})", o.symptom, o.severity, o.certainty)
            } else {
                format!("{} ({})", o.symptom, o.severity)
            }
        })
        .collect();
    let denied: Vec<&str> = report
        .session
        .observations
        .excluded()
        .map(|o| o.symptom.as_str())
        .collect();
    println!("    Present:        {}", list_or_dash(&present));
    println!("    Denied:         {}", list_or_dash(&denied));

    if report.candidates.is_empty() {
        println!("    Candidates:     -");
    }
    for (rank, candidate) in report.candidates.iter().take(3).enumerate() {
        let name = kb
            .profile(&candidate.condition)
            .map(|p| p.name.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or(candidate.condition.as_str());
        let label = if rank == 0 { "Candidates:" } else { "" };
        println!("    {:<16}{}. {} {:.2}", label, rank + 1, name, candidate.score);
        if !candidate.missing_key_symptoms.is_empty() {
            let missing: Vec<&str> = candidate
                .missing_key_symptoms
                .iter()
                .map(|s| s.as_str())
                .collect();
            println!("    {:<16}   missing key: {}", "", missing.join(", "));
        }
    }

    if report.escalation.triggered {
        println!(
            "    Escalation:     {:?} ({})",
            report.escalation.recommended_action,
            report.escalation.reason.as_deref().unwrap_or("")
        );
    } else {
        println!("    Escalation:     none");
    }
    println!("    Framing:        {:?}", report.framing);
    for fragment in &report.unparsed_fragments {
        println!("    Unparsed:       \"{}\"", fragment);
    }
    for warning in &report.warnings {
        println!("    Warning:        {}", warning);
    }
}

/// A one-line rendering of the user's input.
pub fn describe_input(input: &RawInput) -> String {
    match input {
        RawInput::Text(text) => format!("\"{}\"", text),
        RawInput::Tags(tags) => {
            let codes: Vec<String> = tags
                .iter()
                .map(|tag| match (tag.excluded, tag.severity) {
                    (true, _) => format!("-{}", tag.code),
                    (false, Some(severity)) => format!("{}:{}", tag.code, severity),
                    (false, None) => tag.code.clone(),
                })
                .collect();
            format!("tags [{}]", codes.join(", "))
        }
    }
}

fn list_or_dash<T: AsRef<str>>(items: &[T]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.iter().map(|s| s.as_ref()).collect::<Vec<_>>().join(", ")
    }
}
