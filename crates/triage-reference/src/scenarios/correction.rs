//! Scenario 3: Correction
//!
//! The user reports a sore throat and "maybe a fever", then corrects
//! themselves: "actually no fever at all". The accumulator keeps the latest
//! statement per symptom, so the fever flips to excluded and the strep
//! throat candidate loses the support the hedged fever gave it.
//!
//! The correction is recorded, not rewritten: the snapshot before it still
//! shows the fever, and the hash chain over both snapshots verifies.
//! The scenario ends with the structured summary a clinician would receive.

use triage_contracts::{
    analysis::{RawInput, TurnReport},
    error::TriageResult,
};
use triage_kb::IndexedKnowledgeBase;
use triage_session::{summarize, verify_history};

use super::{play, print_turn};

pub fn turns() -> Vec<RawInput> {
    vec![
        RawInput::text("Sore throat for three days and maybe a fever"),
        RawInput::text("Actually no fever at all"),
    ]
}

pub fn run() -> TriageResult<(IndexedKnowledgeBase, Vec<TurnReport>)> {
    play(&turns())
}

/// Run Scenario 3: Correction.
pub fn run_scenario() -> TriageResult<()> {
    println!("=== Scenario 3: Correction ===");
    println!();

    let inputs = turns();
    let (kb, reports) = run()?;
    for (i, (input, report)) in inputs.iter().zip(&reports).enumerate() {
        print_turn(i + 1, input, report, &kb);
        println!();
    }

    let Some(last) = reports.last() else {
        return Ok(());
    };
    let session = &last.session;

    let intact = verify_history(&session.session_id, &session.history);
    println!(
        "  Snapshot chain:         {} ({} snapshot(s))",
        if intact { "VERIFIED" } else { "FAILED" },
        session.history.len()
    );
    if let Some(previous) = session.snapshot_back(1) {
        let earlier: Vec<&str> = previous
            .observations
            .present()
            .map(|o| o.symptom.as_str())
            .collect();
        println!("  Before the correction:  {}", earlier.join(", "));
    }

    let summary = summarize(session);
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => {
            println!("  Consultation summary:");
            for line in json.lines() {
                println!("    {}", line);
            }
        }
        Err(e) => println!("  Consultation summary unavailable: {}", e),
    }
    println!();

    println!("  Scenario 3 complete.");
    println!();
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
