//! Structured consultation summary for hand-off to a clinician.

use std::time::Duration;

use serde::Serialize;

use triage_contracts::{
    session::{SessionId, SessionState},
    symptom::{Severity, SymptomId, SymptomObservation},
};

/// What a GP needs at a glance: the main complaint and everything around it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsultationSummary {
    pub session_id: SessionId,
    /// The most severe present symptom.
    pub chief_complaint: Option<SymptomId>,
    pub severity: Option<Severity>,
    /// How long ago the chief complaint began, when known.
    pub onset: Option<Duration>,
    /// Other present symptoms, most severe first.
    pub associated_symptoms: Vec<SymptomId>,
    pub denied_symptoms: Vec<SymptomId>,
    /// Number of recorded snapshots.
    pub turns: usize,
}

/// Summarize `session`.
///
/// The chief complaint is the present symptom with the highest severity.
/// Ties go to the symptom mentioned in the earliest turn, then to the
/// lowest id.
pub fn summarize(session: &SessionState) -> ConsultationSummary {
    let mut present: Vec<(&SymptomObservation, usize)> = session
        .observations
        .present()
        .map(|o| (o, first_mentioned(session, &o.symptom)))
        .collect();
    present.sort_by(|(a, a_turn), (b, b_turn)| {
        b.severity
            .cmp(&a.severity)
            .then(a_turn.cmp(b_turn))
            .then_with(|| a.symptom.cmp(&b.symptom))
    });

    let mut ranked = present.into_iter().map(|(o, _)| o);
    let chief = ranked.next();

    ConsultationSummary {
        session_id: session.session_id,
        chief_complaint: chief.map(|o| o.symptom.clone()),
        severity: chief.map(|o| o.severity),
        onset: chief.and_then(|o| o.onset),
        associated_symptoms: ranked.map(|o| o.symptom.clone()).collect(),
        denied_symptoms: session
            .observations
            .excluded()
            .map(|o| o.symptom.clone())
            .collect(),
        turns: session.history.len(),
    }
}

/// Index of the first snapshot in which `symptom` was present.
///
/// Sessions built without history (tests, imports) sort such symptoms last.
fn first_mentioned(session: &SessionState, symptom: &SymptomId) -> usize {
    session
        .history
        .iter()
        .position(|snapshot| snapshot.observations.is_present(symptom))
        .unwrap_or(usize::MAX)
}
