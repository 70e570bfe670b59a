//! Consent-gated session export.
//!
//! Sessions hold health information. Nothing leaves the core for storage
//! unless the caller passes an explicit `PersistenceConsent::Granted`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use triage_contracts::{
    error::{TriageError, TriageResult},
    session::SessionState,
};

/// The user's answer to "may we keep this conversation?".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PersistenceConsent {
    #[default]
    NotGranted,
    Granted {
        /// Who recorded the consent (user id, clinician, form reference).
        granted_by: String,
    },
}

/// A session packaged for storage, with its consent record.
#[derive(Debug, Clone, Serialize)]
pub struct SessionExport<'a> {
    pub session: &'a SessionState,
    pub granted_by: &'a str,
    pub exported_at: DateTime<Utc>,
}

/// Package `session` for storage if and only if consent was granted.
///
/// Returns `TriageError::PersistenceNotAuthorized` otherwise.
pub fn export_for_persistence<'a>(
    session: &'a SessionState,
    consent: &'a PersistenceConsent,
) -> TriageResult<SessionExport<'a>> {
    match consent {
        PersistenceConsent::Granted { granted_by } => {
            info!(
                session_id = %session.session_id,
                granted_by = %granted_by,
                snapshots = session.history.len(),
                "exporting session for persistence"
            );
            Ok(SessionExport {
                session,
                granted_by,
                exported_at: Utc::now(),
            })
        }
        PersistenceConsent::NotGranted => {
            warn!(session_id = %session.session_id, "export refused: no consent");
            Err(TriageError::PersistenceNotAuthorized {
                session_id: session.session_id.to_string(),
            })
        }
    }
}
