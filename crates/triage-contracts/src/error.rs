//! Error taxonomy for the symptom triage core.
//!
//! All fallible operations return `TriageResult<T>`. Variants split into two
//! groups: parsing-level problems (`EmptyInput`, `UnknownSymptom`) that callers
//! recover from and surface as diagnostics, and integrity problems
//! (`MalformedProfile`, `DuplicateCondition`, `InvalidConfiguration`,
//! `KnowledgeSource`) that must stop the service before it serves.

use thiserror::Error;

/// The unified error type for the triage crates.
///
/// Every field is a plain string so that recoverable errors can be cloned
/// into diagnostic lists attached to successful results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TriageError {
    /// The normalizer produced no observations and no unparsed fragments.
    #[error("no usable symptom information in input")]
    EmptyInput,

    /// A symptom code does not exist in the knowledge base vocabulary.
    #[error("unknown symptom '{symptom}'")]
    UnknownSymptom { symptom: String },

    /// A condition profile (or the vocabulary it depends on) violates an invariant.
    #[error("malformed profile '{condition}': {reason}")]
    MalformedProfile { condition: String, reason: String },

    /// The same condition id appears twice in one knowledge base source.
    #[error("duplicate condition '{condition}'")]
    DuplicateCondition { condition: String },

    /// A configured threshold is outside its valid range, or config failed to parse.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// A knowledge base or lexicon source could not be read or parsed.
    #[error("knowledge source error: {reason}")]
    KnowledgeSource { reason: String },

    /// A session export was requested without the caller's consent.
    #[error("session '{session_id}' may not be persisted without explicit consent")]
    PersistenceNotAuthorized { session_id: String },
}

impl TriageError {
    /// True for errors that degrade a turn instead of failing it.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, TriageError::EmptyInput | TriageError::UnknownSymptom { .. })
    }
}

/// Convenience alias used throughout the triage crates.
pub type TriageResult<T> = Result<T, TriageError>;
