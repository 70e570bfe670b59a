//! Knowledge base source formats.
//!
//! A `KnowledgeDocument` is deserialized from TOML or JSON and holds the
//! symptom vocabulary plus the condition profiles. It is raw input: nothing
//! is validated until `IndexedKnowledgeBase::from_document` runs.
//!
//! Example in TOML:
//! ```toml
//! [[symptoms]]
//! id = "fever"
//! label = "Fever"
//! synonyms = ["high temperature", "feverish", "pyrexia"]
//!
//! [[symptoms]]
//! id = "cough"
//!
//! [[conditions]]
//! id = "flu"
//! name = "Influenza"
//! base_rate = 0.05
//! weights = { fever = 0.6, cough = 0.4 }
//! guidelines = ["CDC", "NICE"]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use triage_contracts::{
    condition::{ConditionProfile, SymptomDefinition},
    error::{TriageError, TriageResult},
};

/// The top-level structure of a knowledge base file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeDocument {
    /// The symptom vocabulary. Profiles may only reference these ids.
    #[serde(default)]
    pub symptoms: Vec<SymptomDefinition>,
    /// Condition profiles, in any order. Ids must be unique.
    #[serde(default)]
    pub conditions: Vec<ConditionProfile>,
}

/// Where a knowledge base is loaded from.
#[derive(Debug, Clone)]
pub enum KnowledgeSource {
    /// A TOML document held in memory.
    Toml(String),
    /// A JSON document held in memory.
    Json(String),
    /// A file; `.json` is parsed as JSON, anything else as TOML.
    File(PathBuf),
}

impl KnowledgeDocument {
    /// Parse `s` as a TOML knowledge document.
    pub fn from_toml_str(s: &str) -> TriageResult<Self> {
        toml::from_str(s).map_err(|e| TriageError::KnowledgeSource {
            reason: format!("failed to parse knowledge base TOML: {}", e),
        })
    }

    /// Parse `s` as a JSON knowledge document.
    pub fn from_json_str(s: &str) -> TriageResult<Self> {
        serde_json::from_str(s).map_err(|e| TriageError::KnowledgeSource {
            reason: format!("failed to parse knowledge base JSON: {}", e),
        })
    }

    /// Read the file at `path`, choosing the format by extension.
    pub fn from_file(path: &Path) -> TriageResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| TriageError::KnowledgeSource {
            reason: format!("failed to read knowledge base '{}': {}", path.display(), e),
        })?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&contents)
        } else {
            Self::from_toml_str(&contents)
        }
    }

    /// Parse whichever source was given.
    pub fn from_source(source: &KnowledgeSource) -> TriageResult<Self> {
        match source {
            KnowledgeSource::Toml(s) => Self::from_toml_str(s),
            KnowledgeSource::Json(s) => Self::from_json_str(s),
            KnowledgeSource::File(path) => Self::from_file(path),
        }
    }
}
