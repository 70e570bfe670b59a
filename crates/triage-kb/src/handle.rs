//! Atomic hot-reload handle.
//!
//! Readers take an `Arc` snapshot with `current()` at the start of a turn and
//! keep using it for the whole turn. `publish` and `reload` swap the pointer;
//! turns already in flight finish against the base they started with, so no
//! turn ever observes a half-loaded knowledge base.

use std::sync::{Arc, RwLock};

use tracing::{info, warn};

use triage_contracts::error::TriageResult;

use crate::index::{self, IndexedKnowledgeBase};
use crate::source::KnowledgeSource;

#[derive(Debug)]
pub struct KnowledgeBaseHandle {
    current: RwLock<Arc<IndexedKnowledgeBase>>,
}

impl KnowledgeBaseHandle {
    pub fn new(kb: IndexedKnowledgeBase) -> Self {
        Self {
            current: RwLock::new(Arc::new(kb)),
        }
    }

    /// The knowledge base new turns should use.
    pub fn current(&self) -> Arc<IndexedKnowledgeBase> {
        // The guarded value is a single Arc, so a poisoned lock still holds a
        // complete knowledge base.
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Replace the knowledge base, returning the one it superseded.
    pub fn publish(&self, kb: IndexedKnowledgeBase) -> Arc<IndexedKnowledgeBase> {
        self.swap(Arc::new(kb))
    }

    /// Load `source` and publish it if it validates.
    ///
    /// Returns the base this call published, even if another `publish` has
    /// already replaced it. On error the previous knowledge base stays in
    /// service and the error is returned to the caller.
    pub fn reload(&self, source: &KnowledgeSource) -> TriageResult<Arc<IndexedKnowledgeBase>> {
        match index::load(source) {
            Ok(kb) => {
                let next = Arc::new(kb);
                self.swap(Arc::clone(&next));
                Ok(next)
            }
            Err(e) => {
                warn!(error = %e, "knowledge base reload rejected; keeping previous version");
                Err(e)
            }
        }
    }

    fn swap(&self, next: Arc<IndexedKnowledgeBase>) -> Arc<IndexedKnowledgeBase> {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        info!(
            conditions = next.condition_count(),
            symptoms = next.symptom_count(),
            "publishing knowledge base"
        );
        std::mem::replace(&mut *guard, next)
    }
}
