//! # In-Memory Wallet

use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Result, anyhow, bail};
use vp_history::provider::{DocumentStore, PresentationLogStore};
use vp_history::{DocumentType, DocumentTypeIndex, PresentationLog};

#[derive(Default)]
struct State {
    logs: Vec<PresentationLog>,
    documents: Vec<(DocumentType, String)>,
    fail_deletes: bool,
    fail_fetches: bool,
    delete_calls: usize,
}

#[derive(Clone, Default)]
pub struct Wallet {
    state: Arc<Mutex<State>>,
}

impl Wallet {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, State>> {
        self.state.lock().map_err(|_| anyhow!("issue locking"))
    }

    pub fn add_log(&self, log: PresentationLog) -> Result<()> {
        self.state()?.logs.push(log);
        Ok(())
    }

    pub fn add_document(&self, document_type: DocumentType, document_id: &str) -> Result<()> {
        self.state()?.documents.push((document_type, document_id.to_string()));
        Ok(())
    }

    pub fn documents(&self) -> Result<Vec<String>> {
        Ok(self.state()?.documents.iter().map(|(_, id)| id.clone()).collect())
    }

    /// Make every subsequent delete or clear fail.
    pub fn fail_deletes(&self) -> Result<()> {
        self.state()?.fail_deletes = true;
        Ok(())
    }

    /// Make every subsequent fetch fail.
    pub fn fail_fetches(&self) -> Result<()> {
        self.state()?.fail_fetches = true;
        Ok(())
    }

    /// Number of delete or clear calls received, including failed ones.
    pub fn delete_calls(&self) -> Result<usize> {
        Ok(self.state()?.delete_calls)
    }
}

impl PresentationLogStore for Wallet {
    async fn fetch_presentation_log(&self, id: &str) -> Result<Option<PresentationLog>> {
        let state = self.state()?;
        if state.fail_fetches {
            bail!("presentation log unavailable");
        }
        Ok(state.logs.iter().find(|log| log.id == id).cloned())
    }

    async fn fetch_presentation_logs(&self) -> Result<Vec<PresentationLog>> {
        let state = self.state()?;
        if state.fail_fetches {
            bail!("presentation log unavailable");
        }
        let mut logs = state.logs.clone();
        logs.sort_by(|a, b| b.submit_at.cmp(&a.submit_at));
        Ok(logs)
    }
}

impl DocumentStore for Wallet {
    async fn fetch_document_type_index(&self) -> Result<DocumentTypeIndex> {
        let state = self.state()?;
        if state.fail_fetches {
            bail!("document store unavailable");
        }
        Ok(state.documents.iter().cloned().collect())
    }

    async fn delete_document(&self, document_id: &str) -> Result<()> {
        let mut state = self.state()?;
        state.delete_calls += 1;
        if state.fail_deletes {
            bail!("document store is read-only");
        }
        state.documents.retain(|(_, id)| id != document_id);
        Ok(())
    }

    async fn clear_documents_of_type(&self, document_type: &DocumentType) -> Result<()> {
        let mut state = self.state()?;
        state.delete_calls += 1;
        if state.fail_deletes {
            bail!("document store is read-only");
        }
        state.documents.retain(|(doc_type, _)| doc_type != document_type);
        Ok(())
    }
}
