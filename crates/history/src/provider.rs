//! # Provider
//!
//! Storage seams implemented by the host wallet.

use std::future::Future;

use anyhow::Result;

use crate::deletion::{DocumentType, DocumentTypeIndex};
use crate::types::PresentationLog;

/// `PresentationLogStore` is used by implementers to provide access to
/// stored presentation log entries.
pub trait PresentationLogStore: Send + Sync {
    /// Fetch a single log entry. Returns `None` if no entry has the id.
    fn fetch_presentation_log(
        &self, id: &str,
    ) -> impl Future<Output = Result<Option<PresentationLog>>> + Send;

    /// Fetch all log entries, most recent first.
    fn fetch_presentation_logs(&self) -> impl Future<Output = Result<Vec<PresentationLog>>> + Send;
}

/// `DocumentStore` is used by implementers to provide access to stored
/// documents.
pub trait DocumentStore: Send + Sync {
    /// The current document type index.
    fn fetch_document_type_index(&self) -> impl Future<Output = Result<DocumentTypeIndex>> + Send;

    /// Delete a single document.
    fn delete_document(&self, document_id: &str) -> impl Future<Output = Result<()>> + Send;

    /// Delete every document of the given type.
    fn clear_documents_of_type(
        &self, document_type: &DocumentType,
    ) -> impl Future<Output = Result<()>> + Send;
}
