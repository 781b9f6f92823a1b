//! # Handlers
//!
//! Entry points used by the wallet: each fetches from the provider, applies
//! the matching projection or policy and returns the result.

use crate::config::DeletionConfig;
use crate::deletion::{self, DeletionOutcome, DocumentType};
use crate::error::{DeletionError, HistoryError};
use crate::projection::{self, VpHistoryDetail, VpHistoryRecord};
use crate::provider::{DocumentStore, PresentationLogStore};

/// Summaries of every stored presentation, in store order.
///
/// An empty store yields an empty list.
///
/// # Errors
///
/// Returns [`HistoryError::Store`] if the log store fails.
pub async fn history(
    provider: &impl PresentationLogStore,
) -> Result<Vec<VpHistoryRecord>, HistoryError> {
    let logs = provider.fetch_presentation_logs().await.map_err(HistoryError::Store)?;
    tracing::debug!(count = logs.len(), "fetched presentation history");
    Ok(logs.iter().map(projection::project_summary).collect())
}

/// Detail of a single stored presentation.
///
/// # Errors
///
/// Returns [`HistoryError::NotFound`] if no entry has the id,
/// [`HistoryError::Projection`] if the entry is inconsistent, or
/// [`HistoryError::Store`] if the log store fails.
pub async fn history_detail(
    provider: &impl PresentationLogStore, id: &str,
) -> Result<VpHistoryDetail, HistoryError> {
    let Some(log) = provider.fetch_presentation_log(id).await.map_err(HistoryError::Store)? else {
        return Err(HistoryError::NotFound(id.to_string()));
    };
    Ok(projection::project_detail(&log)?)
}

/// Delete a stored document, clearing its whole type when the deletion
/// policy requires it.
///
/// # Errors
///
/// Returns [`DeletionError::Store`] if fetching the type index or deleting
/// fails. Nothing is retried.
pub async fn delete_document(
    provider: &impl DocumentStore, config: &DeletionConfig, document_id: &str,
    document_type: &DocumentType,
) -> Result<DeletionOutcome, DeletionError> {
    let index = provider.fetch_document_type_index().await.map_err(DeletionError::Store)?;
    let plan = deletion::plan_deletion(document_id, document_type, &index, config);
    deletion::execute_plan(provider, &plan).await
}
