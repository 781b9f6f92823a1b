//! # History Errors
//!
//! Errors returned by projections and the history and deletion handlers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A presentation log entry violates a store invariant.
#[derive(Error, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[serde(tag = "error", content = "error_description")]
pub enum ProjectionError {
    /// The entry carries a VP Token but its Presentation Submission is
    /// missing.
    #[error(r#"{{"error": "missing_submission", "error_description": "presentation log {id} has no presentation submission"}}"#)]
    MissingSubmission {
        /// Identifier of the offending entry.
        id: String,
    },
}

/// Errors fetching presentation history.
#[derive(Error, Debug)]
pub enum HistoryError {
    /// No presentation log entry exists with the given id.
    #[error("presentation log {0} not found")]
    NotFound(String),

    /// The entry could not be projected.
    #[error(transparent)]
    Projection(#[from] ProjectionError),

    /// The presentation log store failed.
    #[error("issue fetching presentation log: {0}")]
    Store(anyhow::Error),
}

/// Errors carrying out a document deletion.
///
/// Store failures are propagated as returned by the store and never retried:
/// a partially applied type-group clear is not safe to repeat.
#[derive(Error, Debug)]
pub enum DeletionError {
    /// The document store failed.
    #[error("issue deleting document: {0}")]
    Store(anyhow::Error),
}

impl DeletionError {
    /// The underlying store error.
    #[must_use]
    pub const fn cause(&self) -> &anyhow::Error {
        match self {
            Self::Store(cause) => cause,
        }
    }
}
