//! # Document Deletion
//!
//! Decides how deleting a stored document is carried out.
//!
//! Some document types are single-instance-preferred: the wallet's app-level
//! state depends on at least one being present. Removing the last document of
//! such a type clears the whole type-group and requires the consumer to
//! restart, rather than leaving partially dependent state behind.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::DeletionConfig;
use crate::error::DeletionError;
use crate::provider::DocumentStore;

/// Document type identifier (an mdoc `docType`).
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct DocumentType(String);

impl DocumentType {
    /// ISO 18013-5 mobile driving licence.
    pub const MDL: &'static str = "org.iso.18013.5.1.mDL";

    /// EUDI person identification data.
    pub const PID: &'static str = "eu.europa.ec.eudi.pid.1";

    /// Create a document type from its identifier.
    #[must_use]
    pub fn new(doc_type: impl Into<String>) -> Self {
        Self(doc_type.into())
    }

    /// The mobile driving licence type.
    #[must_use]
    pub fn mdl() -> Self {
        Self::new(Self::MDL)
    }

    /// The person identification data type.
    #[must_use]
    pub fn pid() -> Self {
        Self::new(Self::PID)
    }

    /// The type identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DocumentType {
    fn from(doc_type: &str) -> Self {
        Self::new(doc_type)
    }
}

impl From<String> for DocumentType {
    fn from(doc_type: String) -> Self {
        Self(doc_type)
    }
}

/// Stored document ids grouped by document type.
///
/// Queried for counts only; the index is owned by the document store.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct DocumentTypeIndex(HashMap<DocumentType, BTreeSet<String>>);

impl DocumentTypeIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a document of the given type.
    pub fn insert(&mut self, doc_type: DocumentType, document_id: impl Into<String>) {
        self.0.entry(doc_type).or_default().insert(document_id.into());
    }

    /// Number of stored documents of the given type.
    #[must_use]
    pub fn count(&self, doc_type: &DocumentType) -> usize {
        self.0.get(doc_type).map_or(0, BTreeSet::len)
    }

    /// Ids of stored documents of the given type.
    pub fn documents(&self, doc_type: &DocumentType) -> impl Iterator<Item = &str> {
        self.0.get(doc_type).into_iter().flatten().map(String::as_str)
    }
}

impl FromIterator<(DocumentType, String)> for DocumentTypeIndex {
    fn from_iter<I: IntoIterator<Item = (DocumentType, String)>>(iter: I) -> Self {
        let mut index = Self::new();
        for (doc_type, document_id) in iter {
            index.insert(doc_type, document_id);
        }
        index
    }
}

/// How a document deletion is to be carried out.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "plan")]
pub enum DeletionPlan {
    /// Delete only the requested document.
    DeleteSingle {
        /// The document to delete.
        document_id: String,
    },

    /// Clear every document of the type.
    DeleteAllOfType {
        /// The type to clear.
        document_type: DocumentType,

        /// The consumer must restart once the clear completes.
        reboot_required: bool,
    },
}

impl DeletionPlan {
    /// Whether carrying out the plan requires a restart.
    #[must_use]
    pub const fn reboot_required(&self) -> bool {
        match self {
            Self::DeleteSingle { .. } => false,
            Self::DeleteAllOfType { reboot_required, .. } => *reboot_required,
        }
    }
}

/// Decide how to delete a document.
///
/// For single-instance-preferred types the whole type-group is cleared when
/// the document is the last of its type (a type missing from the index counts
/// as last). Every other deletion removes just the one document.
#[must_use]
pub fn plan_deletion(
    document_id: &str, document_type: &DocumentType, index: &DocumentTypeIndex,
    config: &DeletionConfig,
) -> DeletionPlan {
    let plan = if config.is_single_instance(document_type) && index.count(document_type) <= 1 {
        DeletionPlan::DeleteAllOfType {
            document_type: document_type.clone(),
            reboot_required: true,
        }
    } else {
        DeletionPlan::DeleteSingle {
            document_id: document_id.to_string(),
        }
    };

    tracing::debug!(
        document_id,
        %document_type,
        count = index.count(document_type),
        reboot_required = plan.reboot_required(),
        "planned document deletion"
    );
    plan
}

/// Result of a completed deletion.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeletionOutcome {
    /// The consumer must restart.
    pub should_reboot: bool,
}

/// Carry out a deletion plan against the document store.
///
/// The store is called exactly once. Failures are not retried.
///
/// # Errors
///
/// Returns [`DeletionError::Store`] with the store's error if the store
/// operation fails.
pub async fn execute_plan(
    store: &impl DocumentStore, plan: &DeletionPlan,
) -> Result<DeletionOutcome, DeletionError> {
    match plan {
        DeletionPlan::DeleteSingle { document_id } => {
            store.delete_document(document_id).await.map_err(DeletionError::Store)?;
            tracing::info!(%document_id, "deleted document");
        }
        DeletionPlan::DeleteAllOfType { document_type, .. } => {
            store.clear_documents_of_type(document_type).await.map_err(DeletionError::Store)?;
            tracing::info!(%document_type, "cleared documents of type");
        }
    }

    Ok(DeletionOutcome {
        should_reboot: plan.reboot_required(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(mdl: usize, pid: usize) -> DocumentTypeIndex {
        let mdls = (0..mdl).map(|i| (DocumentType::mdl(), format!("mdl-{i}")));
        let pids = (0..pid).map(|i| (DocumentType::pid(), format!("pid-{i}")));
        mdls.chain(pids).collect()
    }

    #[test]
    fn last_mdl_clears_type() {
        let config = DeletionConfig::default();
        let plan = plan_deletion("mdl-0", &DocumentType::mdl(), &index(1, 2), &config);
        assert_eq!(
            plan,
            DeletionPlan::DeleteAllOfType {
                document_type: DocumentType::mdl(),
                reboot_required: true,
            }
        );
        assert!(plan.reboot_required());
    }

    #[test]
    fn one_of_many_mdl() {
        let config = DeletionConfig::default();
        let plan = plan_deletion("mdl-1", &DocumentType::mdl(), &index(3, 0), &config);
        assert_eq!(
            plan,
            DeletionPlan::DeleteSingle {
                document_id: "mdl-1".to_string()
            }
        );
        assert!(!plan.reboot_required());
    }

    #[test]
    fn unindexed_mdl_clears_type() {
        let config = DeletionConfig::default();
        let plan = plan_deletion("mdl-9", &DocumentType::mdl(), &index(0, 1), &config);
        assert!(matches!(plan, DeletionPlan::DeleteAllOfType { .. }));
    }

    #[test]
    fn other_types_delete_single() {
        let config = DeletionConfig::default();
        for count in [0, 1, 3] {
            let plan = plan_deletion("pid-0", &DocumentType::pid(), &index(1, count), &config);
            assert_eq!(
                plan,
                DeletionPlan::DeleteSingle {
                    document_id: "pid-0".to_string()
                }
            );
        }
    }

    #[test]
    fn configured_single_instance_type() {
        let config = DeletionConfig {
            single_instance_types: vec![DocumentType::pid()],
        };
        let plan = plan_deletion("pid-0", &DocumentType::pid(), &index(1, 1), &config);
        assert!(plan.reboot_required());

        // mdl is no longer single-instance-preferred
        let plan = plan_deletion("mdl-0", &DocumentType::mdl(), &index(1, 1), &config);
        assert!(!plan.reboot_required());
    }

    #[test]
    fn index_counts() {
        let mut idx = index(2, 0);
        idx.insert(DocumentType::mdl(), "mdl-0");
        assert_eq!(idx.count(&DocumentType::mdl()), 2);
        assert_eq!(idx.documents(&DocumentType::mdl()).collect::<Vec<_>>(), ["mdl-0", "mdl-1"]);
        assert_eq!(idx.count(&DocumentType::pid()), 0);
    }

    #[test]
    fn plan_json() {
        let plan = DeletionPlan::DeleteAllOfType {
            document_type: DocumentType::mdl(),
            reboot_required: true,
        };
        assert_eq!(
            serde_json::to_value(&plan).unwrap(),
            serde_json::json!({
                "plan": "delete_all_of_type",
                "document_type": "org.iso.18013.5.1.mDL",
                "reboot_required": true
            })
        );
    }
}
