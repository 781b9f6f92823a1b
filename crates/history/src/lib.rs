//! # Verifiable Presentation History
//!
//! Read-models over a wallet's presentation log and the policy for deleting
//! stored documents.
//!
//! A wallet records a [`PresentationLog`] entry each time a presentation to a
//! verifier completes or fails. This crate:
//!
//! * resolves the stored tokens of an entry into a single [`ClientConsent`];
//! * projects entries into [`VpHistoryRecord`] summaries and
//!   [`VpHistoryDetail`] detail views, decoding mdoc claims on demand;
//! * decides how a document deletion should be carried out
//!   ([`plan_deletion`]) and, through the [`provider`] traits, carries it out.
//!
//! Everything apart from the handlers is a pure function of its inputs. The
//! document store and presentation log are external collaborators supplied by
//! implementing the [`provider`] traits.

pub mod config;
pub mod consent;
pub mod deletion;
pub mod handlers;
pub mod projection;
pub mod provider;
pub mod types;

mod error;

pub use vp_history_mdoc as mdoc;

pub use self::config::{DeletionConfig, DisplayConfig, HistoryConfig};
pub use self::consent::{ClientConsent, VpToken, resolve_consent};
pub use self::deletion::{
    DeletionOutcome, DeletionPlan, DocumentType, DocumentTypeIndex, execute_plan, plan_deletion,
};
pub use self::error::{DeletionError, HistoryError, ProjectionError};
pub use self::handlers::{delete_document, history, history_detail};
pub use self::projection::{
    Outcome, VpHistoryDetail, VpHistoryRecord, project_detail, project_summary,
};
pub use self::types::{DescriptorMap, PathNested, PresentationLog, PresentationSubmission};
