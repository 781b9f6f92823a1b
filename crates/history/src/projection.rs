//! # Presentation History Projection
//!
//! Builds the read-models consumers display from stored presentation log
//! entries. Projections are recomputed on every fetch and never persisted.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vp_history_mdoc::{DecodeError, DecodedClaims, decode_vp_token};

use crate::consent::ClientConsent;
use crate::error::ProjectionError;
use crate::types::{PresentationLog, PresentationSubmission};

/// Summary of a presentation, as shown in a history list.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VpHistoryRecord {
    /// Identifier of the log entry.
    pub id: String,

    /// Display name of the verifier.
    pub verifier_name: Option<String>,

    /// URL of the verifier.
    #[serde(rename = "verifierURL")]
    pub verifier_url: Option<String>,

    /// When the response was submitted.
    pub submit_at: DateTime<Utc>,

    /// Whether the verifier accepted the response.
    pub is_success: bool,
}

impl VpHistoryRecord {
    /// The outcome of the exchange.
    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        if self.is_success { Outcome::Success } else { Outcome::Fail }
    }
}

/// Outcome of a presentation exchange.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub enum Outcome {
    /// The verifier accepted the response.
    Success,

    /// The exchange failed.
    Fail,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "Success"),
            Self::Fail => write!(f, "Fail"),
        }
    }
}

/// Full detail of a presentation.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VpHistoryDetail {
    /// Summary fields.
    #[serde(flatten)]
    pub record: VpHistoryRecord,

    /// SIOP ID Token returned to the verifier.
    pub id_token: Option<String>,

    /// VP Token returned to the verifier.
    pub vp_token: Option<String>,

    /// Presentation Submission accompanying the VP Token.
    pub presentation_submission: Option<PresentationSubmission>,

    /// Message recorded for the exchange.
    pub message: Option<String>,

    /// Consent resolved from the stored tokens.
    pub consent: ClientConsent,
}

impl VpHistoryDetail {
    /// Decode the claims presented in the VP Token.
    ///
    /// Returns `None` when no VP Token was presented. Claims are decoded on
    /// every call.
    #[must_use]
    pub fn claims(&self) -> Option<Result<DecodedClaims, DecodeError>> {
        self.vp_token.as_deref().map(decode_vp_token)
    }
}

/// Project a log entry into a list summary.
#[must_use]
pub fn project_summary(log: &PresentationLog) -> VpHistoryRecord {
    VpHistoryRecord {
        id: log.id.clone(),
        verifier_name: log.verifier_name.clone(),
        verifier_url: log.verifier_url.clone(),
        submit_at: log.submit_at,
        is_success: log.is_success,
    }
}

/// Project a log entry into a detail view.
///
/// # Errors
///
/// Returns [`ProjectionError::MissingSubmission`] when the entry carries a VP
/// Token without the Presentation Submission that must accompany it.
pub fn project_detail(log: &PresentationLog) -> Result<VpHistoryDetail, ProjectionError> {
    if log.vp_token.is_some() && log.presentation_submission.is_none() {
        tracing::warn!(id = %log.id, "presentation log has a vp_token but no submission");
        return Err(ProjectionError::MissingSubmission { id: log.id.clone() });
    }

    Ok(VpHistoryDetail {
        record: project_summary(log),
        id_token: log.id_token.clone(),
        vp_token: log.vp_token.clone(),
        presentation_submission: log.presentation_submission.clone(),
        message: log.message.clone(),
        consent: ClientConsent::from(log),
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use vp_history_mdoc::{DeviceResponseBuilder, DocumentBuilder};

    use super::*;
    use crate::types::DescriptorMap;

    fn log() -> PresentationLog {
        PresentationLog {
            id: "log-1".to_string(),
            verifier_name: Some("Digital ID".to_string()),
            verifier_url: Some("https://verifier.example.com".to_string()),
            submit_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
            is_success: true,
            id_token: None,
            vp_token: None,
            presentation_submission: None,
            message: None,
        }
    }

    fn submission() -> PresentationSubmission {
        PresentationSubmission {
            id: "submission".to_string(),
            definition_id: "definition".to_string(),
            descriptor_map: vec![DescriptorMap {
                id: "org.iso.18013.5.1.mDL".to_string(),
                format: "mso_mdoc".to_string(),
                path: "$".to_string(),
                path_nested: None,
            }],
        }
    }

    #[test]
    fn summary_keeps_fields() {
        let log = PresentationLog {
            id_token: Some("abc".to_string()),
            ..log()
        };
        let record = project_summary(&log);

        assert_eq!(record.id, log.id);
        assert_eq!(record.verifier_name, log.verifier_name);
        assert_eq!(record.verifier_url, log.verifier_url);
        assert_eq!(record.submit_at, log.submit_at);
        assert!(record.is_success);
        assert_eq!(record.outcome().to_string(), "Success");
    }

    #[test]
    fn failed_outcome() {
        let log = PresentationLog {
            is_success: false,
            ..log()
        };
        assert_eq!(project_summary(&log).outcome(), Outcome::Fail);
    }

    #[test]
    fn missing_submission() {
        let log = PresentationLog {
            vp_token: Some("o2d2ZXJzaW9u".to_string()),
            ..log()
        };
        let err = project_detail(&log).expect_err("should fail");
        assert_eq!(
            err,
            ProjectionError::MissingSubmission {
                id: "log-1".to_string()
            }
        );
    }

    #[test]
    fn id_token_detail() {
        let log = PresentationLog {
            id_token: Some("abc".to_string()),
            ..log()
        };
        let detail = project_detail(&log).expect("should project");

        assert_eq!(
            detail.consent,
            ClientConsent::IdToken {
                id_token: "abc".to_string()
            }
        );
        assert!(detail.claims().is_none());
    }

    #[test]
    fn detail_keeps_descriptor_map() {
        let vp_token = DeviceResponseBuilder::new()
            .document(
                DocumentBuilder::new("org.iso.18013.5.1.mDL")
                    .claim("org.iso.18013.5.1", "given_name", "Jane")
                    .claim("org.iso.18013.5.1", "document_number", "D123"),
            )
            .build()
            .expect("should encode");
        let log = PresentationLog {
            vp_token: Some(vp_token),
            presentation_submission: Some(submission()),
            ..log()
        };

        let detail = project_detail(&log).expect("should project");
        assert_eq!(detail.consent.kind(), "vp_token");
        assert_eq!(detail.presentation_submission, Some(submission()));

        let claims = detail.claims().expect("has vp_token").expect("should decode");
        assert_eq!(claims.len(), 1);
    }

    #[test]
    fn undecodable_claims_do_not_fail_projection() {
        let log = PresentationLog {
            vp_token: Some("not-base64url!!".to_string()),
            presentation_submission: Some(submission()),
            ..log()
        };

        let detail = project_detail(&log).expect("should project");
        assert!(matches!(detail.claims(), Some(Err(DecodeError::Encoding(_)))));
    }
}
