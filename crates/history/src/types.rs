//! # Presentation Log Types
//!
//! Types for presentation log entries as persisted by the wallet's
//! presentation exchange flow. The core only ever reads these.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored record of a single presentation exchange with a verifier.
///
/// Entries are written when a presentation completes or fails and removed
/// only as a side effect of document deletion.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PresentationLog {
    /// Identifier of the log entry.
    pub id: String,

    /// Display name of the verifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verifier_name: Option<String>,

    /// URL of the verifier.
    #[serde(rename = "verifierURL")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verifier_url: Option<String>,

    /// When the response was submitted.
    pub submit_at: DateTime<Utc>,

    /// Whether the verifier accepted the response.
    pub is_success: bool,

    /// SIOP ID Token returned to the verifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,

    /// VP Token returned to the verifier, as a base64url string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vp_token: Option<String>,

    /// Presentation Submission accompanying the VP Token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presentation_submission: Option<PresentationSubmission>,

    /// Message recorded when no consent was given or the exchange failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A Presentation Submission is a mapping of the input descriptors in a
/// Presentation Definition to the claims provided in the VP Token.
///
/// See <https://identity.foundation/presentation-exchange/spec/v2.0.0/#presentation-submission>
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct PresentationSubmission {
    /// Identifier of the submission.
    pub id: String,

    /// The id of the Presentation Definition the submission fulfils.
    pub definition_id: String,

    /// Input descriptor mappings.
    pub descriptor_map: Vec<DescriptorMap>,
}

/// Maps an input descriptor to the location of the matching claims.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct DescriptorMap {
    /// Matches the `id` of the input descriptor in the Presentation
    /// Definition.
    pub id: String,

    /// Format of the claim, e.g. `mso_mdoc`.
    pub format: String,

    /// `JSONPath` to the claim within the VP Token.
    pub path: String,

    /// Location of a credential nested within the presentation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_nested: Option<PathNested>,
}

/// A nested path object for locating a claim within a presentation.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct PathNested {
    /// Format of the nested credential.
    pub format: String,

    /// `JSONPath` to the nested credential.
    pub path: String,

    /// A further level of nesting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_nested: Option<Box<PathNested>>,
}
