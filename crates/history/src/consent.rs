//! # Client Consent
//!
//! Normalises the tokens stored with a presentation log entry into exactly
//! one [`ClientConsent`] variant.
//!
//! A combined SIOP + OpenID4VP response is reported as combined, not as two
//! separate consents.

use serde::{Deserialize, Serialize};
use vp_history_mdoc::{DecodeError, DecodedClaims, decode_vp_token};

use crate::types::{PresentationLog, PresentationSubmission};

/// Message used for a negative consent when none was recorded.
pub const NO_CONSENT_MESSAGE: &str = "No consent provided";

/// What the holder consented to send to the verifier.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "consent")]
pub enum ClientConsent {
    /// Only a SIOP ID Token was returned.
    IdToken {
        /// The ID Token.
        id_token: String,
    },

    /// A VP Token and its Presentation Submission were returned.
    VpToken {
        /// The VP Token.
        vp_token: VpToken,

        /// The Presentation Submission.
        presentation_submission: PresentationSubmission,
    },

    /// Both an ID Token and a VP Token were returned.
    IdAndVpToken {
        /// The ID Token.
        id_token: String,

        /// The VP Token.
        vp_token: VpToken,

        /// The Presentation Submission.
        presentation_submission: PresentationSubmission,
    },

    /// Consent was refused or nothing was sent.
    Negative {
        /// Reason recorded for the refusal.
        message: String,
    },
}

impl ClientConsent {
    /// Resolve stored token fields into a consent.
    ///
    /// Rules are evaluated in order and the first match wins:
    ///
    /// 1. ID Token, VP Token and submission → [`ClientConsent::IdAndVpToken`]
    /// 2. VP Token and submission → [`ClientConsent::VpToken`]
    /// 3. ID Token → [`ClientConsent::IdToken`]
    /// 4. otherwise → [`ClientConsent::Negative`]
    #[must_use]
    pub fn resolve(
        id_token: Option<&str>, vp_token: Option<&str>,
        presentation_submission: Option<&PresentationSubmission>, message: Option<&str>,
    ) -> Self {
        let consent = match (id_token, vp_token, presentation_submission) {
            (Some(id_token), Some(vp_token), Some(submission)) => Self::IdAndVpToken {
                id_token: id_token.to_string(),
                vp_token: VpToken::Generic(vp_token.to_string()),
                presentation_submission: submission.clone(),
            },
            (_, Some(vp_token), Some(submission)) => Self::VpToken {
                vp_token: VpToken::Generic(vp_token.to_string()),
                presentation_submission: submission.clone(),
            },
            (Some(id_token), _, _) => Self::IdToken {
                id_token: id_token.to_string(),
            },
            _ => Self::Negative {
                message: message.unwrap_or(NO_CONSENT_MESSAGE).to_string(),
            },
        };
        tracing::debug!(consent = consent.kind(), "resolved client consent");
        consent
    }

    /// Short name of the variant, for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::IdToken { .. } => "id_token",
            Self::VpToken { .. } => "vp_token",
            Self::IdAndVpToken { .. } => "id_and_vp_token",
            Self::Negative { .. } => "negative",
        }
    }

    /// The VP Token, for variants that carry one.
    #[must_use]
    pub const fn vp_token(&self) -> Option<&VpToken> {
        match self {
            Self::VpToken { vp_token, .. } | Self::IdAndVpToken { vp_token, .. } => Some(vp_token),
            Self::IdToken { .. } | Self::Negative { .. } => None,
        }
    }

    /// The Presentation Submission, for variants that carry one.
    #[must_use]
    pub const fn presentation_submission(&self) -> Option<&PresentationSubmission> {
        match self {
            Self::VpToken {
                presentation_submission,
                ..
            }
            | Self::IdAndVpToken {
                presentation_submission,
                ..
            } => Some(presentation_submission),
            Self::IdToken { .. } | Self::Negative { .. } => None,
        }
    }

    /// Returns `true` for any variant other than [`ClientConsent::Negative`].
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        !matches!(self, Self::Negative { .. })
    }
}

impl From<&PresentationLog> for ClientConsent {
    fn from(log: &PresentationLog) -> Self {
        Self::resolve(
            log.id_token.as_deref(),
            log.vp_token.as_deref(),
            log.presentation_submission.as_ref(),
            log.message.as_deref(),
        )
    }
}

/// Resolve stored token fields into a consent.
///
/// See [`ClientConsent::resolve`].
#[must_use]
pub fn resolve_consent(
    id_token: Option<&str>, vp_token: Option<&str>,
    presentation_submission: Option<&PresentationSubmission>, message: Option<&str>,
) -> ClientConsent {
    ClientConsent::resolve(id_token, vp_token, presentation_submission, message)
}

/// A VP Token as stored.
///
/// Tokens stay opaque until a consumer asks for claim-level detail.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VpToken {
    /// Undecoded token string.
    Generic(String),
}

impl VpToken {
    /// The raw token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Generic(token) => token,
        }
    }

    /// Decode the token as an mdoc `DeviceResponse`.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the token cannot be decoded or holds no
    /// documents.
    pub fn decode(&self) -> Result<DecodedClaims, DecodeError> {
        decode_vp_token(self.as_str())
    }
}
