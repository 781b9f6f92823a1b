//! # Decode Errors
//!
//! Errors returned when decoding an mdoc `vp_token`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a `vp_token` could not be turned into claims.
///
/// `Encoding` and `Malformed` both mean the stored record is unreadable;
/// `Malformed` additionally indicates corruption or a format mismatch.
/// `Empty` means the token decoded cleanly but holds nothing to show.
#[derive(Error, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[serde(tag = "error", content = "error_description")]
pub enum DecodeError {
    /// The token is not valid base64url (alphabet, padding, or empty input).
    #[error(r#"{{"error": "encoding", "error_description": "{0}"}}"#)]
    Encoding(String),

    /// The decoded bytes are not a structurally valid `DeviceResponse`.
    #[error(r#"{{"error": "malformed", "error_description": "{0}"}}"#)]
    Malformed(String),

    /// The `DeviceResponse` contains no documents or no issuer-signed items.
    #[error(r#"{{"error": "empty", "error_description": "device response contains no claims"}}"#)]
    Empty,
}

impl DecodeError {
    /// Returns `true` when the record should be shown as "nothing to display"
    /// rather than as unreadable.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn display() {
        let err = DecodeError::Encoding("invalid Base64 encoding".to_string());
        assert_eq!(
            err.to_string(),
            r#"{"error": "encoding", "error_description": "invalid Base64 encoding"}"#
        );
    }

    #[test]
    fn json() {
        let err = DecodeError::Malformed("missing field `status`".to_string());
        let ser = serde_json::to_value(&err).unwrap();
        assert_eq!(ser, json!({"error": "malformed", "error_description": "missing field `status`"}));

        let ser = serde_json::to_value(DecodeError::Empty).unwrap();
        assert_eq!(ser, json!({"error": "empty"}));
    }
}
