//! # Decode
//!
//! Turns a stored `vp_token` into [`DecodedClaims`].

use base64ct::{Base64Url, Base64UrlUnpadded, Encoding};

use crate::mso_mdoc::{DecodedClaims, DeviceResponse};
use crate::{DecodeError, serde_cbor};

/// Decode a base64url-encoded mdoc `DeviceResponse` into namespaced claims.
///
/// Call only when claim-level detail is needed. A corrupt token does not
/// affect projection of the log entry holding it.
///
/// # Errors
///
/// * [`DecodeError::Encoding`] if the token is empty or not valid base64url.
/// * [`DecodeError::Malformed`] if the bytes are not a valid
///   `DeviceResponse`.
/// * [`DecodeError::Empty`] if the response holds no documents or no
///   issuer-signed items.
pub fn decode_vp_token(vp_token: &str) -> Result<DecodedClaims, DecodeError> {
    let bytes = decode_base64url(vp_token)?;

    let response: DeviceResponse = serde_cbor::from_slice(&bytes).map_err(|e| {
        let reason = format!("{e:#}");
        tracing::warn!(reason = %reason, "vp_token is not a valid device response");
        DecodeError::Malformed(reason)
    })?;
    tracing::debug!(
        version = %response.version,
        status = %response.status,
        documents = response.documents.as_ref().map_or(0, Vec::len),
        "decoded device response"
    );

    DecodedClaims::try_from(response)
}

// Unpadded is canonical for `vp_token`s; padded input is accepted only when
// the padding is correct.
fn decode_base64url(encoded: &str) -> Result<Vec<u8>, DecodeError> {
    if encoded.is_empty() {
        return Err(DecodeError::Encoding("vp_token is empty".to_string()));
    }
    let decoded = if encoded.ends_with('=') {
        Base64Url::decode_vec(encoded)
    } else {
        Base64UrlUnpadded::decode_vec(encoded)
    };
    decoded.map_err(|e| DecodeError::Encoding(e.to_string()))
}
