//! # ISO mDL-based Credential Format
//!
//! Data model for the ISO/IEC 18013-5 `DeviceResponse` returned as an
//! `mso_mdoc` `vp_token`, along with decoding and fixture encoding.
//!
//! Name spaces and items are held in insertion-ordered maps so the order an
//! issuer stored claims in survives decoding.

mod claims;
mod decode;
mod encode;

use std::fmt;
use std::ops::Deref;

use ciborium::Value;
use coset::{AsCborValue, CoseSign1};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de, ser};
use serde_repr::{Deserialize_repr, Serialize_repr};

pub use self::claims::{ClaimItem, ClaimValue, DecodedClaims, DisplayFields, NamespaceClaims};
pub use self::decode::decode_vp_token;
pub use self::encode::{DeviceResponseBuilder, DocumentBuilder};
use crate::serde_cbor;

/// CBOR tag for an embedded, CBOR-encoded data item (`#6.24(bstr .cbor T)`).
const TAG_ENCODED_CBOR: u64 = 24;

/// CBOR tag for a `COSE_Sign1` structure.
const TAG_COSE_SIGN1: u64 = 18;

// ----------------------------------------------------------------------------
/// # 8.3.1 Data model
// ----------------------------------------------------------------------------
/// Document type
///
/// See 8.3.1 Data model, pg 29.
pub type DocType = String;

/// Element namespace
///
/// See 8.3.1 Data model, pg 29.
pub type NameSpace = String;

/// Data element identifier
///
/// See 8.3.1 Data model, pg 29.
pub type DataElementIdentifier = String;

/// Data element value
///
/// See 8.3.1 Data model, pg 29.
pub type DataElementValue = Value;

// ----------------------------------------------------------------------------
/// # 8.3.2.1.2.2 Device retrieval mdoc response (pg 30)
// ----------------------------------------------------------------------------

/// Device retrieval mdoc response.
///
/// ```cddl
/// DeviceResponse = {
///     "version" : tstr,
///     ? "documents" : [+Document],
///     ? "documentErrors": [+DocumentError],
///     "status" : uint
/// }
/// ```
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeviceResponse {
    /// Version of the `DeviceResponse` structure.
    pub version: String,

    /// Returned documents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<Document>>,

    /// Error codes for unreturned documents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_errors: Option<Vec<DocumentError>>,

    /// Status code.
    pub status: ResponseStatus,
}

/// Status code of a `DeviceResponse`.
///
/// See 8.3.2.1.2.3 Status codes, pg 32.
#[derive(Clone, Copy, Debug, Default, Deserialize_repr, Serialize_repr, PartialEq, Eq)]
#[repr(u64)]
pub enum ResponseStatus {
    /// Normal processing.
    #[default]
    Ok = 0,

    /// The mdoc returns an error without any given reason.
    GeneralError = 10,

    /// The mdoc indicates an error during CBOR decoding.
    CborDecodingError = 11,

    /// The mdoc indicates an error during CBOR validation.
    CborValidationError = 12,
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::GeneralError => write!(f, "general error"),
            Self::CborDecodingError => write!(f, "CBOR decoding error"),
            Self::CborValidationError => write!(f, "CBOR validation error"),
        }
    }
}

/// Document to return in the device response.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Document type of the returned document.
    pub doc_type: DocType,

    /// Returned data elements signed by the issuer.
    pub issuer_signed: IssuerSigned,

    /// Returned data elements signed by the mdoc device.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_signed: Option<DeviceSigned>,

    /// Error codes for each namespace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Errors>,
}

/// Data elements (claims) returned by the Issuer.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IssuerSigned {
    /// Returned data elements for each namespace (`IssuerNameSpaces` element)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_spaces: Option<IssuerNameSpaces>,

    /// The mobile security object (MSO) for issuer data authentication.
    /// `COSE_Sign1` with a payload of `MobileSecurityObjectBytes`
    pub issuer_auth: IssuerAuth,
}

/// Returned data elements for each namespace
pub type IssuerNameSpaces = IndexMap<NameSpace, Vec<IssuerSignedItemBytes>>;

/// CBOR serialized, tagged `IssuerSignedItem`.
pub type IssuerSignedItemBytes = DataItem<IssuerSignedItem>;

/// Issuer-signed data element
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IssuerSignedItem {
    /// Id of the digest as added to the MSO `value_digests` parameter.
    #[serde(rename = "digestID")]
    pub digest_id: DigestId,

    /// Random value for issuer data authentication (min. 16 bytes).
    #[serde(with = "bstr")]
    pub random: Vec<u8>,

    /// Data element identifier. For example, "`family_name`"
    pub element_identifier: DataElementIdentifier,

    /// Data element value. For example, "`Smith`"
    pub element_value: DataElementValue,
}

/// Matches the hashes in the MSO to the data elements in the response.
pub type DigestId = u64;

/// Used by the mdoc device to sign the data elements in the `Document`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSigned {
    /// Returned data elements
    pub name_spaces: DeviceNameSpacesBytes,

    /// Contains the device authentication for mdoc authentication
    pub device_auth: DeviceAuth,
}

/// CBOR serialized, tagged `DeviceNameSpaces`.
pub type DeviceNameSpacesBytes = DataItem<DeviceNameSpaces>;

/// Returned data elements for each namespace.
pub type DeviceNameSpaces = IndexMap<NameSpace, DeviceSignedItems>;

/// Returned data elements (identifier and value) for each namespace.
pub type DeviceSignedItems = IndexMap<DataElementIdentifier, DataElementValue>;

/// Device authentication used to authenticate the mdoc response.
///
/// Held opaquely: device authentication is not evaluated when decoding
/// presentation history.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeviceAuth {
    /// `COSE_Sign1` device signature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_signature: Option<Value>,

    /// `COSE_Mac0` device MAC.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_mac: Option<Value>,
}

/// Error codes for unreturned documents.
pub type DocumentError = IndexMap<DocType, ErrorCode>;

/// Error codes for each namespace.
pub type Errors = IndexMap<NameSpace, ErrorItems>;

/// Error code per data element
pub type ErrorItems = IndexMap<DataElementIdentifier, ErrorCode>;

/// Error code.
pub type ErrorCode = i64;

// ----------------------------------------------------------------------------
/// # 9.1.2.4 Signing method and structure for MSO (pg 50)
// ----------------------------------------------------------------------------

/// `IssuerAuth` is comprised of an MSO encapsulated and signed by an untagged
/// `COSE_Sign1` type (RFC 8152).
///
/// A tagged `COSE_Sign1` is tolerated on input.
#[derive(Clone, Debug, Default)]
pub struct IssuerAuth(pub CoseSign1);

impl PartialEq for IssuerAuth {
    fn eq(&self, other: &Self) -> bool {
        self.0.protected.header == other.0.protected.header
            && self.0.unprotected == other.0.unprotected
            && self.0.payload == other.0.payload
            && self.0.signature == other.0.signature
    }
}

impl Serialize for IssuerAuth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.clone().to_cbor_value().map_err(ser::Error::custom)?.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for IssuerAuth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = match Value::deserialize(deserializer)? {
            Value::Tag(TAG_COSE_SIGN1, inner) => *inner,
            value => value,
        };
        CoseSign1::from_cbor_value(value).map_err(de::Error::custom).map(Self)
    }
}

// ----------------------------------------------------------------------------
/// # Encoded CBOR data item (tag 24)
// ----------------------------------------------------------------------------

/// Wraps types that are encoded as a tag-24 embedded CBOR byte string.
///
/// ```cddl
/// DataItem = #6.24(bstr .cbor T)
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataItem<T>(pub T);

impl<T> DataItem<T> {
    /// Unwraps the embedded value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for DataItem<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: Serialize> Serialize for DataItem<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let bytes = serde_cbor::to_vec(&self.0).map_err(ser::Error::custom)?;
        Value::Tag(TAG_ENCODED_CBOR, Box::new(Value::Bytes(bytes))).serialize(serializer)
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for DataItem<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let Value::Tag(TAG_ENCODED_CBOR, inner) = Value::deserialize(deserializer)? else {
            return Err(de::Error::custom("expected tag 24 embedded CBOR"));
        };
        let Value::Bytes(bytes) = *inner else {
            return Err(de::Error::custom("tag 24 content is not a byte string"));
        };
        serde_cbor::from_slice(&bytes).map(Self).map_err(de::Error::custom)
    }
}

// Byte strings must stay byte strings on the wire.
mod bstr {
    use ciborium::Value;
    use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        Value::Bytes(bytes.to_vec()).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Bytes(bytes) => Ok(bytes),
            _ => Err(de::Error::custom("expected byte string")),
        }
    }
}
