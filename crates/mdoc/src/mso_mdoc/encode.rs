//! # Encode
//!
//! Builds base64url-encoded `DeviceResponse` tokens.
//!
//! The output is structurally valid but unsigned: `issuerAuth` is an empty
//! `COSE_Sign1` and no device authentication is included. It is intended for
//! fixtures and developer tooling, not for presentation to a verifier.

use anyhow::Result;
use base64ct::{Base64UrlUnpadded, Encoding};
use ciborium::Value;
use indexmap::IndexMap;
use rand::{Rng, rng};

use crate::mso_mdoc::{
    DataItem, DeviceResponse, DocType, Document, IssuerAuth, IssuerNameSpaces, IssuerSigned,
    IssuerSignedItem, ResponseStatus,
};
use crate::serde_cbor;

/// Builds a `DeviceResponse` and encodes it as a `vp_token`.
#[derive(Debug, Default)]
pub struct DeviceResponseBuilder {
    documents: Vec<Document>,
    status: ResponseStatus,
}

impl DeviceResponseBuilder {
    /// Create a new builder with no documents and an `OK` status.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document to the response.
    #[must_use]
    pub fn document(mut self, document: DocumentBuilder) -> Self {
        self.documents.push(document.build());
        self
    }

    /// Set the response status.
    #[must_use]
    pub const fn status(mut self, status: ResponseStatus) -> Self {
        self.status = status;
        self
    }

    /// Encode as CBOR then base64url (unpadded).
    ///
    /// # Errors
    ///
    /// Returns an error if an element value cannot be CBOR encoded.
    pub fn build(self) -> Result<String> {
        let response = DeviceResponse {
            version: "1.0".to_string(),
            documents: Some(self.documents),
            document_errors: None,
            status: self.status,
        };
        Ok(Base64UrlUnpadded::encode_string(&serde_cbor::to_vec(&response)?))
    }
}

/// Builds a single `Document` with issuer-signed claims.
#[derive(Debug)]
pub struct DocumentBuilder {
    doc_type: DocType,
    name_spaces: IndexMap<String, Vec<(String, Value)>>,
}

impl DocumentBuilder {
    /// Create a document of the given document type.
    #[must_use]
    pub fn new(doc_type: impl Into<String>) -> Self {
        Self {
            doc_type: doc_type.into(),
            name_spaces: IndexMap::new(),
        }
    }

    /// Append a claim to a name space. Name spaces are emitted in the order
    /// they are first used, items in the order they are added.
    #[must_use]
    pub fn claim(
        mut self, name_space: impl Into<String>, identifier: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        let items = self.name_spaces.entry(name_space.into()).or_default();
        items.push((identifier.into(), value.into()));
        self
    }

    fn build(self) -> Document {
        let name_spaces = (!self.name_spaces.is_empty()).then(|| {
            self.name_spaces
                .into_iter()
                .map(|(name_space, items)| {
                    let items = items
                        .into_iter()
                        .zip(0..)
                        .map(|((element_identifier, element_value), digest_id)| {
                            DataItem(IssuerSignedItem {
                                digest_id,
                                random: rng().random::<[u8; 16]>().to_vec(),
                                element_identifier,
                                element_value,
                            })
                        })
                        .collect();
                    (name_space, items)
                })
                .collect::<IssuerNameSpaces>()
        });

        Document {
            doc_type: self.doc_type,
            issuer_signed: IssuerSigned {
                name_spaces,
                issuer_auth: IssuerAuth::default(),
            },
            device_signed: None,
            errors: None,
        }
    }
}
