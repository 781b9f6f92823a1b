//! # Decoded Claims
//!
//! Namespaced claim groups flattened from a `DeviceResponse`.

use std::fmt;

use base64ct::{Base64UrlUnpadded, Encoding};
use ciborium::Value;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::DecodeError;
use crate::mso_mdoc::{DeviceResponse, DocType, NameSpace};

/// Claims decoded from a `vp_token`, one group per document name space.
///
/// Groups and items are kept in the order the issuer stored them.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DecodedClaims(Vec<NamespaceClaims>);

impl DecodedClaims {
    /// The number of namespace groups.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no namespace groups.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over namespace groups in stored order.
    pub fn iter(&self) -> std::slice::Iter<'_, NamespaceClaims> {
        self.0.iter()
    }

    /// Groups for the given name space, across all documents.
    pub fn in_namespace<'a>(
        &'a self, namespace: &'a str,
    ) -> impl Iterator<Item = &'a NamespaceClaims> + 'a {
        self.0.iter().filter(move |group| group.namespace == namespace)
    }

    /// Unwrap into the underlying groups.
    #[must_use]
    pub fn into_inner(self) -> Vec<NamespaceClaims> {
        self.0
    }
}

impl<'a> IntoIterator for &'a DecodedClaims {
    type IntoIter = std::slice::Iter<'a, NamespaceClaims>;
    type Item = &'a NamespaceClaims;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for DecodedClaims {
    type IntoIter = std::vec::IntoIter<NamespaceClaims>;
    type Item = NamespaceClaims;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl TryFrom<DeviceResponse> for DecodedClaims {
    type Error = DecodeError;

    fn try_from(response: DeviceResponse) -> Result<Self, Self::Error> {
        let documents = response.documents.unwrap_or_default();
        if documents.is_empty() {
            return Err(DecodeError::Empty);
        }

        let mut groups = vec![];
        for doc in documents {
            let Some(name_spaces) = doc.issuer_signed.name_spaces else {
                continue;
            };
            for (namespace, items) in name_spaces {
                if items.is_empty() {
                    continue;
                }
                groups.push(NamespaceClaims {
                    doc_type: doc.doc_type.clone(),
                    namespace,
                    items: items
                        .into_iter()
                        .map(|item| {
                            let item = item.into_inner();
                            ClaimItem {
                                element_identifier: item.element_identifier,
                                value: ClaimValue(item.element_value),
                            }
                        })
                        .collect(),
                });
            }
        }

        if groups.is_empty() {
            return Err(DecodeError::Empty);
        }
        Ok(Self(groups))
    }
}

/// The issuer-signed items of a single name space within a document.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NamespaceClaims {
    /// Document type of the document the items came from.
    pub doc_type: DocType,

    /// Name space, e.g. `org.iso.18013.5.1`.
    pub namespace: NameSpace,

    /// Items in stored order.
    pub items: Vec<ClaimItem>,
}

impl NamespaceClaims {
    /// Build a lookup of element identifier to value.
    ///
    /// When an identifier is repeated the first occurrence wins.
    #[must_use]
    pub fn element_map(&self) -> IndexMap<&str, &ClaimValue> {
        let mut map = IndexMap::with_capacity(self.items.len());
        for item in &self.items {
            map.entry(item.element_identifier.as_str()).or_insert(&item.value);
        }
        map
    }

    /// Look up a single element by identifier.
    #[must_use]
    pub fn get(&self, element_identifier: &str) -> Option<&ClaimValue> {
        self.items
            .iter()
            .find(|item| item.element_identifier == element_identifier)
            .map(|item| &item.value)
    }

    /// Select the holder name and a detail field for display.
    ///
    /// Both fields are selected by identifier. Without a `detail_identifier`
    /// the first item that is not the name field is used.
    #[must_use]
    pub fn display_fields(
        &self, name_identifier: &str, detail_identifier: Option<&str>,
    ) -> DisplayFields<'_> {
        let elements = self.element_map();
        let detail = match detail_identifier {
            Some(identifier) => elements.get(identifier).copied(),
            None => elements
                .iter()
                .find(|(identifier, _)| **identifier != name_identifier)
                .map(|(_, value)| *value),
        };

        DisplayFields {
            name: elements.get(name_identifier).copied(),
            detail,
        }
    }
}

/// Fields chosen from a name space for a compact display.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DisplayFields<'a> {
    /// The holder name field, if present.
    pub name: Option<&'a ClaimValue>,

    /// The detail field, if present.
    pub detail: Option<&'a ClaimValue>,
}

/// A single issuer-signed claim.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClaimItem {
    /// Data element identifier, e.g. `family_name`.
    pub element_identifier: String,

    /// Data element value.
    pub value: ClaimValue,
}

/// A claim value as found in the token, renderable as a string or JSON.
#[derive(Clone, Debug, PartialEq)]
pub struct ClaimValue(pub Value);

impl ClaimValue {
    /// The value as text, when it is a CBOR text string (tags are looked
    /// through, so `full-date` and `tdate` values qualify).
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        let mut value = &self.0;
        while let Value::Tag(_, inner) = value {
            value = inner;
        }
        value.as_text()
    }

    /// Convert to a JSON value.
    ///
    /// Byte strings become base64url text; tags are dropped in favour of
    /// their content.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        to_json(&self.0)
    }
}

impl From<Value> for ClaimValue {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl fmt::Display for ClaimValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_json() {
            serde_json::Value::String(s) => write!(f, "{s}"),
            value => write!(f, "{value}"),
        }
    }
}

impl Serialize for ClaimValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Text(txt) => serde_json::Value::String(txt.clone()),
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Null => serde_json::Value::Null,
        Value::Integer(int) => {
            let int = i128::from(*int);
            i64::try_from(int).map_or_else(
                |_| {
                    u64::try_from(int)
                        .map_or_else(|_| int.to_string().into(), serde_json::Value::from)
                },
                serde_json::Value::from,
            )
        }
        Value::Float(float) => serde_json::Number::from_f64(*float)
            .map_or(serde_json::Value::Null, serde_json::Value::Number),
        Value::Bytes(bytes) => Base64UrlUnpadded::encode_string(bytes).into(),
        Value::Tag(_, inner) => to_json(inner),
        Value::Array(items) => items.iter().map(to_json).collect(),
        Value::Map(entries) => entries
            .iter()
            .map(|(key, value)| {
                let key = match to_json(key) {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                (key, to_json(value))
            })
            .collect::<serde_json::Map<_, _>>()
            .into(),
        _ => serde_json::Value::Null,
    }
}
