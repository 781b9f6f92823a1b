//! # Configuration
//!
//! Settings for the deletion policy and claim display. Defaults match the
//! wallet's built-in behaviour; a JSON document can override any part.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::deletion::DocumentType;

/// Top-level configuration.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct HistoryConfig {
    /// Document deletion policy settings.
    pub deletion: DeletionConfig,

    /// Claim display settings.
    pub display: DisplayConfig,
}

impl HistoryConfig {
    /// Parse configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("issue parsing configuration")
    }

    /// Load configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("issue reading configuration from {}", path.display()))?;
        Self::from_json(&json)
    }
}

/// Deletion policy settings.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct DeletionConfig {
    /// Types for which deleting the last document clears the type and
    /// requires a restart.
    pub single_instance_types: Vec<DocumentType>,
}

impl DeletionConfig {
    /// Whether the type is single-instance-preferred.
    #[must_use]
    pub fn is_single_instance(&self, doc_type: &DocumentType) -> bool {
        self.single_instance_types.contains(doc_type)
    }
}

impl Default for DeletionConfig {
    fn default() -> Self {
        Self {
            single_instance_types: vec![DocumentType::mdl()],
        }
    }
}

/// Which claims to surface in a compact presentation detail.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Name space holding the display fields.
    pub namespace: String,

    /// Identifier of the holder name field.
    pub name_identifier: String,

    /// Identifier of the detail field. When unset, the first item that is not
    /// the name field is used.
    pub detail_identifier: Option<String>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            namespace: "org.iso.18013.5.1".to_string(),
            name_identifier: "given_name".to_string(),
            detail_identifier: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = HistoryConfig::from_json("{}").expect("should parse");
        assert_eq!(config, HistoryConfig::default());
        assert!(config.deletion.is_single_instance(&DocumentType::mdl()));
        assert!(!config.deletion.is_single_instance(&DocumentType::pid()));
        assert_eq!(config.display.name_identifier, "given_name");
    }

    #[test]
    fn partial_override() {
        let config = HistoryConfig::from_json(
            r#"{
                "deletion": {"single_instance_types": ["eu.europa.ec.eudi.pid.1"]},
                "display": {"detail_identifier": "document_number"}
            }"#,
        )
        .expect("should parse");

        assert!(config.deletion.is_single_instance(&DocumentType::pid()));
        assert!(!config.deletion.is_single_instance(&DocumentType::mdl()));
        assert_eq!(config.display.namespace, "org.iso.18013.5.1");
        assert_eq!(config.display.detail_identifier.as_deref(), Some("document_number"));
    }

    #[test]
    fn invalid() {
        let err = HistoryConfig::from_json(r#"{"deletion": 1}"#).expect_err("should fail");
        assert_eq!(err.to_string(), "issue parsing configuration");
    }
}
