//! # Fixtures

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;
use vp_history::mdoc::{DeviceResponseBuilder, DocumentBuilder};
use vp_history::{DescriptorMap, PresentationLog, PresentationSubmission};

pub const MDL_NAMESPACE: &str = "org.iso.18013.5.1";

pub fn submitted_at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, day, 9, 30, 0).single().unwrap_or_default()
}

/// A log entry with no tokens, submitted on the given day of May 2024.
pub fn log(day: u32) -> PresentationLog {
    PresentationLog {
        id: Uuid::new_v4().to_string(),
        verifier_name: Some("Digital ID Verifier".to_string()),
        verifier_url: Some("https://verifier.example.com".to_string()),
        submit_at: submitted_at(day),
        is_success: true,
        id_token: None,
        vp_token: None,
        presentation_submission: None,
        message: None,
    }
}

pub fn submission() -> PresentationSubmission {
    PresentationSubmission {
        id: "mdl-submission".to_string(),
        definition_id: "mdl-definition".to_string(),
        descriptor_map: vec![DescriptorMap {
            id: "org.iso.18013.5.1.mDL".to_string(),
            format: "mso_mdoc".to_string(),
            path: "$".to_string(),
            path_nested: None,
        }],
    }
}

/// A `vp_token` holding one mDL with `given_name` and `document_number`.
///
/// # Panics
///
/// Panics if the token cannot be encoded.
pub fn mdl_token() -> String {
    DeviceResponseBuilder::new()
        .document(
            DocumentBuilder::new("org.iso.18013.5.1.mDL")
                .claim(MDL_NAMESPACE, "given_name", "Jane")
                .claim(MDL_NAMESPACE, "document_number", "D1234567"),
        )
        .build()
        .expect("should encode")
}

/// A log entry that presented [`mdl_token`].
pub fn mdl_log(day: u32) -> PresentationLog {
    PresentationLog {
        vp_token: Some(mdl_token()),
        presentation_submission: Some(submission()),
        ..log(day)
    }
}

/// A log entry with a serialized form as the wallet stores it.
pub fn stored_log_json() -> serde_json::Value {
    serde_json::json!({
        "id": "stored-1",
        "verifierName": "Digital ID Verifier",
        "verifierURL": "https://verifier.example.com",
        "submitAt": "2024-05-03T09:30:00Z",
        "isSuccess": false,
        "idToken": "abc",
        "message": "User declined"
    })
}
