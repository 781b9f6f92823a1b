//! Presentation History Tests

use test_utils::{Wallet, fixtures};
use vp_history::mdoc::DecodeError;
use vp_history::{ClientConsent, HistoryConfig, HistoryError, PresentationLog, ProjectionError};

// Should resolve an id-token-only entry and keep its summary fields.
#[tokio::test]
async fn id_token_only() {
    let wallet = Wallet::new();
    let log = PresentationLog {
        id_token: Some("abc".to_string()),
        ..fixtures::log(1)
    };
    wallet.add_log(log.clone()).expect("should add log");

    let records = vp_history::history(&wallet).await.expect("should fetch history");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, log.id);
    assert_eq!(records[0].verifier_name, log.verifier_name);
    assert_eq!(records[0].verifier_url, log.verifier_url);
    assert_eq!(records[0].submit_at, log.submit_at);
    assert!(records[0].is_success);

    let detail = vp_history::history_detail(&wallet, &log.id).await.expect("should fetch detail");
    assert_eq!(
        detail.consent,
        ClientConsent::IdToken {
            id_token: "abc".to_string()
        }
    );
    assert!(detail.claims().is_none());
}

// Should decode a one-document, one-namespace token into a single group with
// items in stored order.
#[tokio::test]
async fn mdl_claims() {
    let wallet = Wallet::new();
    let log = fixtures::mdl_log(2);
    wallet.add_log(log.clone()).expect("should add log");

    let detail = vp_history::history_detail(&wallet, &log.id).await.expect("should fetch detail");
    assert_eq!(detail.consent.kind(), "vp_token");
    assert_eq!(detail.presentation_submission, Some(fixtures::submission()));

    // --------------------------------------------------
    // Claims are decoded on request
    // --------------------------------------------------
    let claims = detail.claims().expect("has vp_token").expect("should decode");
    assert_eq!(claims.len(), 1);

    let group = claims.iter().next().expect("one group");
    assert_eq!(group.doc_type, "org.iso.18013.5.1.mDL");
    assert_eq!(group.namespace, fixtures::MDL_NAMESPACE);

    let identifiers: Vec<&str> =
        group.items.iter().map(|item| item.element_identifier.as_str()).collect();
    assert_eq!(identifiers, ["given_name", "document_number"]);

    // --------------------------------------------------
    // Display fields follow the configured identifiers
    // --------------------------------------------------
    let display = HistoryConfig::default().display;
    let fields =
        group.display_fields(&display.name_identifier, display.detail_identifier.as_deref());
    assert_eq!(fields.name.and_then(|v| v.as_text()), Some("Jane"));
    assert_eq!(fields.detail.and_then(|v| v.as_text()), Some("D1234567"));
}

// Should list summaries most recent first.
#[tokio::test]
async fn history_order() {
    let wallet = Wallet::new();
    let first = fixtures::log(1);
    let second = PresentationLog {
        is_success: false,
        ..fixtures::log(4)
    };
    wallet.add_log(first.clone()).expect("should add log");
    wallet.add_log(second.clone()).expect("should add log");

    let records = vp_history::history(&wallet).await.expect("should fetch history");
    let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, [second.id.as_str(), first.id.as_str()]);
    assert_eq!(records[0].outcome().to_string(), "Fail");
}

// Should return an empty list for an empty store.
#[tokio::test]
async fn empty_history() {
    let records = vp_history::history(&Wallet::new()).await.expect("should fetch history");
    assert!(records.is_empty());
}

// Should project an entry deserialized from its stored form.
#[tokio::test]
async fn stored_entry() {
    let wallet = Wallet::new();
    let log: PresentationLog =
        serde_json::from_value(fixtures::stored_log_json()).expect("should deserialize");
    wallet.add_log(log).expect("should add log");

    let detail = vp_history::history_detail(&wallet, "stored-1").await.expect("should fetch");
    assert!(!detail.record.is_success);
    assert_eq!(detail.message.as_deref(), Some("User declined"));
    assert_eq!(detail.consent.kind(), "id_token");
}

// Should report a missing entry.
#[tokio::test]
async fn not_found() {
    let err = vp_history::history_detail(&Wallet::new(), "missing")
        .await
        .expect_err("should not be found");
    assert!(matches!(err, HistoryError::NotFound(id) if id == "missing"));
}

// Should reject an entry with a vp_token but no submission.
#[tokio::test]
async fn missing_submission() {
    let wallet = Wallet::new();
    let log = PresentationLog {
        vp_token: Some(fixtures::mdl_token()),
        ..fixtures::log(1)
    };
    wallet.add_log(log.clone()).expect("should add log");

    let err = vp_history::history_detail(&wallet, &log.id).await.expect_err("should fail");
    let HistoryError::Projection(ProjectionError::MissingSubmission { id }) = err else {
        panic!("expected missing submission, got {err:?}");
    };
    assert_eq!(id, log.id);
}

// Should surface an undecodable token only when claims are requested.
#[tokio::test]
async fn undecodable_token() {
    let wallet = Wallet::new();
    let log = PresentationLog {
        vp_token: Some("not-base64url!!".to_string()),
        presentation_submission: Some(fixtures::submission()),
        ..fixtures::log(1)
    };
    wallet.add_log(log.clone()).expect("should add log");

    let detail = vp_history::history_detail(&wallet, &log.id).await.expect("should fetch detail");
    assert!(matches!(detail.claims(), Some(Err(DecodeError::Encoding(_)))));
}

// Should propagate store failures when fetching a single entry.
#[tokio::test]
async fn detail_store_failure() {
    let wallet = Wallet::new();
    let log = fixtures::log(1);
    wallet.add_log(log.clone()).expect("should add log");
    wallet.fail_fetches().expect("should set failure");

    let err = vp_history::history_detail(&wallet, &log.id).await.expect_err("should fail");
    let HistoryError::Store(cause) = &err else {
        panic!("expected store error, got {err:?}");
    };
    assert_eq!(cause.to_string(), "presentation log unavailable");
}

// Should propagate store failures.
#[tokio::test]
async fn store_failure() {
    let wallet = Wallet::new();
    wallet.fail_fetches().expect("should set failure");

    let err = vp_history::history(&wallet).await.expect_err("should fail");
    assert!(matches!(err, HistoryError::Store(_)));
    assert_eq!(err.to_string(), "issue fetching presentation log: presentation log unavailable");
}
