//! Document Deletion Tests

use test_utils::Wallet;
use vp_history::{DeletionConfig, DeletionError, DeletionOutcome, DocumentType};

fn wallet(mdls: usize, pids: usize) -> Wallet {
    let wallet = Wallet::new();
    for i in 0..mdls {
        wallet.add_document(DocumentType::mdl(), &format!("mdl-{i}")).expect("should add");
    }
    for i in 0..pids {
        wallet.add_document(DocumentType::pid(), &format!("pid-{i}")).expect("should add");
    }
    wallet
}

async fn delete(
    wallet: &Wallet, document_id: &str, document_type: &DocumentType,
) -> Result<DeletionOutcome, DeletionError> {
    let config = DeletionConfig::default();
    vp_history::delete_document(wallet, &config, document_id, document_type).await
}

// Should clear the type and require a restart when the last mDL is deleted.
#[tokio::test]
async fn last_mdl() {
    let wallet = wallet(1, 1);

    let outcome = delete(&wallet, "mdl-0", &DocumentType::mdl()).await.expect("should delete");

    assert!(outcome.should_reboot);
    assert_eq!(wallet.documents().expect("should list"), ["pid-0"]);
    assert_eq!(wallet.delete_calls().expect("should count"), 1);
}

// Should delete only the requested mDL when others remain.
#[tokio::test]
async fn one_of_three_mdls() {
    let wallet = wallet(3, 0);

    let outcome = delete(&wallet, "mdl-1", &DocumentType::mdl()).await.expect("should delete");

    assert!(!outcome.should_reboot);
    assert_eq!(wallet.documents().expect("should list"), ["mdl-0", "mdl-2"]);
}

// Should delete a single document of any other type, even the last one.
#[tokio::test]
async fn last_pid() {
    let wallet = wallet(1, 1);

    let outcome = delete(&wallet, "pid-0", &DocumentType::pid()).await.expect("should delete");

    assert!(!outcome.should_reboot);
    assert_eq!(wallet.documents().expect("should list"), ["mdl-0"]);
}

// Should return the store's error and call the store exactly once.
#[tokio::test]
async fn store_failure_not_retried() {
    let wallet = wallet(1, 0);
    wallet.fail_deletes().expect("should set failure");

    let err = delete(&wallet, "mdl-0", &DocumentType::mdl()).await.expect_err("should fail");

    let DeletionError::Store(cause) = &err;
    assert_eq!(cause.to_string(), "document store is read-only");
    assert_eq!(wallet.delete_calls().expect("should count"), 1);
    assert_eq!(wallet.documents().expect("should list"), ["mdl-0"]);
}

// Should fail without deleting when the type index is unavailable.
#[tokio::test]
async fn index_failure() {
    let wallet = wallet(2, 0);
    wallet.fail_fetches().expect("should set failure");

    let err = delete(&wallet, "mdl-0", &DocumentType::mdl()).await.expect_err("should fail");

    assert_eq!(err.cause().to_string(), "document store unavailable");
    assert_eq!(wallet.delete_calls().expect("should count"), 0);
}
