//! Integration tests for the file-backed session store.
//!
//! Exercises the load-once / write-through lifecycle of
//! [`SessionContext`] against a real file in a temporary directory.

use std::sync::Arc;

use assert_matches::assert_matches;
use bridgeai_core::error::CoreError;
use bridgeai_core::session::{
    Credentials, FileSessionStore, SessionContext, SessionStore, StoredSession,
};

fn credentials() -> Credentials {
    Credentials {
        token: "jwt-token".into(),
        user_id: "7".into(),
    }
}

// ---------------------------------------------------------------------------
// Test: a missing file loads as a signed-out session
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_file_loads_signed_out() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileSessionStore::new(dir.path().join("session.json"));

    let stored = store.load().await.unwrap();

    assert_eq!(stored, StoredSession::default());
}

// ---------------------------------------------------------------------------
// Test: sign-in survives a reload and creates parent directories
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sign_in_persists_across_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("session.json");

    let session = SessionContext::load(Arc::new(FileSessionStore::new(&path)))
        .await
        .unwrap();
    session.sign_in(credentials()).await.unwrap();
    session.record_application().await.unwrap();

    let reloaded = SessionContext::load(Arc::new(FileSessionStore::new(&path)))
        .await
        .unwrap();
    assert_eq!(reloaded.credentials().await, Some(credentials()));
    assert_eq!(reloaded.applied_count().await, 1);
}

// ---------------------------------------------------------------------------
// Test: sign-out removes the credential keys from the file
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sign_out_removes_keys_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let session = SessionContext::load(Arc::new(FileSessionStore::new(&path)))
        .await
        .unwrap();
    session.sign_in(credentials()).await.unwrap();
    session.sign_out().await.unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(json.get("token").is_none());
    assert!(json.get("userId").is_none());
    assert_eq!(json["appliedCount"], 0);
}

// ---------------------------------------------------------------------------
// Test: a corrupt file is reported, not silently discarded
// ---------------------------------------------------------------------------

#[tokio::test]
async fn corrupt_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "{not json").unwrap();

    let result = SessionContext::load(Arc::new(FileSessionStore::new(&path))).await;

    assert_matches!(result, Err(CoreError::SessionStorage(_)));
}

// ---------------------------------------------------------------------------
// Test: reset removes the file and zeroes the counter
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reset_removes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let session = SessionContext::load(Arc::new(FileSessionStore::new(&path)))
        .await
        .unwrap();
    session.sign_in(credentials()).await.unwrap();
    session.record_application().await.unwrap();
    assert!(path.exists());

    session.reset().await.unwrap();

    assert!(!path.exists());
    assert!(!session.is_authenticated().await);
    assert_eq!(session.applied_count().await, 0);
}
