//! Shared helpers for the REST client tests: an in-process mock backend
//! served by axum on an ephemeral port.

#![allow(dead_code)]

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::Router;
use bridgeai_api::BridgeApi;
use bridgeai_core::session::{SessionContext, StoredSession};

pub const TOKEN: &str = "test-token";
pub const USER_ID: &str = "user-1";

/// Serve `app` on `127.0.0.1:0` and return its base URL.
pub async fn spawn_backend(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// A base URL nothing listens on.
pub async fn dead_backend() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn signed_in_session() -> SessionContext {
    SessionContext::ephemeral(StoredSession {
        token: Some(TOKEN.into()),
        user_id: Some(USER_ID.into()),
        applied_count: 0,
    })
}

pub fn signed_out_session() -> SessionContext {
    SessionContext::ephemeral(StoredSession::default())
}

pub fn client(base_url: String, session: SessionContext) -> BridgeApi {
    BridgeApi::with_client(reqwest::Client::new(), base_url, session)
}

/// True when the request carries the test bearer token.
pub fn has_token(headers: &HeaderMap) -> bool {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}
