//! Session context: the bearer token, the signed-in user id and the
//! local "jobs applied" counter.
//!
//! [`SessionContext`] is loaded once from a [`SessionStore`] at start-up
//! and then shared (it is cheap to clone) with every component that needs
//! credentials. Mutations update the in-memory copy first and then write
//! through to the store, so a failing store never leaves stale
//! credentials in memory after [`SessionContext::sign_out`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};

use crate::error::CoreError;
use crate::types::UserId;

/// A complete credential pair. Only exists when both halves are present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub user_id: UserId,
}

/// The persisted session record.
///
/// Keys mirror the browser storage keys of the web client (`token`,
/// `userId`, `appliedCount`) so a record can be moved between the two.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    /// Non-authoritative count of "apply" clicks.
    #[serde(default)]
    pub applied_count: u32,
}

impl StoredSession {
    /// Return the credential pair if both token and user id are set and non-empty.
    pub fn credentials(&self) -> Option<Credentials> {
        match (self.token.as_deref(), self.user_id.as_deref()) {
            (Some(token), Some(user_id)) if !token.is_empty() && !user_id.is_empty() => {
                Some(Credentials {
                    token: token.to_string(),
                    user_id: user_id.to_string(),
                })
            }
            _ => None,
        }
    }
}

/// Backing storage for the session record.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Read the stored record. A store with nothing in it yields the default record.
    async fn load(&self) -> Result<StoredSession, CoreError>;

    /// Replace the stored record.
    async fn save(&self, session: &StoredSession) -> Result<(), CoreError>;

    /// Forget everything, including the applied counter.
    async fn clear(&self) -> Result<(), CoreError> {
        self.save(&StoredSession::default()).await
    }
}

// ---------------------------------------------------------------------------
// FileSessionStore
// ---------------------------------------------------------------------------

/// Stores the session record as pretty-printed JSON in a single file.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<StoredSession, CoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) if raw.trim().is_empty() => Ok(StoredSession::default()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No session file, starting signed out");
                Ok(StoredSession::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, session: &StoredSession) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_string_pretty(session)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), CoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// MemorySessionStore
// ---------------------------------------------------------------------------

/// Keeps the session record in memory only.
#[derive(Default)]
pub struct MemorySessionStore {
    inner: Mutex<StoredSession>,
}

impl MemorySessionStore {
    pub fn new(session: StoredSession) -> Self {
        Self {
            inner: Mutex::new(session),
        }
    }

    /// Current contents of the store.
    pub async fn snapshot(&self) -> StoredSession {
        self.inner.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Result<StoredSession, CoreError> {
        Ok(self.inner.lock().await.clone())
    }

    async fn save(&self, session: &StoredSession) -> Result<(), CoreError> {
        *self.inner.lock().await = session.clone();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SessionContext
// ---------------------------------------------------------------------------

/// Shared, explicitly-injected session state.
#[derive(Clone)]
pub struct SessionContext {
    state: Arc<RwLock<StoredSession>>,
    store: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the token.
        f.debug_struct("SessionContext").finish_non_exhaustive()
    }
}

impl SessionContext {
    /// Read the store once and build a context around its contents.
    pub async fn load(store: Arc<dyn SessionStore>) -> Result<Self, CoreError> {
        let stored = store.load().await?;
        tracing::debug!(
            signed_in = stored.credentials().is_some(),
            applied_count = stored.applied_count,
            "Session loaded",
        );
        Ok(Self {
            state: Arc::new(RwLock::new(stored)),
            store,
        })
    }

    /// A context backed by a fresh [`MemorySessionStore`].
    pub fn ephemeral(initial: StoredSession) -> Self {
        Self {
            state: Arc::new(RwLock::new(initial.clone())),
            store: Arc::new(MemorySessionStore::new(initial)),
        }
    }

    pub async fn credentials(&self) -> Option<Credentials> {
        self.state.read().await.credentials()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.credentials().is_some()
    }

    /// Bearer token, if any. Present even when the user id is missing.
    pub async fn token(&self) -> Option<String> {
        self.state.read().await.token.clone()
    }

    pub async fn user_id(&self) -> Option<UserId> {
        self.state.read().await.user_id.clone()
    }

    /// Store a fresh credential pair (login / signup response).
    pub async fn sign_in(&self, credentials: Credentials) -> Result<(), CoreError> {
        let user_id = credentials.user_id.clone();
        self.update(move |s| {
            s.token = Some(credentials.token);
            s.user_id = Some(credentials.user_id);
        })
        .await?;
        tracing::info!(user_id = %user_id, "Signed in");
        Ok(())
    }

    /// Drop the credential pair. The applied counter survives.
    pub async fn sign_out(&self) -> Result<(), CoreError> {
        self.update(|s| {
            s.token = None;
            s.user_id = None;
        })
        .await?;
        tracing::info!("Signed out, credentials cleared");
        Ok(())
    }

    /// Wipe the whole record, in memory and in the store.
    pub async fn reset(&self) -> Result<(), CoreError> {
        *self.state.write().await = StoredSession::default();
        self.store.clear().await?;
        tracing::info!("Session reset");
        Ok(())
    }

    pub async fn applied_count(&self) -> u32 {
        self.state.read().await.applied_count
    }

    /// Increment the applied counter and return its new value.
    pub async fn record_application(&self) -> Result<u32, CoreError> {
        let snapshot = self
            .update(|s| s.applied_count = s.applied_count.saturating_add(1))
            .await?;
        Ok(snapshot.applied_count)
    }

    async fn update<F>(&self, mutate: F) -> Result<StoredSession, CoreError>
    where
        F: FnOnce(&mut StoredSession),
    {
        let snapshot = {
            let mut state = self.state.write().await;
            mutate(&mut *state);
            state.clone()
        };
        if let Err(e) = self.store.save(&snapshot).await {
            tracing::error!(error = %e, "Failed to persist session");
            return Err(e);
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_in() -> StoredSession {
        StoredSession {
            token: Some("tok".into()),
            user_id: Some("7".into()),
            applied_count: 3,
        }
    }

    #[test]
    fn credentials_require_both_halves() {
        assert!(signed_in().credentials().is_some());

        let no_user = StoredSession {
            user_id: None,
            ..signed_in()
        };
        assert!(no_user.credentials().is_none());

        let empty_token = StoredSession {
            token: Some(String::new()),
            ..signed_in()
        };
        assert!(empty_token.credentials().is_none());
    }

    #[test]
    fn stored_session_uses_browser_key_names() {
        let json = serde_json::to_value(signed_in()).unwrap();
        assert_eq!(json["token"], "tok");
        assert_eq!(json["userId"], "7");
        assert_eq!(json["appliedCount"], 3);
    }

    #[tokio::test]
    async fn sign_out_keeps_applied_count_and_writes_through() {
        let store = Arc::new(MemorySessionStore::new(signed_in()));
        let session = SessionContext::load(store.clone()).await.unwrap();
        assert!(session.is_authenticated().await);

        session.sign_out().await.unwrap();

        assert!(!session.is_authenticated().await);
        assert_eq!(session.applied_count().await, 3);
        let persisted = store.snapshot().await;
        assert!(persisted.token.is_none());
        assert!(persisted.user_id.is_none());
        assert_eq!(persisted.applied_count, 3);
    }

    #[tokio::test]
    async fn record_application_increments() {
        let session = SessionContext::ephemeral(StoredSession::default());
        assert_eq!(session.record_application().await.unwrap(), 1);
        assert_eq!(session.record_application().await.unwrap(), 2);
        assert_eq!(session.applied_count().await, 2);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let session = SessionContext::ephemeral(StoredSession::default());
        let other = session.clone();
        session
            .sign_in(Credentials {
                token: "abc".into(),
                user_id: "u1".into(),
            })
            .await
            .unwrap();
        assert_eq!(other.user_id().await.as_deref(), Some("u1"));
    }
}
