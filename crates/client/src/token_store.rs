//! Token store: the authoritative in-memory session, mirrored to durable
//! storage on every change.

use crate::storage::{ACCESS_TOKEN_KEY, KeyValueStore, MemoryStore, REFRESH_TOKEN_KEY, USER_KEY};
use folio_core::{Session, UserProfile};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Shared handle to the current session.
///
/// Cheap to clone; all clones observe the same session. No operation fails:
/// storage problems are logged and the in-memory state stays authoritative.
#[derive(Clone)]
pub struct TokenStore {
    inner: Arc<Inner>,
}

struct Inner {
    storage: Arc<dyn KeyValueStore>,
    session: Mutex<Session>,
}

impl TokenStore {
    /// Restore the session persisted in `storage`.
    ///
    /// A partial credential pair is treated as signed out, and an unparsable
    /// stored profile is dropped.
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let user = storage.get(USER_KEY).and_then(|raw| {
            serde_json::from_str::<UserProfile>(&raw)
                .map_err(|e| warn!(error = %e, "ignoring malformed stored user profile"))
                .ok()
        });
        let session = Session::new(
            storage.get(ACCESS_TOKEN_KEY),
            storage.get(REFRESH_TOKEN_KEY),
            user,
        );
        debug!(
            authenticated = session.is_authenticated(),
            "restored session from storage"
        );
        Self {
            inner: Arc::new(Inner {
                storage,
                session: Mutex::new(session),
            }),
        }
    }

    /// A store with no durable backing.
    pub fn in_memory() -> Self {
        Self::load(Arc::new(MemoryStore::new()))
    }

    fn session_guard(&self) -> MutexGuard<'_, Session> {
        self.inner.session.lock().unwrap_or_else(|poisoned| {
            warn!("session mutex was poisoned, recovering with into_inner()");
            poisoned.into_inner()
        })
    }

    pub fn session(&self) -> Session {
        self.session_guard().clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.session_guard().access_token.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.session_guard().refresh_token.clone()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.session_guard().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session_guard().is_authenticated()
    }

    /// Replace the whole session. A partial credential pair clears it.
    pub fn set_session(&self, access: &str, refresh: &str, user: Option<UserProfile>) {
        let session = Session::new(Some(access.to_string()), Some(refresh.to_string()), user);
        if !session.is_authenticated() {
            warn!("refusing to store a partial session");
            self.clear();
            return;
        }

        let mut current = self.session_guard();
        let storage = &self.inner.storage;
        storage.set(ACCESS_TOKEN_KEY, access);
        storage.set(REFRESH_TOKEN_KEY, refresh);
        match session.user.as_ref().map(serde_json::to_string) {
            Some(Ok(json)) => storage.set(USER_KEY, &json),
            Some(Err(e)) => {
                warn!(error = %e, "failed to serialize user profile");
                storage.remove(USER_KEY);
            }
            None => storage.remove(USER_KEY),
        }
        *current = session;
        info!("session established");
    }

    /// Swap in a refreshed access token, keeping the refresh token and user.
    ///
    /// Ignored when there is no session to attach it to.
    pub fn set_access_token(&self, access: &str) {
        if access.is_empty() {
            warn!("ignoring empty access token");
            return;
        }
        let mut current = self.session_guard();
        if current.refresh_token.is_none() {
            warn!("ignoring access token update without an active session");
            return;
        }
        self.inner.storage.set(ACCESS_TOKEN_KEY, access);
        current.access_token = Some(access.to_string());
        debug!("access token replaced");
    }

    /// Drop the session and remove every session key from storage.
    pub fn clear(&self) {
        let mut current = self.session_guard();
        let storage = &self.inner.storage;
        storage.remove(ACCESS_TOKEN_KEY);
        storage.remove(REFRESH_TOKEN_KEY);
        storage.remove(USER_KEY);
        if current.is_authenticated() {
            info!("session cleared");
        }
        *current = Session::default();
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
