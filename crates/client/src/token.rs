//! Per-session token persistence.
//!
//! The store is the session-scoped equivalent of the browser's local
//! storage: two independently named values (access and refresh token),
//! read and written synchronously. It is constructed once per user
//! session and passed explicitly to the client, so tests can instantiate
//! isolated sessions.

use std::sync::{Arc, Mutex, PoisonError};

use rentflow_core::AuthTokenPair;

#[derive(Debug, Default)]
struct StoredTokens {
    access: Option<String>,
    refresh: Option<String>,
}

/// Cheap-clone handle to a session's stored tokens.
///
/// All clones see the same values. Reads and writes each take the internal
/// lock briefly; the lock is never held across a network call, so two
/// in-flight requests refreshing at once simply race and the latest
/// written token wins.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    inner: Arc<Mutex<StoredTokens>>,
}

impl TokenStore {
    /// Create an empty store (not authenticated).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding a full pair.
    #[must_use]
    pub fn with_pair(pair: AuthTokenPair) -> Self {
        let store = Self::new();
        store.set_pair(pair);
        store
    }

    /// Create a store holding only an access token (no refresh token).
    #[must_use]
    pub fn with_access(access: impl Into<String>) -> Self {
        let store = Self::new();
        store.lock().access = Some(access.into());
        store
    }

    /// Store a new pair, replacing whatever was there.
    pub fn set_pair(&self, pair: AuthTokenPair) {
        let mut tokens = self.lock();
        tokens.access = Some(pair.access);
        tokens.refresh = Some(pair.refresh);
    }

    /// The current access token, if any.
    #[must_use]
    pub fn access(&self) -> Option<String> {
        self.lock().access.clone()
    }

    /// The current refresh token, if any.
    #[must_use]
    pub fn refresh(&self) -> Option<String> {
        self.lock().refresh.clone()
    }

    /// The stored pair, when both values are present.
    #[must_use]
    pub fn pair(&self) -> Option<AuthTokenPair> {
        let tokens = self.lock();
        Some(AuthTokenPair {
            access: tokens.access.clone()?,
            refresh: tokens.refresh.clone()?,
        })
    }

    /// Overwrite the access token in place, leaving the refresh token
    /// untouched.
    pub fn replace_access(&self, access: String) {
        self.lock().access = Some(access);
    }

    /// Delete both stored values.
    pub fn clear(&self) {
        let mut tokens = self.lock();
        tokens.access = None;
        tokens.refresh = None;
    }

    /// Whether an access token is currently stored.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.lock().access.is_some()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoredTokens> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
