//! Session token: an observable in-memory value mirrored to durable storage.

use std::sync::Arc;

use crate::observable::{Observable, Subscription};
use crate::storage::KeyValueStorage;

/// Storage key under which the session token is persisted.
pub const TOKEN_STORAGE_KEY: &str = "videoteca-token";

/// Holds the session token and keeps durable storage in sync with it.
///
/// The in-memory value is the authority: reads never touch storage, and a
/// storage failure downgrades persistence for this process instead of
/// breaking the session. Failures are logged without the token itself.
#[derive(Clone)]
pub struct TokenStore {
    token: Observable<Option<String>>,
    storage: Arc<dyn KeyValueStorage>,
}

impl TokenStore {
    /// Creates a store seeded from whatever `storage` currently holds.
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        let initial = match storage.get(TOKEN_STORAGE_KEY) {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read persisted token, starting signed out");
                None
            }
        };
        Self {
            token: Observable::new(initial),
            storage,
        }
    }

    /// Current token, if any.
    pub fn value(&self) -> Option<String> {
        self.token.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.get().is_some()
    }

    /// Replaces the token in memory, then mirrors the change to storage.
    ///
    /// Subscribers observe the new value even when persistence fails.
    pub fn set(&self, token: Option<&str>) {
        self.token.set(token.map(str::to_string));
        let persisted = match token {
            Some(value) => self.storage.set(TOKEN_STORAGE_KEY, value),
            None => self.storage.remove(TOKEN_STORAGE_KEY),
        };
        if let Err(err) = persisted {
            tracing::warn!(error = %err, "failed to persist token change");
        }
    }

    /// Signs out: drops the token from memory and from storage.
    pub fn clear(&self) {
        self.set(None);
    }

    /// Re-seeds the in-memory token from storage, picking up a sign-in or
    /// sign-out performed by another handle on the same backing file.
    pub fn refresh_from_storage(&self) {
        match self.storage.get(TOKEN_STORAGE_KEY) {
            Ok(token) => self.token.set(token),
            Err(err) => tracing::warn!(error = %err, "failed to re-read persisted token"),
        }
    }

    /// Observes token changes. The callback fires immediately with the
    /// current value, then again after every [`set`](Self::set).
    pub fn subscribe(
        &self,
        callback: impl Fn(&Option<String>) + Send + Sync + 'static,
    ) -> Subscription<Option<String>> {
        self.token.subscribe(callback)
    }
}
