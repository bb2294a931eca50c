//! Session management for the admin API.
//!
//! Sessions are server-side: a UUID token maps to the logged-in user inside
//! an injected in-memory store, and the token travels in an http-only
//! cookie.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Default session duration (24 hours).
pub const DEFAULT_SESSION_DURATION_SECS: u64 = 24 * 60 * 60;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "feedmill_session";

/// An authenticated session for a logged-in user.
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// Unique session token (UUID v4).
    pub token: String,
    /// User ID associated with this session.
    pub user_id: i64,
    /// Username captured at login.
    pub username: String,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// When the session expires.
    pub expires_at: DateTime<Utc>,
}

impl AuthSession {
    /// Create a new session for a user with the default duration.
    pub fn new(user_id: i64, username: impl Into<String>) -> Self {
        Self::with_duration(
            user_id,
            username,
            Duration::from_secs(DEFAULT_SESSION_DURATION_SECS),
        )
    }

    /// Create a new session with a custom duration.
    pub fn with_duration(user_id: i64, username: impl Into<String>, duration: Duration) -> Self {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::from_std(duration).unwrap_or_default();

        Self {
            token: Uuid::new_v4().to_string(),
            user_id,
            username: username.into(),
            created_at: now,
            expires_at,
        }
    }

    /// Check if the session has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// In-memory session store shared across the web layer.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<String, AuthSession>>>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, AuthSession>> {
        match self.sessions.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Create and register a session for a user.
    pub fn create(&self, user_id: i64, username: &str) -> AuthSession {
        let session = AuthSession::new(user_id, username);
        self.lock()
            .insert(session.token.clone(), session.clone());
        session
    }

    /// Look up a session by token.
    ///
    /// Expired sessions are removed and treated as absent.
    pub fn get(&self, token: &str) -> Option<AuthSession> {
        let mut sessions = self.lock();
        match sessions.get(token) {
            Some(session) if session.is_expired() => {
                sessions.remove(token);
                None
            }
            Some(session) => Some(session.clone()),
            None => None,
        }
    }

    /// Remove a session. Returns true if it existed.
    pub fn remove(&self, token: &str) -> bool {
        self.lock().remove(token).is_some()
    }

    /// Remove every session (logout-all, tests).
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of live sessions, expired entries included until touched.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_has_token_and_expiry() {
        let session = AuthSession::new(7, "admin");
        assert!(!session.token.is_empty());
        assert_eq!(session.user_id, 7);
        assert_eq!(session.username, "admin");
        assert!(session.expires_at > session.created_at);
        assert!(!session.is_expired());
    }

    #[test]
    fn test_session_expiry() {
        let session = AuthSession::with_duration(1, "admin", Duration::from_secs(0));
        assert!(session.is_expired());
    }

    #[test]
    fn test_store_create_and_get() {
        let store = SessionStore::new();
        let session = store.create(3, "alice");

        let found = store.get(&session.token).unwrap();
        assert_eq!(found.user_id, 3);
        assert_eq!(found.username, "alice");
    }

    #[test]
    fn test_store_unknown_token() {
        let store = SessionStore::new();
        assert!(store.get("no-such-token").is_none());
    }

    #[test]
    fn test_store_removes_expired_on_get() {
        let store = SessionStore::new();
        let session = AuthSession::with_duration(1, "bob", Duration::from_secs(0));
        let token = session.token.clone();
        store.lock().insert(token.clone(), session);

        assert!(store.get(&token).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_remove() {
        let store = SessionStore::new();
        let session = store.create(1, "carol");

        assert!(store.remove(&session.token));
        assert!(!store.remove(&session.token));
        assert!(store.get(&session.token).is_none());
    }

    #[test]
    fn test_store_clear() {
        let store = SessionStore::new();
        store.create(1, "a");
        store.create(2, "b");

        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_tokens_are_unique() {
        let store = SessionStore::new();
        let s1 = store.create(1, "a");
        let s2 = store.create(1, "a");
        assert_ne!(s1.token, s2.token);
        assert_eq!(store.len(), 2);
    }
}
