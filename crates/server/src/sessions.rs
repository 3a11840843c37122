//! In-memory session store.
//!
//! Login hands out an opaque bearer token mapped to a user id. Sessions do
//! not survive a restart; clients just log in again.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone)]
struct Session {
    user_id: i64,
    #[allow(dead_code)]
    created_at: DateTime<Utc>,
}

/// Token -> user session map shared across request handlers.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionStore {
    /// Create a session for a user and return the bearer token.
    pub fn create(&self, user_id: i64) -> String {
        let token = Uuid::new_v4().to_string();
        self.inner.write().unwrap().insert(
            token.clone(),
            Session {
                user_id,
                created_at: Utc::now(),
            },
        );
        token
    }

    /// Resolve a token to its user id, if the session exists.
    pub fn resolve(&self, token: &str) -> Option<i64> {
        self.inner.read().unwrap().get(token).map(|s| s.user_id)
    }

    /// Revoke a session. Returns true if it existed.
    pub fn revoke(&self, token: &str) -> bool {
        self.inner.write().unwrap().remove(token).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_resolve() {
        let store = SessionStore::default();
        let token = store.create(42);

        assert_eq!(store.resolve(&token), Some(42));
        assert_eq!(store.resolve("not-a-token"), None);
    }

    #[test]
    fn test_revoke() {
        let store = SessionStore::default();
        let token = store.create(42);

        assert!(store.revoke(&token));
        assert_eq!(store.resolve(&token), None);
        assert!(!store.revoke(&token));
    }

    #[test]
    fn test_tokens_are_unique() {
        let store = SessionStore::default();
        let a = store.create(1);
        let b = store.create(1);
        assert_ne!(a, b);
    }
}
