//! Active user token, read from and written to the host's session.
//!
//! # Design
//! The session is an injected handle shared by the provider and the
//! persister. The provider only reads; the persister is the single place the
//! token changes. Ordering between the two is whatever the session
//! implementation guarantees.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

/// Session key under which the active user token is stored.
pub const USER_TOKEN_KEY: &str = "cinema_user_token";

/// The host's per-session key/value slot.
pub trait Session: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn remove(&self, key: &str);
}

/// A session held in process memory.
#[derive(Debug, Default)]
pub struct MemorySession {
    values: RwLock<HashMap<String, String>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// A session that already carries a user token.
    pub fn with_user_token(token: impl Into<String>) -> Self {
        let session = Self::new();
        session.set(USER_TOKEN_KEY, token.into());
        session
    }
}

impl Session for MemorySession {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        self.values.write().insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.values.write().remove(key);
    }
}

/// Reads the active user token.
#[derive(Clone)]
pub struct AuthTokenProvider {
    session: Arc<dyn Session>,
}

impl AuthTokenProvider {
    pub fn new(session: Arc<dyn Session>) -> Self {
        Self { session }
    }

    pub fn user_token(&self) -> Option<String> {
        self.session.get(USER_TOKEN_KEY).filter(|token| !token.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_token().is_some()
    }
}

/// Writes the active user token after login or registration.
#[derive(Clone)]
pub struct AuthTokenPersister {
    session: Arc<dyn Session>,
}

impl AuthTokenPersister {
    pub fn new(session: Arc<dyn Session>) -> Self {
        Self { session }
    }

    pub fn persist(&self, token: impl Into<String>) {
        self.session.set(USER_TOKEN_KEY, token.into());
        debug!("user token persisted");
    }

    pub fn clear(&self) {
        self.session.remove(USER_TOKEN_KEY);
        debug!("user token cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> (AuthTokenProvider, AuthTokenPersister) {
        let session: Arc<dyn Session> = Arc::new(MemorySession::new());
        (
            AuthTokenProvider::new(Arc::clone(&session)),
            AuthTokenPersister::new(session),
        )
    }

    #[test]
    fn empty_session_is_unauthenticated() {
        let (provider, _) = pair();
        assert_eq!(provider.user_token(), None);
        assert!(!provider.is_authenticated());
    }

    #[test]
    fn persisted_token_is_visible_to_provider() {
        let (provider, persister) = pair();
        persister.persist("userTokenValue");
        assert_eq!(provider.user_token().as_deref(), Some("userTokenValue"));
        assert!(provider.is_authenticated());
    }

    #[test]
    fn clear_removes_token() {
        let (provider, persister) = pair();
        persister.persist("userTokenValue");
        persister.clear();
        assert!(!provider.is_authenticated());
    }

    #[test]
    fn persist_replaces_previous_token() {
        let (provider, persister) = pair();
        persister.persist("first");
        persister.persist("second");
        assert_eq!(provider.user_token().as_deref(), Some("second"));
    }

    #[test]
    fn empty_token_counts_as_absent() {
        let session = Arc::new(MemorySession::with_user_token(""));
        let provider = AuthTokenProvider::new(session);
        assert!(!provider.is_authenticated());
    }

    #[test]
    fn provider_reads_are_repeatable() {
        let session = Arc::new(MemorySession::with_user_token("t"));
        let provider = AuthTokenProvider::new(session);
        assert_eq!(provider.user_token(), provider.user_token());
    }
}
