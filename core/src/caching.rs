//! Cache-aside decorator over `Client::get`.
//!
//! # Design
//! Only the authenticated `get` is cached. Writes and unauthenticated calls
//! pass straight through. A result is stored only after the wrapped client
//! returned it successfully, so failures are always retried against the
//! network. Authentication is checked before the cache is consulted; a
//! logged-out caller gets `UserNotAuthenticated`, never a cached entry.
//!
//! Concurrent misses on the same key may each fetch and store. The last
//! write wins and all writers stored an equivalent success.

use tracing::{debug, warn};

use crate::cache::{Cache, KeyGenerator, LifetimeGenerator};
use crate::client::Client;
use crate::error::ApiError;
use crate::http::{HttpMethod, Query};
use crate::response::ClientResponse;
use crate::status::ExpectedStatus;

pub struct CachingRequestClient<C, S> {
    inner: C,
    cache: S,
    keys: KeyGenerator,
    lifetimes: LifetimeGenerator,
}

impl<C: Client, S: Cache> CachingRequestClient<C, S> {
    pub fn new(inner: C, cache: S, keys: KeyGenerator, lifetimes: LifetimeGenerator) -> Self {
        Self {
            inner,
            cache,
            keys,
            lifetimes,
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn cache(&self) -> &S {
        &self.cache
    }

    fn cached(&self, key: &str, path: &str) -> Option<ClientResponse> {
        if !self.cache.has(key) {
            return None;
        }
        let raw = self.cache.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(response) => Some(response),
            Err(e) => {
                warn!(path, error = %e, "ignoring unreadable cache entry");
                None
            }
        }
    }

    fn store(&self, key: &str, path: &str, response: &ClientResponse) {
        let raw = match serde_json::to_string(response) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path, error = %e, "response not cacheable");
                return;
            }
        };
        let ttl = self.lifetimes.generate();
        self.cache.set(key, raw, ttl);
        debug!(path, ttl_secs = ttl.as_secs(), "cached response");
    }
}

impl<C: Client, S: Cache> Client for CachingRequestClient<C, S> {
    fn get(&self, path: &str, query: &Query, expected: &ExpectedStatus) -> Result<ClientResponse, ApiError> {
        if !self.inner.is_authenticated() {
            return Err(ApiError::UserNotAuthenticated);
        }

        let key = self.keys.generate_key(HttpMethod::Get, path, query);
        if let Some(response) = self.cached(&key, path) {
            debug!(path, "cache hit");
            return Ok(response);
        }

        debug!(path, "cache miss");
        let response = self.inner.get(path, query, expected)?;
        self.store(&key, path, &response);
        Ok(response)
    }

    fn post(&self, path: &str, body: &str, expected: &ExpectedStatus) -> Result<ClientResponse, ApiError> {
        self.inner.post(path, body, expected)
    }

    fn patch(&self, path: &str, body: &str, expected: &ExpectedStatus) -> Result<ClientResponse, ApiError> {
        self.inner.patch(path, body, expected)
    }

    fn get_unauthenticated(
        &self,
        path: &str,
        query: &Query,
        expected: &ExpectedStatus,
    ) -> Result<ClientResponse, ApiError> {
        self.inner.get_unauthenticated(path, query, expected)
    }

    fn post_unauthenticated(
        &self,
        path: &str,
        body: &str,
        expected: &ExpectedStatus,
    ) -> Result<ClientResponse, ApiError> {
        self.inner.post_unauthenticated(path, body, expected)
    }

    fn is_authenticated(&self) -> bool {
        self.inner.is_authenticated()
    }
}
