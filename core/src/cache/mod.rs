//! Cache storage for read results.
//!
//! # Design
//! The pipeline only needs `has`/`get`/`set` with a time-to-live; expiry is
//! the store's business. `MemoryCache` expires lazily on read and can be
//! swept with `purge_expired`.

mod key;
mod lifetime;

pub use key::{KeyGenerator, KEY_PREFIX};
pub use lifetime::LifetimeGenerator;

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

/// Key/value store with per-entry time-to-live.
///
/// Implementations shared across threads must make `set` atomic per key.
pub trait Cache: Send + Sync {
    fn has(&self, key: &str) -> bool;
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String, ttl: Duration);
}

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// An in-process TTL cache.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        before - entries.len()
    }

    /// Number of stored entries, expired ones included until purged.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Cache for MemoryCache {
    fn has(&self, key: &str) -> bool {
        let now = Instant::now();
        self.entries.read().get(key).is_some_and(|entry| entry.is_live(now))
    }

    fn get(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        self.entries
            .read()
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone())
    }

    fn set(&self, key: &str, value: String, ttl: Duration) {
        let now = Instant::now();
        // Saturate far-future TTLs instead of overflowing Instant.
        let expires_at = now
            .checked_add(ttl)
            .unwrap_or_else(|| now + Duration::from_secs(60 * 60 * 24 * 365 * 100));
        self.entries
            .write()
            .insert(key.to_string(), Entry { value, expires_at });
    }
}
