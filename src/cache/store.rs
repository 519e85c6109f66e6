//! Cache Store Module
//!
//! Key-value storage where every entry carries an absolute expiry. Expired
//! entries are dropped lazily on `get`/`has` and eagerly by `purge_expired`.

use std::collections::HashMap;
use std::sync::Arc;

use crate::cache::{CacheEntry, CacheStats};
use crate::clock::{deadline_after, Clock, SystemClock};

// == TTL Cache ==
/// Process-local store mapping string keys to opaque payloads.
#[derive(Debug)]
pub struct TtlCache<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// TTL in milliseconds for entries stored without an explicit TTL
    default_ttl_ms: u64,
    /// Time source for expiry checks
    clock: Arc<dyn Clock>,
}

impl<V> TtlCache<V> {
    // == Constructor ==
    /// Creates an empty cache backed by the system clock.
    ///
    /// # Arguments
    /// * `default_ttl_ms` - TTL used when `set` is called without one
    pub fn new(default_ttl_ms: u64) -> Self {
        Self::with_clock(default_ttl_ms, Arc::new(SystemClock))
    }

    /// Creates an empty cache reading time from `clock`.
    pub fn with_clock(default_ttl_ms: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            default_ttl_ms,
            clock,
        }
    }

    // == Set ==
    /// Stores `payload` under `key`, replacing any previous entry and its expiry.
    ///
    /// `None` or a zero TTL falls back to the default TTL. A negative TTL is
    /// accepted as-is and produces an entry that is already expired.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `payload` - The payload to store
    /// * `ttl_ms` - Optional TTL in milliseconds
    pub fn set(&mut self, key: impl Into<String>, payload: V, ttl_ms: Option<i64>) {
        let expires_at = deadline_after(self.clock.now_ms(), self.effective_ttl_ms(ttl_ms));
        self.entries
            .insert(key.into(), CacheEntry::new(payload, expires_at));
    }

    // == Effective TTL ==
    /// Resolves the TTL `set` would apply for a requested `ttl_ms`.
    pub fn effective_ttl_ms(&self, ttl_ms: Option<i64>) -> i64 {
        match ttl_ms {
            Some(ttl) if ttl != 0 => ttl,
            _ => i64::try_from(self.default_ttl_ms).unwrap_or(i64::MAX),
        }
    }

    // == Get ==
    /// Retrieves the payload stored under `key`.
    ///
    /// Returns `None` if the key is missing or expired. An expired entry is
    /// removed as a side effect.
    pub fn get(&mut self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        if self.evict_if_expired(key) {
            return None;
        }
        self.entries.get(key).map(|entry| entry.payload.clone())
    }

    // == Has ==
    /// Returns true if `key` holds a live entry, removing it if expired.
    pub fn has(&mut self, key: &str) -> bool {
        !self.evict_if_expired(key) && self.entries.contains_key(key)
    }

    // == Delete ==
    /// Removes the entry for `key` whether or not it has expired.
    ///
    /// Returns true if an entry was present.
    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Stats ==
    /// Returns the raw entry count and keys without filtering expired entries.
    pub fn stats(&self) -> CacheStats {
        CacheStats::from_keys(self.entries.keys())
    }

    // == Purge Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        before - self.entries.len()
    }

    // == Clear ==
    /// Discards every entry. Returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    // == Length ==
    /// Returns the number of stored entries, including unswept expired ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Default TTL in milliseconds.
    pub fn default_ttl_ms(&self) -> u64 {
        self.default_ttl_ms
    }

    fn evict_if_expired(&mut self, key: &str) -> bool {
        let now = self.clock.now_ms();
        let expired = self
            .entries
            .get(key)
            .is_some_and(|entry| entry.is_expired_at(now));
        if expired {
            self.entries.remove(key);
        }
        expired
    }
}
