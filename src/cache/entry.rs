//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with an absolute expiry.

// == Cache Entry ==
/// A stored payload and the instant it stops being visible.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
    /// The stored payload, never inspected by the cache
    pub payload: V,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry expiring at `expires_at`.
    pub fn new(payload: V, expires_at: u64) -> Self {
        Self {
            payload,
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now_ms`.
    ///
    /// An entry is expired only once the current time is strictly greater than
    /// its expiration time; at `now_ms == expires_at` it is still visible.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms > self.expires_at
    }
}
