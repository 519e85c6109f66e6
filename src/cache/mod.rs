//! Cache Module
//!
//! Provides in-memory caching with TTL expiration for post previews.

mod entry;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::TtlCache;

// == Public Constants ==
/// Default TTL for cached previews (30 minutes)
pub const DEFAULT_TTL_MS: u64 = 30 * 60 * 1000;
