//! Cache Statistics Module
//!
//! Snapshot of the raw store contents, used by the debugging endpoint.

use serde::Serialize;

// == Cache Stats ==
/// Entry count and keys as physically stored.
///
/// Expired entries that have not yet been swept or lazily touched are still
/// counted here, so `size` may exceed what `get`/`has` would report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of stored entries, expired or not
    pub size: usize,
    /// Stored keys in ascending order
    pub keys: Vec<String>,
}

impl CacheStats {
    // == Constructor ==
    /// Builds a snapshot from the stored keys.
    pub fn from_keys<'a>(keys: impl IntoIterator<Item = &'a String>) -> Self {
        let mut keys: Vec<String> = keys.into_iter().cloned().collect();
        keys.sort_unstable();

        Self {
            size: keys.len(),
            keys,
        }
    }

    // == Contains ==
    /// Returns true if `key` is listed in the snapshot.
    pub fn contains(&self, key: &str) -> bool {
        self.keys.binary_search_by(|k| k.as_str().cmp(key)).is_ok()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_default() {
        let stats = CacheStats::default();
        assert_eq!(stats.size, 0);
        assert!(stats.keys.is_empty());
    }

    #[test]
    fn test_stats_from_keys_sorted() {
        let keys = ["post-b".to_string(), "post-a".to_string()];
        let stats = CacheStats::from_keys(keys.iter());

        assert_eq!(stats.size, 2);
        assert_eq!(stats.keys, vec!["post-a", "post-b"]);
        assert!(stats.contains("post-a"));
        assert!(!stats.contains("post-c"));
    }

    #[test]
    fn test_stats_serialize() {
        let keys = ["post-42".to_string()];
        let json = serde_json::to_value(CacheStats::from_keys(keys.iter())).unwrap();

        assert_eq!(json["size"], 1);
        assert_eq!(json["keys"][0], "post-42");
    }
}
