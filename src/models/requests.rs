//! Request DTOs for the gateway API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;
use serde_json::{Number, Value};

/// Request body for caching a post preview (POST /api/cache/posts)
///
/// # Fields
/// - `postId`: Key the preview is stored under, a string or a number
/// - `postData`: Arbitrary JSON payload, stored untouched
/// - `ttl`: Optional TTL in milliseconds (default TTL if absent or 0),
///   fractions are truncated
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachePostRequest {
    #[serde(default)]
    pub post_id: Option<Value>,
    #[serde(default)]
    pub post_data: Option<Value>,
    #[serde(default)]
    pub ttl: Option<Number>,
}

/// A request that carries both a post id and a payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidCachePost {
    pub post_id: String,
    pub post_data: Value,
    pub ttl: Option<i64>,
}

impl CachePostRequest {
    /// Message returned when `postId` or `postData` is missing
    pub const MISSING_FIELDS: &'static str = "postId and postData are required";

    /// Checks required fields.
    ///
    /// Returns `None` if `postId` is missing, empty, zero or neither a string
    /// nor a number, or if `postData` is missing or `null`.
    pub fn validate(self) -> Option<ValidCachePost> {
        let post_id = self.post_id.as_ref().and_then(post_id_key)?;
        let post_data = self.post_data?;

        Some(ValidCachePost {
            post_id,
            post_data,
            ttl: self.ttl.as_ref().and_then(ttl_ms),
        })
    }
}

/// Cache key for a post id; numbers are keyed by their decimal form.
fn post_id_key(id: &Value) -> Option<String> {
    match id {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

fn ttl_ms(ttl: &Number) -> Option<i64> {
    ttl.as_i64().or_else(|| ttl.as_f64().map(|ms| ms.trunc() as i64))
}
