//! Response DTOs for the gateway API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheStats;

/// Details of a freshly cached preview
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedPostInfo {
    /// Key the preview was stored under
    pub post_id: String,
    /// Requested TTL in milliseconds, or the default when none was given
    pub expires_in: i64,
}

/// Response body for POST /api/cache/posts
#[derive(Debug, Clone, Serialize)]
pub struct CachePostResponse {
    pub success: bool,
    pub message: String,
    pub data: CachedPostInfo,
}

impl CachePostResponse {
    /// Creates a new CachePostResponse
    pub fn new(post_id: impl Into<String>, expires_in: i64) -> Self {
        Self {
            success: true,
            message: "Post cached successfully".to_string(),
            data: CachedPostInfo {
                post_id: post_id.into(),
                expires_in,
            },
        }
    }
}

/// Response body for GET /api/cache/posts/:postId
#[derive(Debug, Clone, Serialize)]
pub struct CachedPostResponse {
    pub success: bool,
    /// The payload exactly as it was cached
    pub data: Value,
}

impl CachedPostResponse {
    pub fn new(data: Value) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Response body for DELETE /api/cache/posts/:postId
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    /// Whether an entry was actually removed
    pub deleted: bool,
}

impl DeleteResponse {
    pub fn new(deleted: bool) -> Self {
        Self {
            success: true,
            deleted,
        }
    }
}

/// Response body for GET /api/cache/stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub data: CacheStats,
}

impl StatsResponse {
    pub fn new(data: CacheStats) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Response body for the health endpoint (GET /api/health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status, always "ok"
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Body returned when the health limiter rejects a check
#[derive(Debug, Clone, Serialize)]
pub struct HealthErrorResponse {
    /// Always "error"
    pub status: String,
    pub message: String,
}

impl HealthErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}

/// Error response body for all other error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Always false
    pub success: bool,
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}
