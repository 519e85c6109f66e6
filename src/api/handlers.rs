//! API Handlers
//!
//! HTTP request handlers for the preview cache and health endpoints.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde_json::Value;
use tracing::debug;

use crate::cache::TtlCache;
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::limiter::RateLimiter;
use crate::models::{
    CachePostRequest, CachePostResponse, CachedPostResponse, DeleteResponse, HealthResponse,
    StatsResponse, ValidCachePost,
};

/// Application state shared across all handlers and middleware.
///
/// Every store is constructed once at startup and shared through `Arc<RwLock<_>>`.
#[derive(Clone)]
pub struct AppState {
    /// Preview cache keyed by post id
    pub cache: Arc<RwLock<TtlCache<Value>>>,
    /// Limiter for authenticated traffic
    pub limiter: Arc<RwLock<RateLimiter>>,
    /// Independent limiter for the health endpoint
    pub health_limiter: Arc<RwLock<RateLimiter>>,
    /// Expected `x-api-key` value
    pub api_key: Arc<str>,
}

impl AppState {
    /// Creates a new AppState from already constructed stores.
    pub fn new(
        cache: TtlCache<Value>,
        limiter: RateLimiter,
        health_limiter: RateLimiter,
        api_key: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
            limiter: Arc::new(RwLock::new(limiter)),
            health_limiter: Arc::new(RwLock::new(health_limiter)),
            api_key: api_key.into(),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            TtlCache::new(config.default_ttl_ms),
            RateLimiter::new(config.rate_limit_max, config.rate_limit_window_ms),
            RateLimiter::new(
                config.health_rate_limit_max,
                config.health_rate_limit_window_ms,
            ),
            config.api_secret_key.as_str(),
        )
    }
}

/// Handler for POST /api/cache/posts
///
/// Stores a post preview under its id with an optional TTL.
/// Unreadable bodies are answered with the usual error envelope.
pub async fn cache_post_handler(
    State(state): State<AppState>,
    body: std::result::Result<Json<CachePostRequest>, JsonRejection>,
) -> Result<Json<CachePostResponse>> {
    let Json(req) = body?;
    let ValidCachePost {
        post_id,
        post_data,
        ttl,
    } = req
        .validate()
        .ok_or_else(|| ApiError::InvalidRequest(CachePostRequest::MISSING_FIELDS.to_string()))?;

    let mut cache = state.cache.write().await;
    let expires_in = cache.effective_ttl_ms(ttl);
    cache.set(post_id.clone(), post_data, ttl);
    debug!("Cached preview '{}' for {} ms", post_id, expires_in);

    Ok(Json(CachePostResponse::new(post_id, expires_in)))
}

/// Handler for GET /api/cache/posts/:post_id
///
/// Retrieves a cached preview. Expired previews are dropped and reported as missing.
pub async fn get_cached_post_handler(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<CachedPostResponse>> {
    // Write lock: an expired entry is removed on lookup
    let mut cache = state.cache.write().await;
    let data = cache
        .get(&post_id)
        .ok_or_else(|| ApiError::NotFound("Post not found or expired".to_string()))?;

    Ok(Json(CachedPostResponse::new(data)))
}

/// Handler for DELETE /api/cache/posts/:post_id
///
/// Removes a preview after it was published or discarded.
pub async fn delete_cached_post_handler(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Json<DeleteResponse> {
    let deleted = state.cache.write().await.delete(&post_id);
    Json(DeleteResponse::new(deleted))
}

/// Handler for GET /api/cache/stats
///
/// Returns the raw entry count and keys, including expired entries not yet swept.
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.read().await;
    Json(StatsResponse::new(cache.stats()))
}

/// Handler for GET /api/health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Fallback for unknown routes behind authentication.
pub async fn not_found_handler() -> ApiError {
    ApiError::NotFound("Endpoint not found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_state() -> AppState {
        AppState::from_config(&Config::for_api_key("secret"))
    }

    fn cache_request(post_id: &str, post_data: Value, ttl: Option<i64>) -> CachePostRequest {
        CachePostRequest {
            post_id: Some(json!(post_id)),
            post_data: Some(post_data),
            ttl: ttl.map(Into::into),
        }
    }

    #[tokio::test]
    async fn test_cache_and_get_handler() {
        let state = test_state();

        let req = cache_request("post-1", json!({"title": "Hello"}), None);
        let response = cache_post_handler(State(state.clone()), Ok(Json(req)))
            .await
            .unwrap();
        assert_eq!(response.data.post_id, "post-1");
        assert_eq!(response.data.expires_in, 1_800_000);

        let response = get_cached_post_handler(State(state), Path("post-1".to_string()))
            .await
            .unwrap();
        assert_eq!(response.data, json!({"title": "Hello"}));
    }

    #[tokio::test]
    async fn test_cache_handler_echoes_requested_ttl() {
        let state = test_state();

        let req = cache_request("post-1", json!("body"), Some(500));
        let response = cache_post_handler(State(state), Ok(Json(req))).await.unwrap();

        assert_eq!(response.data.expires_in, 500);
    }

    #[tokio::test]
    async fn test_cache_handler_rejects_missing_fields() {
        let state = test_state();

        let req = CachePostRequest {
            post_id: Some(json!("post-1")),
            ..Default::default()
        };
        let result = cache_post_handler(State(state), Ok(Json(req))).await;

        assert_eq!(
            result.unwrap_err(),
            ApiError::InvalidRequest("postId and postData are required".to_string())
        );
    }

    #[tokio::test]
    async fn test_get_nonexistent_post() {
        let state = test_state();

        let result = get_cached_post_handler(State(state), Path("missing".to_string())).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_pre_expired_post() {
        let state = test_state();

        let req = cache_request("post-1", json!({}), Some(-1));
        cache_post_handler(State(state.clone()), Ok(Json(req)))
            .await
            .unwrap();

        let result = get_cached_post_handler(State(state), Path("post-1".to_string())).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_delete_handler() {
        let state = test_state();

        let req = cache_request("to_delete", json!({}), None);
        cache_post_handler(State(state.clone()), Ok(Json(req)))
            .await
            .unwrap();

        let response =
            delete_cached_post_handler(State(state.clone()), Path("to_delete".to_string())).await;
        assert!(response.deleted);

        let response =
            delete_cached_post_handler(State(state), Path("to_delete".to_string())).await;
        assert!(!response.deleted);
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = test_state();

        let req = cache_request("post-1", json!({}), None);
        cache_post_handler(State(state.clone()), Ok(Json(req)))
            .await
            .unwrap();

        let response = cache_stats_handler(State(state)).await;
        assert_eq!(response.data.size, 1);
        assert_eq!(response.data.keys, vec!["post-1"]);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "ok");
    }
}
