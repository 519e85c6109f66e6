//! API Routes
//!
//! Configures the Axum router with all gateway endpoints.

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use super::handlers::{
    cache_post_handler, cache_stats_handler, delete_cached_post_handler, get_cached_post_handler,
    health_handler, not_found_handler, AppState,
};
use super::middleware::{health_rate_limit, rate_limit, require_api_key};

/// Largest accepted request body (10 MiB)
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Hardening headers added to every response unless a handler set them.
const SECURITY_HEADERS: [(HeaderName, &str); 5] = [
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::X_FRAME_OPTIONS, "SAMEORIGIN"),
    (header::REFERRER_POLICY, "no-referrer"),
    (header::X_DNS_PREFETCH_CONTROL, "off"),
    (header::STRICT_TRANSPORT_SECURITY, "max-age=15552000; includeSubDomains"),
];

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/health` - Health check, behind its own limiter only
/// - `POST /api/cache/posts` - Cache a post preview
/// - `GET /api/cache/posts/:post_id` - Fetch a cached preview
/// - `DELETE /api/cache/posts/:post_id` - Drop a cached preview
/// - `GET /api/cache/stats` - Raw cache contents for debugging
///
/// # Middleware
/// - Rate limit, then API key check, on everything except health
/// - CORS: Allows any origin
/// - Security headers on every response
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let health = Router::new()
        .route("/api/health", get(health_handler))
        .route_layer(from_fn_with_state(state.clone(), health_rate_limit));

    // Layers run outermost-last: rate limiting happens before authentication
    let protected = Router::new()
        .route("/api/cache/posts", post(cache_post_handler))
        .route(
            "/api/cache/posts/:post_id",
            get(get_cached_post_handler).delete(delete_cached_post_handler),
        )
        .route("/api/cache/stats", get(cache_stats_handler))
        .fallback(not_found_handler)
        .layer(from_fn_with_state(state.clone(), require_api_key))
        .layer(from_fn_with_state(state.clone(), rate_limit));

    let mut router = health
        .merge(protected)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES));

    for (name, value) in SECURITY_HEADERS {
        router = router.layer(SetResponseHeaderLayer::if_not_present(
            name,
            HeaderValue::from_static(value),
        ));
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
