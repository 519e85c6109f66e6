//! API Middleware
//!
//! Rate limiting and API key checks that run before any handler.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use super::handlers::AppState;
use crate::error::{ApiError, Result};
use crate::limiter::RateLimitDecision;

/// Header carrying the caller's API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Peer IP of the connection, if the server was started with connect info.
fn client_ip(request: &Request) -> Option<String> {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
}

/// General rate limiter; rejections become `429 Too Many Requests`.
pub async fn rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    let client = client_ip(&request);
    let decision = state.limiter.write().await.check(client.as_deref());

    match decision {
        RateLimitDecision::Allowed { remaining, .. } => {
            debug!(client = ?client, remaining, "Request allowed");
            Ok(next.run(request).await)
        }
        rejected @ RateLimitDecision::Rejected { .. } => {
            let retry_after_secs = rejected.retry_after_secs().unwrap_or_default();
            warn!(client = ?client, retry_after_secs, "Rate limit exceeded");
            Err(ApiError::RateLimited { retry_after_secs })
        }
    }
}

/// Health endpoint limiter; rejections fail the health check with its own message.
pub async fn health_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    let client = client_ip(&request);
    let decision = state.health_limiter.write().await.check(client.as_deref());

    if decision.is_allowed() {
        Ok(next.run(request).await)
    } else {
        warn!(client = ?client, "Health check rate limit exceeded");
        Err(ApiError::HealthCheckThrottled)
    }
}

/// Rejects requests without a matching `x-api-key` header.
///
/// The comparison runs in constant time for keys of equal length.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .map(|value| value.as_bytes())
        .filter(|value| !value.is_empty())
        .ok_or(ApiError::MissingApiKey)?;

    if !bool::from(provided.ct_eq(state.api_key.as_bytes())) {
        warn!(path = %request.uri().path(), "Rejected request with invalid API key");
        return Err(ApiError::InvalidApiKey);
    }

    Ok(next.run(request).await)
}
