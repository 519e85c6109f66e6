//! Error types for the gateway
//!
//! Provides unified HTTP error handling using thiserror.

use axum::{
    extract::rejection::JsonRejection,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::warn;

use crate::models::{CachePostRequest, ErrorResponse, HealthErrorResponse};

// == API Error Enum ==
/// Unified error type for the HTTP layer.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ApiError {
    /// Resource not found or expired
    #[error("{0}")]
    NotFound(String),

    /// Invalid request data
    #[error("{0}")]
    InvalidRequest(String),

    /// No `x-api-key` header on a protected route
    #[error("API key is required")]
    MissingApiKey,

    /// `x-api-key` header does not match the configured key
    #[error("Invalid API key")]
    InvalidApiKey,

    /// General rate limit exhausted for this client
    #[error("Too many requests, please try again later")]
    RateLimited {
        /// Seconds until the client's window resets
        retry_after_secs: u64,
    },

    /// Health endpoint called more often than its limiter allows
    #[error("Too many health check requests - FORCED FAILURE")]
    HealthCheckThrottled,

    /// Internal server error; the detail is logged, never returned
    #[error("Internal server error")]
    Internal(String),
}

// == Body Rejections ==
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            // No JSON body at all reads as an empty request
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::InvalidRequest(CachePostRequest::MISSING_FIELDS.to_string())
            }
            JsonRejection::JsonDataError(err) => ApiError::InvalidRequest(err.body_text()),
            other => {
                warn!("Unreadable request body: {}", other.body_text());
                ApiError::Internal(other.body_text())
            }
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();

        match self {
            ApiError::RateLimited { retry_after_secs } => (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, retry_after_secs.to_string())],
                Json(ErrorResponse::new(message)),
            )
                .into_response(),
            ApiError::HealthCheckThrottled => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthErrorResponse::new(message)),
            )
                .into_response(),
            other => {
                let status = match other {
                    ApiError::NotFound(_) => StatusCode::NOT_FOUND,
                    ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
                    ApiError::MissingApiKey => StatusCode::UNAUTHORIZED,
                    ApiError::InvalidApiKey => StatusCode::FORBIDDEN,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, Json(ErrorResponse::new(message))).into_response()
            }
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the HTTP layer.
pub type Result<T> = std::result::Result<T, ApiError>;
