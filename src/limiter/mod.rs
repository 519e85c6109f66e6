//! Rate Limiter Module
//!
//! Per-client fixed-window request limiting.

mod store;
mod window;


pub use store::RateLimiter;
pub use window::{RateLimitDecision, RateWindow};

/// Bucket shared by every request without a usable client identity
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Maps a possibly missing client identity onto a limiter key.
///
/// Absent, empty and whitespace-only ids all collapse into [`UNKNOWN_CLIENT`].
pub fn normalize_client_id(client_id: Option<&str>) -> &str {
    match client_id.map(str::trim) {
        Some(id) if !id.is_empty() => id,
        _ => UNKNOWN_CLIENT,
    }
}
