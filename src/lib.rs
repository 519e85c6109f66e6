//! Preview Gateway - blog publishing front door
//!
//! Provides a TTL preview cache for post drafts behind API key authentication
//! and per-client rate limiting.

pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod limiter;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::BackgroundTasks;
