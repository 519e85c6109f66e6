//! API Module
//!
//! HTTP handlers, middleware and routing for the gateway REST API.
//!
//! # Endpoints
//! - `GET /api/health` - Health check endpoint
//! - `POST /api/cache/posts` - Cache a post preview
//! - `GET /api/cache/posts/:post_id` - Retrieve a cached preview
//! - `DELETE /api/cache/posts/:post_id` - Delete a cached preview
//! - `GET /api/cache/stats` - Get cache statistics

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
