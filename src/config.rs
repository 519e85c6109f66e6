//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;

use thiserror::Error;

use crate::cache::DEFAULT_TTL_MS;

/// Errors raised while loading configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or empty
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),
}

/// Server configuration parameters.
///
/// Everything except the API key has a default.
#[derive(Debug, Clone)]
pub struct Config {
    /// Key expected in the `x-api-key` header on protected routes
    pub api_secret_key: String,
    /// HTTP server port
    pub server_port: u16,
    /// Default TTL in milliseconds for previews cached without one
    pub default_ttl_ms: u64,
    /// Cache sweep interval in seconds
    pub cleanup_interval: u64,
    /// Requests per window allowed by the general limiter
    pub rate_limit_max: u32,
    /// General limiter window in milliseconds
    pub rate_limit_window_ms: u64,
    /// Requests per window allowed on the health endpoint
    pub health_rate_limit_max: u32,
    /// Health limiter window in milliseconds
    pub health_rate_limit_window_ms: u64,
    /// Limiter sweep interval in seconds, 0 disables the sweep
    pub rate_limit_sweep_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `API_SECRET_KEY` - API key for protected routes (required)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `DEFAULT_TTL_MS` - Default preview TTL in ms (default: 1800000)
    /// - `CLEANUP_INTERVAL` - Cache sweep frequency in seconds (default: 300)
    /// - `RATE_LIMIT_MAX` - Requests per window (default: 20)
    /// - `RATE_LIMIT_WINDOW_MS` - Limiter window in ms (default: 60000)
    /// - `HEALTH_RATE_LIMIT_MAX` - Health checks per window (default: 1)
    /// - `HEALTH_RATE_LIMIT_WINDOW_MS` - Health limiter window in ms (default: 60000)
    /// - `RATE_LIMIT_SWEEP_INTERVAL` - Limiter sweep frequency in seconds, 0 = off (default: 300)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable source.
    ///
    /// Unset or unparsable optional values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_secret_key = lookup("API_SECRET_KEY")
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingVar("API_SECRET_KEY"))?;

        let defaults = Self::for_api_key(api_secret_key);

        Ok(Self {
            server_port: parse_var(&lookup, "SERVER_PORT").unwrap_or(defaults.server_port),
            default_ttl_ms: parse_var(&lookup, "DEFAULT_TTL_MS").unwrap_or(defaults.default_ttl_ms),
            cleanup_interval: parse_var(&lookup, "CLEANUP_INTERVAL")
                .unwrap_or(defaults.cleanup_interval),
            rate_limit_max: parse_var(&lookup, "RATE_LIMIT_MAX").unwrap_or(defaults.rate_limit_max),
            rate_limit_window_ms: parse_var(&lookup, "RATE_LIMIT_WINDOW_MS")
                .unwrap_or(defaults.rate_limit_window_ms),
            health_rate_limit_max: parse_var(&lookup, "HEALTH_RATE_LIMIT_MAX")
                .unwrap_or(defaults.health_rate_limit_max),
            health_rate_limit_window_ms: parse_var(&lookup, "HEALTH_RATE_LIMIT_WINDOW_MS")
                .unwrap_or(defaults.health_rate_limit_window_ms),
            rate_limit_sweep_interval: parse_var(&lookup, "RATE_LIMIT_SWEEP_INTERVAL")
                .unwrap_or(defaults.rate_limit_sweep_interval),
            ..defaults
        })
    }

    /// Default configuration around the given API key.
    pub fn for_api_key(api_secret_key: impl Into<String>) -> Self {
        Self {
            api_secret_key: api_secret_key.into(),
            server_port: 3000,
            default_ttl_ms: DEFAULT_TTL_MS,
            cleanup_interval: 300,
            rate_limit_max: 20,
            rate_limit_window_ms: 60_000,
            health_rate_limit_max: 1,
            health_rate_limit_window_ms: 60_000,
            rate_limit_sweep_interval: 300,
        }
    }
}

fn parse_var<F, T>(lookup: &F, name: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(name).and_then(|v| v.trim().parse().ok())
}
