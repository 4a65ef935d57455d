//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - Token signing and lifetime configuration
//! - `cache` - Verification cache and blacklist store configuration
//! - `environment` - Environment detection and logging configuration
//! - `rate_limit` - Tiered rate limiting for internal and external callers
//! - `server` - HTTP server configuration
//!
//! Every value is resolved once, when [`AppConfig::from_env`] runs. Components
//! receive their section explicitly and never read the environment themselves.

pub mod auth;
pub mod cache;
pub mod environment;
pub mod rate_limit;
pub mod server;

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export commonly used types
pub use auth::JwtConfig;
pub use cache::CacheConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use rate_limit::RateLimitConfig;
pub use server::ServerConfig;

/// Errors raised while resolving configuration at start-up
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration: {key}")]
    Missing { key: &'static str },

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Token signing configuration
    pub jwt: JwtConfig,

    /// Verification cache configuration
    pub cache: CacheConfig,

    /// Rate limiting configuration
    pub rate_limit: RateLimitConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    ///
    /// `from_env` is this function over `std::env::var`; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("ENVIRONMENT") {
            Some(raw) => raw.parse().map_err(|message| ConfigError::Invalid {
                key: "ENVIRONMENT",
                message,
            })?,
            None => Environment::default(),
        };

        Ok(Self {
            environment,
            server: ServerConfig::from_lookup(&lookup)?,
            jwt: JwtConfig::from_lookup(&lookup, environment)?,
            cache: CacheConfig::from_lookup(&lookup)?,
            rate_limit: RateLimitConfig::from_lookup(&lookup)?,
            logging: LoggingConfig::from_lookup(&lookup, environment)?,
        })
    }
}

/// Parse an optional variable, falling back to `default` when it is unset
///
/// A value that is present but does not parse is an error, never a silent default.
pub(crate) fn parse_or<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                key,
                message: e.to_string(),
            })
        }
        _ => Ok(default),
    }
}

/// Split a comma separated variable into trimmed, non-empty items
pub(crate) fn list<F>(lookup: &F, key: &str) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}
