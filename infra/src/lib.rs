//! # Infrastructure Layer
//!
//! Concrete implementations of the capability traits defined in `ca_core`.
//!
//! - **Cache**: Redis client and the Redis-backed token cache/blacklist

/// Cache module - Redis client and token cache
pub mod cache;

pub use cache::{RedisClient, RedisTokenCache};

use ca_core::errors::CacheError;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Stored value could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<InfrastructureError> for CacheError {
    fn from(error: InfrastructureError) -> Self {
        match error {
            InfrastructureError::Serialization(e) => CacheError::Serialization {
                message: e.to_string(),
            },
            InfrastructureError::Cache(e) if e.is_timeout() => CacheError::Timeout,
            other => CacheError::Unavailable {
                message: other.to_string(),
            },
        }
    }
}
