//! Verification cache configuration module

use serde::{Deserialize, Serialize};

use super::{parse_or, ConfigError};

/// Token verification cache and blacklist store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Redis connection URL; `None` selects the in-process cache
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Upper bound for how long a positive verification result is cached, in seconds
    #[serde(default = "default_verification_ttl")]
    pub verification_ttl: u64,

    /// Deadline for a single cache or blacklist round trip, in milliseconds
    #[serde(default = "default_operation_timeout_ms")]
    pub operation_timeout_ms: u64,

    /// Prefix for every key written to the shared store
    #[serde(default)]
    pub key_prefix: Option<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            verification_ttl: default_verification_ttl(),
            operation_timeout_ms: default_operation_timeout_ms(),
            key_prefix: None,
        }
    }
}

impl CacheConfig {
    /// Create a Redis-backed cache configuration
    pub fn redis(url: impl Into<String>) -> Self {
        Self {
            redis_url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Set the key prefix for all cache keys
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    /// Generate a cache key with prefix
    pub fn make_key(&self, key: &str) -> String {
        match &self.key_prefix {
            Some(prefix) => format!("{}:{}", prefix, key),
            None => key.to_string(),
        }
    }

    pub(crate) fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            redis_url: lookup("REDIS_URL").filter(|url| !url.is_empty()),
            verification_ttl: parse_or(lookup, "TOKEN_CACHE_TTL", default_verification_ttl())?,
            operation_timeout_ms: parse_or(
                lookup,
                "TOKEN_CACHE_TIMEOUT_MS",
                default_operation_timeout_ms(),
            )?,
            key_prefix: lookup("CACHE_KEY_PREFIX").filter(|prefix| !prefix.is_empty()),
        })
    }
}

fn default_verification_ttl() -> u64 {
    300 // 5 minutes
}

fn default_operation_timeout_ms() -> u64 {
    50
}
