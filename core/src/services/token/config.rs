//! Configuration for the token service

use std::time::Duration;

use ca_shared::config::CacheConfig;

/// Largest batch accepted by bulk verification
pub const MAX_BULK_TOKENS: usize = 100;

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// Upper bound on how long a positive verification result is cached
    pub cache_ttl: Duration,
    /// Deadline for each cache or blacklist call
    pub cache_timeout: Duration,
    /// Largest batch accepted by bulk verification
    pub max_bulk_tokens: usize,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(300),
            cache_timeout: Duration::from_millis(50),
            max_bulk_tokens: MAX_BULK_TOKENS,
        }
    }
}

impl From<&CacheConfig> for TokenServiceConfig {
    fn from(config: &CacheConfig) -> Self {
        Self {
            cache_ttl: Duration::from_secs(config.verification_ttl),
            cache_timeout: Duration::from_millis(config.operation_timeout_ms),
            ..Default::default()
        }
    }
}
