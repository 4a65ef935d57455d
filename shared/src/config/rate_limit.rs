//! Rate limiting configuration module

use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};

use super::{list, parse_or, ConfigError};

/// Tiered rate limiting configuration
///
/// Internal callers (known service API key or allow-listed source network)
/// get `internal_max` requests per window, everyone else `external_max`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Max requests per window for internal callers
    pub internal_max: u32,

    /// Max requests per window for external callers
    pub external_max: u32,

    /// Window length in seconds
    pub window_seconds: u64,

    /// How often stale windows are swept, in seconds
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_seconds: u64,

    /// Source networks treated as internal
    #[serde(default)]
    pub internal_networks: Vec<IpNetwork>,

    /// Service API keys treated as internal
    #[serde(default, skip_serializing)]
    pub internal_api_keys: Vec<String>,

    /// Honour `X-Forwarded-For` / `X-Real-IP` when resolving the source IP
    #[serde(default)]
    pub trust_forwarded_headers: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            internal_max: 1000,
            external_max: 100,
            window_seconds: 60,
            cleanup_interval_seconds: default_cleanup_interval(),
            internal_networks: Vec::new(),
            internal_api_keys: Vec::new(),
            trust_forwarded_headers: false,
        }
    }
}

impl RateLimitConfig {
    /// Add an internal network range
    pub fn with_internal_network(mut self, network: IpNetwork) -> Self {
        self.internal_networks.push(network);
        self
    }

    /// Add an internal service API key
    pub fn with_internal_api_key(mut self, key: impl Into<String>) -> Self {
        self.internal_api_keys.push(key.into());
        self
    }

    pub(crate) fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let internal_networks = list(lookup, "INTERNAL_CIDRS")
            .iter()
            .map(|cidr| {
                cidr.parse::<IpNetwork>().map_err(|e| ConfigError::Invalid {
                    key: "INTERNAL_CIDRS",
                    message: format!("{}: {}", cidr, e),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let config = Self {
            internal_max: parse_or(lookup, "RATE_LIMIT_INTERNAL_MAX", defaults.internal_max)?,
            external_max: parse_or(lookup, "RATE_LIMIT_EXTERNAL_MAX", defaults.external_max)?,
            window_seconds: parse_or(lookup, "RATE_LIMIT_WINDOW_SECONDS", defaults.window_seconds)?,
            cleanup_interval_seconds: parse_or(
                lookup,
                "RATE_LIMIT_CLEANUP_INTERVAL_SECONDS",
                defaults.cleanup_interval_seconds,
            )?,
            internal_networks,
            internal_api_keys: list(lookup, "INTERNAL_API_KEYS"),
            trust_forwarded_headers: parse_or(lookup, "TRUST_FORWARDED_HEADERS", false)?,
        };

        if config.window_seconds == 0 {
            return Err(ConfigError::Invalid {
                key: "RATE_LIMIT_WINDOW_SECONDS",
                message: "window must be at least one second".to_string(),
            });
        }
        if config.cleanup_interval_seconds == 0 {
            return Err(ConfigError::Invalid {
                key: "RATE_LIMIT_CLEANUP_INTERVAL_SECONDS",
                message: "interval must be at least one second".to_string(),
            });
        }

        Ok(config)
    }
}

fn default_cleanup_interval() -> u64 {
    60 // 1 minute
}
