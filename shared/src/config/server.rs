//! Server configuration module

use serde::{Deserialize, Serialize};

use super::{parse_or, ConfigError};

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Worker threads (0 = number of CPU cores)
    #[serde(default)]
    pub workers: usize,

    /// Maximum JSON payload size in bytes
    #[serde(default = "default_max_payload_size")]
    pub max_payload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 8080,
            workers: 0, // Use all CPU cores
            max_payload_size: default_max_payload_size(),
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub(crate) fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            host: lookup("SERVER_HOST").unwrap_or(defaults.host),
            port: parse_or(lookup, "SERVER_PORT", defaults.port)?,
            workers: parse_or(lookup, "SERVER_WORKERS", defaults.workers)?,
            max_payload_size: parse_or(lookup, "SERVER_MAX_PAYLOAD_SIZE", defaults.max_payload_size)?,
        })
    }
}

fn default_max_payload_size() -> usize {
    // 100 tokens of a few KB each fit comfortably
    1024 * 1024
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address() {
        let config = ServerConfig::new("127.0.0.1", 9000);
        assert_eq!(config.bind_address(), "127.0.0.1:9000");
    }

    #[test]
    fn test_invalid_port() {
        let lookup = |key: &str| (key == "SERVER_PORT").then(|| "99999".to_string());
        assert!(ServerConfig::from_lookup(&lookup).is_err());
    }
}
