//! Shared configuration and error types for the Central Auth server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types resolved once from the environment
//! - The error response body and error codes

pub mod config;
pub mod errors;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, ConfigError, Environment, JwtConfig, LogFormat, LoggingConfig,
    RateLimitConfig, ServerConfig,
};
pub use errors::{error_codes, ErrorResponse};
