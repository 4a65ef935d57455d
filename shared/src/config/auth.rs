//! Token signing configuration

use serde::{Deserialize, Serialize};

use super::{parse_or, ConfigError, Environment};

/// Secret used when none is configured in development
const DEVELOPMENT_SECRET: &str = "development-secret-please-change-in-production";

/// JWT signing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Shared HMAC signing secret (at least 32 bytes)
    #[serde(skip_serializing)]
    pub secret: String,

    /// Issuer written into and required from every token
    pub issuer: String,

    /// Access token expiry time in seconds
    pub access_token_expiry: i64,

    /// Refresh token expiry time in seconds
    pub refresh_token_expiry: i64,

    /// Algorithm for JWT signing (default: HS256)
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEVELOPMENT_SECRET),
            issuer: String::from("central"),
            access_token_expiry: 900,     // 15 minutes
            refresh_token_expiry: 604800, // 7 days
            algorithm: default_algorithm(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret and issuer
    pub fn new(secret: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: issuer.into(),
            ..Default::default()
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry = days * 86400;
        self
    }

    /// Check if using the development secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEVELOPMENT_SECRET
    }

    pub(crate) fn from_lookup<F>(lookup: &F, environment: Environment) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let secret = match lookup("JWT_SECRET") {
            Some(secret) if !secret.is_empty() => secret,
            _ if environment.is_development() => defaults.secret,
            _ => return Err(ConfigError::Missing { key: "JWT_SECRET" }),
        };

        Ok(Self {
            secret,
            issuer: lookup("JWT_ISSUER").unwrap_or(defaults.issuer),
            access_token_expiry: parse_or(lookup, "JWT_ACCESS_TOKEN_EXPIRY", defaults.access_token_expiry)?,
            refresh_token_expiry: parse_or(
                lookup,
                "JWT_REFRESH_TOKEN_EXPIRY",
                defaults.refresh_token_expiry,
            )?,
            algorithm: lookup("JWT_ALGORITHM").unwrap_or(defaults.algorithm),
        })
    }
}

fn default_algorithm() -> String {
    String::from("HS256")
}
