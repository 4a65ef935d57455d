//! Redis-backed token verification cache and revocation blacklist
//!
//! Key patterns (before the configured prefix):
//! - `token_verify:{sha256}` - serialized verification result
//! - `token_blacklist:{jti}` - revocation marker

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use ca_core::domain::entities::token::VerificationResult;
use ca_core::errors::CacheError;
use ca_core::repositories::TokenCache;

use super::RedisClient;

const VERIFY_KEY_PREFIX: &str = "token_verify";
const BLACKLIST_KEY_PREFIX: &str = "token_blacklist";

/// Token cache shared by every server instance through Redis
#[derive(Clone)]
pub struct RedisTokenCache {
    client: RedisClient,
}

impl RedisTokenCache {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &RedisClient {
        &self.client
    }

    pub(crate) fn verify_key(token_hash: &str) -> String {
        format!("{}:{}", VERIFY_KEY_PREFIX, token_hash)
    }

    pub(crate) fn blacklist_key(jti: &str) -> String {
        format!("{}:{}", BLACKLIST_KEY_PREFIX, jti)
    }

    pub(crate) fn encode(result: &VerificationResult) -> Result<String, CacheError> {
        serde_json::to_string(result).map_err(|e| CacheError::Serialization {
            message: e.to_string(),
        })
    }

    pub(crate) fn decode(raw: &str) -> Result<VerificationResult, CacheError> {
        serde_json::from_str(raw).map_err(|e| CacheError::Serialization {
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl TokenCache for RedisTokenCache {
    async fn get(&self, token_hash: &str) -> Result<Option<VerificationResult>, CacheError> {
        let raw = self.client.get(&Self::verify_key(token_hash)).await?;
        match raw {
            Some(raw) => match Self::decode(&raw) {
                Ok(result) => Ok(Some(result)),
                Err(e) => {
                    // Unreadable entries are dropped and treated as a miss
                    debug!(error = %e, "Discarding undecodable cached verification");
                    let _ = self.client.delete(&Self::verify_key(token_hash)).await;
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    async fn set(
        &self,
        token_hash: &str,
        result: &VerificationResult,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        if ttl.is_zero() {
            return Ok(());
        }
        let encoded = Self::encode(result)?;
        self.client
            .set_with_expiry(&Self::verify_key(token_hash), &encoded, ttl)
            .await?;
        Ok(())
    }

    async fn delete(&self, token_hash: &str) -> Result<(), CacheError> {
        self.client.delete(&Self::verify_key(token_hash)).await?;
        Ok(())
    }

    async fn is_blacklisted(&self, jti: &str) -> Result<bool, CacheError> {
        Ok(self.client.exists(&Self::blacklist_key(jti)).await?)
    }

    async fn blacklist(&self, jti: &str, ttl: Duration) -> Result<(), CacheError> {
        if ttl.is_zero() {
            return Ok(());
        }
        self.client
            .set_with_expiry(&Self::blacklist_key(jti), "1", ttl)
            .await?;
        Ok(())
    }
}
