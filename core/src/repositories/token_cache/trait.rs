use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::time::Duration;

use crate::domain::entities::token::VerificationResult;
use crate::errors::CacheError;

/// Verification cache and revocation blacklist
///
/// Implementations must be safe for concurrent use; the token service holds
/// no lock of its own around these calls. Verification results are keyed by
/// [`hash_token`], never by the raw token.
#[async_trait]
pub trait TokenCache: Send + Sync {
    /// Look up a cached verification result
    async fn get(&self, token_hash: &str) -> Result<Option<VerificationResult>, CacheError>;

    /// Store a verification result for `ttl`
    async fn set(
        &self,
        token_hash: &str,
        result: &VerificationResult,
        ttl: Duration,
    ) -> Result<(), CacheError>;

    /// Remove a cached verification result
    async fn delete(&self, token_hash: &str) -> Result<(), CacheError>;

    /// Check whether a token ID has been revoked
    async fn is_blacklisted(&self, jti: &str) -> Result<bool, CacheError>;

    /// Revoke a token ID for `ttl`
    async fn blacklist(&self, jti: &str, ttl: Duration) -> Result<(), CacheError>;
}

/// One-way cache key for a raw token (lowercase hex SHA-256)
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
