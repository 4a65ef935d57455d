//! Main token service implementation

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures_util::future::join_all;
use tracing::{debug, info, warn};

use crate::domain::entities::token::{Claims, IssuedToken, TokenPair, VerificationResult};
use crate::domain::entities::user::UserIdentity;
use crate::errors::{AuthError, CacheError, TokenError};
use crate::repositories::token_cache::{hash_token, TokenCache};

use super::config::TokenServiceConfig;
use super::signer::{JwtSigner, TokenMetadata};

/// Characters kept from each end of a token in bulk result keys
const FRAGMENT_LENGTH: usize = 10;

/// Orchestrates signing, verification, caching and revocation of tokens
///
/// Holds no lock of its own. All shared state lives in the injected
/// [`TokenCache`]; without one, every verification is a direct validation
/// and revocation is a no-op.
pub struct TokenService {
    signer: JwtSigner,
    cache: Option<Arc<dyn TokenCache>>,
    config: TokenServiceConfig,
}

impl TokenService {
    /// Creates a new token service instance
    pub fn new(
        signer: JwtSigner,
        cache: Option<Arc<dyn TokenCache>>,
        config: TokenServiceConfig,
    ) -> Self {
        Self {
            signer,
            cache,
            config,
        }
    }

    pub fn signer(&self) -> &JwtSigner {
        &self.signer
    }

    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    /// Verifies a bearer token
    ///
    /// Never fails: a bad token produces `valid == false` and a reason.
    /// Only positive results are cached, for at most the configured TTL and
    /// never past the token's own expiry.
    pub async fn verify_token(&self, token: &str) -> VerificationResult {
        let token_hash = hash_token(token);

        if let Some(cached) = self.cached_result(&token_hash).await {
            debug!(token_hash = %short_hash(&token_hash), "Verification cache hit");
            return cached;
        }

        let claims = match self.signer.validate_token(token) {
            Ok(claims) => claims,
            Err(e) => {
                debug!(token_hash = %short_hash(&token_hash), reason = %e, "Token rejected");
                return VerificationResult::invalid(e.to_string());
            }
        };

        if !claims.is_access() {
            return VerificationResult::invalid(TokenError::WrongTokenType.to_string());
        }

        if self.is_revoked(&claims.jti).await {
            debug!(jti = %claims.jti, "Revoked token presented");
            return VerificationResult::invalid(TokenError::Revoked.to_string());
        }

        let result = VerificationResult::from_claims(&claims);
        if self.store_result(&token_hash, &claims, &result).await
            && self.is_revoked(&claims.jti).await
        {
            // Revoked while this verification was in flight
            self.purge_result(&token_hash).await;
            return VerificationResult::invalid(TokenError::Revoked.to_string());
        }
        result
    }

    /// Verifies up to `max_bulk_tokens` tokens concurrently
    ///
    /// The batch size is checked before any verification runs. Results are
    /// keyed by [`token_fragment`] so the response never echoes whole tokens.
    pub async fn verify_tokens_bulk(
        &self,
        tokens: &[String],
    ) -> Result<HashMap<String, VerificationResult>, AuthError> {
        if tokens.is_empty() || tokens.len() > self.config.max_bulk_tokens {
            return Err(AuthError::BatchSizeInvalid {
                size: tokens.len(),
                max: self.config.max_bulk_tokens,
            });
        }

        let results = join_all(tokens.iter().map(|token| self.verify_token(token))).await;

        Ok(tokens
            .iter()
            .map(|token| token_fragment(token))
            .zip(results)
            .collect())
    }

    /// Revokes a token until its natural expiry
    ///
    /// Reads the token ID and expiry without validating the token, so expired
    /// or already revoked tokens are accepted. A token that has already
    /// expired, a malformed token, or an unreachable store all make this a
    /// silent no-op.
    pub async fn revoke_token(&self, token: &str) {
        let metadata = match self.signer.metadata(token) {
            Ok(metadata) => metadata,
            Err(e) => {
                debug!(reason = %e, "Ignoring revocation of unreadable token");
                return;
            }
        };

        let Some(ttl) = self.blacklist_ttl(&metadata) else {
            debug!(jti = %metadata.jti, exp = metadata.exp, "Token expired or expiry out of range, nothing to revoke");
            return;
        };

        let Some(cache) = &self.cache else {
            warn!(jti = %metadata.jti, "No blacklist store configured, revocation skipped");
            return;
        };

        if let Err(e) = self.with_deadline(cache.blacklist(&metadata.jti, ttl)).await {
            warn!(jti = %metadata.jti, error = %e, "Failed to blacklist token");
            return;
        }

        self.purge_result(&hash_token(token)).await;

        info!(jti = %metadata.jti, ttl_seconds = ttl.as_secs(), "Token revoked");
    }

    /// Issues an access and refresh token for an authenticated user
    pub fn generate_token_pair(&self, identity: &UserIdentity) -> Result<TokenPair, TokenError> {
        let access = self.generate_access_token(identity)?;
        let refresh = self.signer.generate_refresh_token(&identity.user_id)?;
        Ok(TokenPair::new(access, refresh))
    }

    /// Issues an access token for an authenticated user
    pub fn generate_access_token(&self, identity: &UserIdentity) -> Result<IssuedToken, TokenError> {
        self.signer.generate_access_token(
            &identity.user_id,
            &identity.email,
            &identity.role,
            identity.school_id.as_deref(),
        )
    }

    async fn cached_result(&self, token_hash: &str) -> Option<VerificationResult> {
        let cache = self.cache.as_ref()?;
        match self.with_deadline(cache.get(token_hash)).await {
            Ok(result) => result.filter(|result| result.valid),
            Err(e) => {
                warn!(error = %e, "Verification cache lookup failed, validating directly");
                None
            }
        }
    }

    async fn is_revoked(&self, jti: &str) -> bool {
        let Some(cache) = &self.cache else {
            return false;
        };
        match self.with_deadline(cache.is_blacklisted(jti)).await {
            Ok(revoked) => revoked,
            Err(e) => {
                warn!(jti = %jti, error = %e, "Blacklist lookup failed, treating token as not revoked");
                false
            }
        }
    }

    /// Returns whether the result was written to the cache
    async fn store_result(
        &self,
        token_hash: &str,
        claims: &Claims,
        result: &VerificationResult,
    ) -> bool {
        let Some(cache) = &self.cache else {
            return false;
        };
        let Ok(remaining) = claims.remaining_lifetime(Utc::now()).to_std() else {
            return false;
        };
        let ttl = remaining.min(self.config.cache_ttl);
        if ttl.is_zero() {
            return false;
        }
        match self.with_deadline(cache.set(token_hash, result, ttl)).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Failed to cache verification result");
                false
            }
        }
    }

    async fn purge_result(&self, token_hash: &str) {
        let Some(cache) = &self.cache else {
            return;
        };
        if let Err(e) = self.with_deadline(cache.delete(token_hash)).await {
            warn!(token_hash = %short_hash(token_hash), error = %e, "Failed to purge cached verification");
        }
    }

    /// Time left until `exp`, rounded up to whole seconds
    ///
    /// `exp` is unverified input here. Expired or unrepresentable values give
    /// `None`, and no entry outlives the longest lifetime the signer issues.
    fn blacklist_ttl(&self, metadata: &TokenMetadata) -> Option<Duration> {
        let remaining = (metadata.expires_at()? - Utc::now()).to_std().ok()?;
        if remaining.is_zero() {
            return None;
        }
        let seconds = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
        let ceiling = self.signer.max_token_lifetime().to_std().ok()?;
        Some(Duration::from_secs(seconds).min(ceiling))
    }

    async fn with_deadline<T, F>(&self, operation: F) -> Result<T, CacheError>
    where
        F: Future<Output = Result<T, CacheError>>,
    {
        tokio::time::timeout(self.config.cache_timeout, operation)
            .await
            .unwrap_or(Err(CacheError::Timeout))
    }
}

/// Bulk result key: first and last ten characters joined by `...`
///
/// Tokens of twenty characters or fewer are used as they are.
pub fn token_fragment(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= FRAGMENT_LENGTH * 2 {
        return token.to_string();
    }
    let head: String = chars[..FRAGMENT_LENGTH].iter().collect();
    let tail: String = chars[chars.len() - FRAGMENT_LENGTH..].iter().collect();
    format!("{}...{}", head, tail)
}

fn short_hash(token_hash: &str) -> &str {
    token_hash.get(..12).unwrap_or(token_hash)
}
