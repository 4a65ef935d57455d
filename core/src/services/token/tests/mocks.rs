//! Cache doubles for token service tests

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use ca_shared::config::JwtConfig;

use crate::domain::entities::token::VerificationResult;
use crate::errors::CacheError;
use crate::repositories::token_cache::{InMemoryTokenCache, TokenCache};
use crate::services::token::JwtSigner;

pub const SECRET: &str = "0123456789abcdef0123456789abcdef";
pub const ISSUER: &str = "central";

pub fn jwt_config() -> JwtConfig {
    JwtConfig::new(SECRET, ISSUER)
}

pub fn signer() -> JwtSigner {
    JwtSigner::new(&jwt_config()).expect("valid signer config")
}

/// In-memory cache that counts calls and remembers the TTL of every write
#[derive(Default)]
pub struct RecordingCache {
    inner: InMemoryTokenCache,
    pub gets: AtomicUsize,
    pub set_ttls: Mutex<Vec<Duration>>,
    pub blacklist_ttls: Mutex<Vec<Duration>>,
}

impl RecordingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_calls(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn cached_results(&self) -> usize {
        self.inner.cached_results()
    }
}

#[async_trait]
impl TokenCache for RecordingCache {
    async fn get(&self, token_hash: &str) -> Result<Option<VerificationResult>, CacheError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(token_hash).await
    }

    async fn set(
        &self,
        token_hash: &str,
        result: &VerificationResult,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        self.set_ttls.lock().push(ttl);
        self.inner.set(token_hash, result, ttl).await
    }

    async fn delete(&self, token_hash: &str) -> Result<(), CacheError> {
        self.inner.delete(token_hash).await
    }

    async fn is_blacklisted(&self, jti: &str) -> Result<bool, CacheError> {
        self.inner.is_blacklisted(jti).await
    }

    async fn blacklist(&self, jti: &str, ttl: Duration) -> Result<(), CacheError> {
        self.blacklist_ttls.lock().push(ttl);
        self.inner.blacklist(jti, ttl).await
    }
}

/// Cache whose every call fails
pub struct UnavailableCache;

fn unavailable() -> CacheError {
    CacheError::Unavailable {
        message: "connection refused".to_string(),
    }
}

#[async_trait]
impl TokenCache for UnavailableCache {
    async fn get(&self, _token_hash: &str) -> Result<Option<VerificationResult>, CacheError> {
        Err(unavailable())
    }

    async fn set(
        &self,
        _token_hash: &str,
        _result: &VerificationResult,
        _ttl: Duration,
    ) -> Result<(), CacheError> {
        Err(unavailable())
    }

    async fn delete(&self, _token_hash: &str) -> Result<(), CacheError> {
        Err(unavailable())
    }

    async fn is_blacklisted(&self, _jti: &str) -> Result<bool, CacheError> {
        Err(unavailable())
    }

    async fn blacklist(&self, _jti: &str, _ttl: Duration) -> Result<(), CacheError> {
        Err(unavailable())
    }
}

/// Cache that answers every call only after `delay`
pub struct SlowCache {
    pub delay: Duration,
    inner: InMemoryTokenCache,
}

impl SlowCache {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            inner: InMemoryTokenCache::new(),
        }
    }
}

#[async_trait]
impl TokenCache for SlowCache {
    async fn get(&self, token_hash: &str) -> Result<Option<VerificationResult>, CacheError> {
        tokio::time::sleep(self.delay).await;
        self.inner.get(token_hash).await
    }

    async fn set(
        &self,
        token_hash: &str,
        result: &VerificationResult,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        tokio::time::sleep(self.delay).await;
        self.inner.set(token_hash, result, ttl).await
    }

    async fn delete(&self, token_hash: &str) -> Result<(), CacheError> {
        tokio::time::sleep(self.delay).await;
        self.inner.delete(token_hash).await
    }

    async fn is_blacklisted(&self, jti: &str) -> Result<bool, CacheError> {
        tokio::time::sleep(self.delay).await;
        self.inner.is_blacklisted(jti).await
    }

    async fn blacklist(&self, jti: &str, ttl: Duration) -> Result<(), CacheError> {
        tokio::time::sleep(self.delay).await;
        self.inner.blacklist(jti, ttl).await
    }
}

/// In-memory cache that blacklists `jti` just before storing a result,
/// the way a concurrent logout would
pub struct RevokeOnSetCache {
    pub inner: InMemoryTokenCache,
    jti: String,
}

impl RevokeOnSetCache {
    pub fn new(jti: impl Into<String>) -> Self {
        Self {
            inner: InMemoryTokenCache::new(),
            jti: jti.into(),
        }
    }
}

#[async_trait]
impl TokenCache for RevokeOnSetCache {
    async fn get(&self, token_hash: &str) -> Result<Option<VerificationResult>, CacheError> {
        self.inner.get(token_hash).await
    }

    async fn set(
        &self,
        token_hash: &str,
        result: &VerificationResult,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        self.inner.blacklist(&self.jti, Duration::from_secs(60)).await?;
        self.inner.set(token_hash, result, ttl).await
    }

    async fn delete(&self, token_hash: &str) -> Result<(), CacheError> {
        self.inner.delete(token_hash).await
    }

    async fn is_blacklisted(&self, jti: &str) -> Result<bool, CacheError> {
        self.inner.is_blacklisted(jti).await
    }

    async fn blacklist(&self, jti: &str, ttl: Duration) -> Result<(), CacheError> {
        self.inner.blacklist(jti, ttl).await
    }
}
