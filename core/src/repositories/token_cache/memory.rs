//! In-process token cache used when no shared store is configured

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;

use super::TokenCache;
use crate::domain::entities::token::VerificationResult;
use crate::errors::CacheError;

/// Writes between two sweeps of expired entries
pub const PURGE_EVERY_WRITES: u64 = 1024;

/// In-memory [`TokenCache`]
///
/// Entries expire lazily: an expired entry reads as absent and is dropped by
/// the sweep that runs once every [`PURGE_EVERY_WRITES`] writes, or by
/// [`InMemoryTokenCache::purge_expired`].
#[derive(Default)]
pub struct InMemoryTokenCache {
    results: RwLock<HashMap<String, (VerificationResult, Instant)>>,
    revoked: RwLock<HashMap<String, Instant>>,
    writes: AtomicU64,
}

impl InMemoryTokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every expired result and blacklist entry
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.results.write().retain(|_, (_, expires_at)| *expires_at > now);
        self.revoked.write().retain(|_, expires_at| *expires_at > now);
    }

    /// Number of stored entries, expired ones included
    pub fn stored_entries(&self) -> usize {
        self.results.read().len() + self.revoked.read().len()
    }

    fn record_write(&self) {
        let writes = self.writes.fetch_add(1, Ordering::Relaxed) + 1;
        if writes % PURGE_EVERY_WRITES == 0 {
            self.purge_expired();
        }
    }

    /// Number of live cached results
    pub fn cached_results(&self) -> usize {
        let now = Instant::now();
        self.results
            .read()
            .values()
            .filter(|(_, expires_at)| *expires_at > now)
            .count()
    }
}

#[async_trait]
impl TokenCache for InMemoryTokenCache {
    async fn get(&self, token_hash: &str) -> Result<Option<VerificationResult>, CacheError> {
        let results = self.results.read();
        Ok(results
            .get(token_hash)
            .filter(|(_, expires_at)| *expires_at > Instant::now())
            .map(|(result, _)| result.clone()))
    }

    async fn set(
        &self,
        token_hash: &str,
        result: &VerificationResult,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        self.results
            .write()
            .insert(token_hash.to_string(), (result.clone(), Instant::now() + ttl));
        self.record_write();
        Ok(())
    }

    async fn delete(&self, token_hash: &str) -> Result<(), CacheError> {
        self.results.write().remove(token_hash);
        Ok(())
    }

    async fn is_blacklisted(&self, jti: &str) -> Result<bool, CacheError> {
        Ok(self
            .revoked
            .read()
            .get(jti)
            .is_some_and(|expires_at| *expires_at > Instant::now()))
    }

    async fn blacklist(&self, jti: &str, ttl: Duration) -> Result<(), CacheError> {
        self.revoked
            .write()
            .insert(jti.to_string(), Instant::now() + ttl);
        self.record_write();
        Ok(())
    }
}
