//! Redis cache client implementation
//!
//! A multiplexed connection shared by all callers, with connect-time and
//! per-operation retry. Keys are namespaced by the configured prefix.

use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisError, RedisResult};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use ca_shared::config::CacheConfig;

use crate::InfrastructureError;

type RedisFuture<T> = Pin<Box<dyn Future<Output = RedisResult<T>> + Send>>;

/// Redis cache client with connection reuse and retry logic
#[derive(Clone)]
pub struct RedisClient {
    /// Redis multiplexed connection for async operations
    connection: MultiplexedConnection,
    /// Namespace prepended to every key
    key_prefix: Option<String>,
    /// Maximum number of attempts per operation
    max_retries: u32,
    /// Base delay between retries (exponential backoff)
    retry_delay_ms: u64,
}

impl RedisClient {
    /// Connect using the cache configuration
    ///
    /// Operations are attempted at most twice with a short backoff; callers on
    /// the request path put their own deadline around every call.
    pub async fn connect(config: &CacheConfig) -> Result<Self, InfrastructureError> {
        Self::connect_with_retry_config(config, 2, 10).await
    }

    /// Connect with custom retry configuration
    pub async fn connect_with_retry_config(
        config: &CacheConfig,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<Self, InfrastructureError> {
        let url = config
            .redis_url
            .as_deref()
            .ok_or_else(|| InfrastructureError::Config("REDIS_URL is not set".to_string()))?;

        info!(url = %mask_url(url), "Creating Redis client");

        let client = Client::open(url).map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection = Self::create_connection_with_retry(client, max_retries.max(1), retry_delay_ms).await?;

        info!("Redis client created successfully");

        Ok(Self {
            connection,
            key_prefix: config.key_prefix.clone(),
            max_retries: max_retries.max(1),
            retry_delay_ms,
        })
    }

    async fn create_connection_with_retry(
        client: Client,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = retry_delay_ms.max(100);

        loop {
            attempts += 1;
            debug!(attempt = attempts, "Connecting to Redis");

            match client.get_multiplexed_async_connection().await {
                Ok(connection) => return Ok(connection),
                Err(e) if attempts < max_retries => {
                    warn!(
                        "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(5000);
                }
                Err(e) => {
                    error!("Failed to connect to Redis after {} attempts: {}", attempts, e);
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }

    /// Apply the configured namespace to a key
    pub fn make_key(&self, key: &str) -> String {
        prefixed_key(self.key_prefix.as_deref(), key)
    }

    /// Set a value that expires after `ttl` (millisecond precision)
    pub async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), InfrastructureError> {
        let millis = (ttl.as_millis() as u64).max(1);
        let key = self.make_key(key);
        let value = value.to_string();

        self.execute_with_retry(|mut conn| {
            let key = key.clone();
            let value = value.clone();
            Box::pin(async move { conn.pset_ex::<_, _, ()>(key, value, millis).await })
        })
        .await
        .map_err(InfrastructureError::Cache)
    }

    /// Get a value, `None` when absent or expired
    pub async fn get(&self, key: &str) -> Result<Option<String>, InfrastructureError> {
        let key = self.make_key(key);

        self.execute_with_retry(|mut conn| {
            let key = key.clone();
            Box::pin(async move { conn.get::<_, Option<String>>(key).await })
        })
        .await
        .map_err(InfrastructureError::Cache)
    }

    /// Delete a key; returns whether it existed
    pub async fn delete(&self, key: &str) -> Result<bool, InfrastructureError> {
        let key = self.make_key(key);

        let deleted = self
            .execute_with_retry(|mut conn| {
                let key = key.clone();
                Box::pin(async move { conn.del::<_, u32>(key).await })
            })
            .await
            .map_err(InfrastructureError::Cache)?;

        Ok(deleted > 0)
    }

    /// Check if a key exists
    pub async fn exists(&self, key: &str) -> Result<bool, InfrastructureError> {
        let key = self.make_key(key);

        self.execute_with_retry(|mut conn| {
            let key = key.clone();
            Box::pin(async move { conn.exists::<_, bool>(key).await })
        })
        .await
        .map_err(InfrastructureError::Cache)
    }

    /// PING the server
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let response = self
            .execute_with_retry(|mut conn| {
                Box::pin(async move { redis::cmd("PING").query_async::<_, String>(&mut conn).await })
            })
            .await
            .map_err(InfrastructureError::Cache)?;

        Ok(response == "PONG")
    }

    async fn execute_with_retry<F, T>(&self, operation: F) -> RedisResult<T>
    where
        F: Fn(MultiplexedConnection) -> RedisFuture<T>,
    {
        let mut attempts = 0;
        let mut delay = self.retry_delay_ms;

        loop {
            attempts += 1;

            match operation(self.connection.clone()).await {
                Ok(result) => return Ok(result),
                Err(e) if attempts < self.max_retries && is_retriable_error(&e) => {
                    debug!(
                        "Redis operation failed (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, self.max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(5000);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

pub(crate) fn prefixed_key(prefix: Option<&str>, key: &str) -> String {
    match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{}:{}", prefix, key),
        _ => key.to_string(),
    }
}

/// Transient errors worth another attempt
pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError | redis::ErrorKind::BusyLoadingError | redis::ErrorKind::TryAgain
    )
}

/// Hide credentials in a Redis URL for logging
pub(crate) fn mask_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}****{}", &url[..scheme_end + 3], &url[at..])
        }
        _ => url.to_string(),
    }
}
