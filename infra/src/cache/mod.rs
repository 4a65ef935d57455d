//! Cache module for Redis-based caching
//!
//! Provides the Redis client wrapper with retry logic and the networked
//! implementation of the token verification cache and blacklist.

pub mod redis_client;
pub mod token_cache;

#[cfg(test)]
mod tests;

pub use redis_client::RedisClient;
pub use token_cache::RedisTokenCache;
