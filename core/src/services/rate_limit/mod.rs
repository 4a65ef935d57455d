//! Tiered fixed-window rate limiting
//!
//! - `caller` - identifies a request and picks its tier
//! - `limiter` - the per-identifier window table
//! - `sweeper` - background removal of elapsed windows

mod caller;
mod limiter;
mod sweeper;

#[cfg(test)]
mod tests;

pub use caller::{Caller, CallerClassifier, CallerTier};
pub use limiter::{RateLimitDecision, RateLimiter, RateLimiterConfig};
pub use sweeper::RateLimitSweeper;
