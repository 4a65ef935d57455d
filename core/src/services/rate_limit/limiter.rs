//! Fixed-window request counter with internal and external ceilings

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use tokio::time::Instant;

use ca_shared::config::RateLimitConfig;

use super::caller::{Caller, CallerTier};
use super::sweeper::RateLimitSweeper;
use crate::errors::AuthError;

/// Limiter settings resolved once at construction
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    pub internal_max: u32,
    pub external_max: u32,
    pub window: Duration,
    pub sweep_interval: Duration,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            internal_max: 1000,
            external_max: 100,
            window: Duration::from_secs(60),
            sweep_interval: Duration::from_secs(60),
        }
    }
}

impl From<&RateLimitConfig> for RateLimiterConfig {
    fn from(config: &RateLimitConfig) -> Self {
        Self {
            internal_max: config.internal_max,
            external_max: config.external_max,
            window: Duration::from_secs(config.window_seconds),
            sweep_interval: Duration::from_secs(config.cleanup_interval_seconds),
        }
    }
}

/// Outcome of a single rate limit check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_at: Instant,
    /// Set only on denial, never below one second
    pub retry_after: Option<Duration>,
}

impl RateLimitDecision {
    /// Time left in the current window
    pub fn reset_after(&self) -> Duration {
        self.reset_at.saturating_duration_since(Instant::now())
    }

    /// Window end as unix seconds
    pub fn reset_unix_seconds(&self) -> i64 {
        let remaining = self.reset_after();
        Utc::now().timestamp() + remaining.as_secs() as i64 + i64::from(remaining.subsec_nanos() > 0)
    }

    pub fn to_error(&self) -> Option<AuthError> {
        self.retry_after.map(|retry_after| AuthError::RateLimitExceeded {
            retry_after_seconds: retry_after.as_secs(),
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct RateLimitEntry {
    count: u32,
    reset_at: Instant,
}

/// Per-identifier fixed-window counter
///
/// One lock guards the whole table; every check reads and writes under it,
/// so the critical section is a map lookup plus arithmetic. Up to twice the
/// ceiling can pass across a window boundary.
pub struct RateLimiter {
    config: RateLimiterConfig,
    entries: Mutex<HashMap<String, RateLimitEntry>>,
}

impl RateLimiter {
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            config,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &RateLimiterConfig {
        &self.config
    }

    /// Ceiling for a tier
    pub fn limit_for(&self, tier: CallerTier) -> u32 {
        match tier {
            CallerTier::Internal => self.config.internal_max,
            CallerTier::External => self.config.external_max,
        }
    }

    /// Count a request from a classified caller
    pub fn check(&self, caller: &Caller) -> RateLimitDecision {
        self.check_limit(&caller.identifier, caller.tier)
    }

    /// Count a request against `identifier`'s current window
    ///
    /// A missing or elapsed window starts fresh with a count of one. A full
    /// window denies without touching its reset time.
    pub fn check_limit(&self, identifier: &str, tier: CallerTier) -> RateLimitDecision {
        let limit = self.limit_for(tier);
        let now = Instant::now();
        let mut entries = self.entries.lock();

        let entry = entries
            .entry(identifier.to_string())
            .and_modify(|entry| {
                if now >= entry.reset_at {
                    *entry = RateLimitEntry {
                        count: 0,
                        reset_at: now + self.config.window,
                    };
                }
            })
            .or_insert(RateLimitEntry {
                count: 0,
                reset_at: now + self.config.window,
            });

        if entry.count >= limit {
            let until_reset = entry.reset_at.saturating_duration_since(now);
            return RateLimitDecision {
                allowed: false,
                limit,
                remaining: 0,
                reset_at: entry.reset_at,
                retry_after: Some(round_up_seconds(until_reset)),
            };
        }

        entry.count += 1;
        RateLimitDecision {
            allowed: true,
            limit,
            remaining: limit - entry.count,
            reset_at: entry.reset_at,
            retry_after: None,
        }
    }

    /// Drop every entry whose window has elapsed; returns how many went
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.reset_at > now);
        before - entries.len()
    }

    /// Number of identifiers currently tracked
    pub fn tracked_identifiers(&self) -> usize {
        self.entries.lock().len()
    }

    /// Start the background sweep at the configured interval
    pub fn start_sweeper(self: &Arc<Self>) -> RateLimitSweeper {
        RateLimitSweeper::spawn(Arc::clone(self), self.config.sweep_interval)
    }
}

fn round_up_seconds(duration: Duration) -> Duration {
    let seconds = duration.as_secs() + u64::from(duration.subsec_nanos() > 0);
    Duration::from_secs(seconds.max(1))
}
