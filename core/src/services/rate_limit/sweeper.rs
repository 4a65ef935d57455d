//! Background removal of elapsed rate limit windows

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::limiter::RateLimiter;

/// Handle to the periodic sweep task
///
/// The task runs until [`RateLimitSweeper::shutdown`] (or the stop token)
/// is triggered; dropping the handle without shutting down leaves it running.
pub struct RateLimitSweeper {
    stop: CancellationToken,
    handle: JoinHandle<()>,
}

impl RateLimitSweeper {
    /// Spawn the sweep loop on the current runtime
    pub fn spawn(limiter: Arc<RateLimiter>, interval: Duration) -> Self {
        let stop = CancellationToken::new();
        let task_stop = stop.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = task_stop.cancelled() => break,
                    _ = ticker.tick() => {
                        let removed = limiter.sweep();
                        if removed > 0 {
                            debug!(
                                removed,
                                remaining = limiter.tracked_identifiers(),
                                "Swept elapsed rate limit windows"
                            );
                        }
                    }
                }
            }
        });

        info!(interval_seconds = interval.as_secs(), "Rate limit sweeper started");
        Self { stop, handle }
    }

    /// Token that stops the sweep when cancelled
    pub fn stop_token(&self) -> CancellationToken {
        self.stop.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Signal the task to stop and wait for it to exit
    pub async fn shutdown(self) {
        self.stop.cancel();
        if let Err(e) = self.handle.await {
            warn!(error = %e, "Rate limit sweeper ended abnormally");
        } else {
            info!("Rate limit sweeper stopped");
        }
    }
}
