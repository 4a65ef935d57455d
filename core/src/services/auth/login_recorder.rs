//! Background recording of successful logins
//!
//! Login responses never wait on the user store: events go through a bounded
//! queue to a single worker, each write has its own deadline, and failures
//! are logged and dropped.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::repositories::UserRepository;

/// Configuration for the login recorder
#[derive(Debug, Clone)]
pub struct LoginRecorderConfig {
    /// Events buffered before new ones are dropped
    pub queue_capacity: usize,
    /// Deadline for a single last-login write
    pub write_timeout: Duration,
}

impl Default for LoginRecorderConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 1024,
            write_timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Debug)]
struct LoginEvent {
    user_id: String,
    at: DateTime<Utc>,
}

/// Bounded queue plus worker task updating users' last login time
pub struct LoginRecorder {
    sender: Mutex<Option<mpsc::Sender<LoginEvent>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl LoginRecorder {
    /// Spawn the worker on the current runtime
    pub fn spawn(repository: Arc<dyn UserRepository>, config: LoginRecorderConfig) -> Self {
        let (sender, receiver) = mpsc::channel(config.queue_capacity.max(1));
        let worker = tokio::spawn(run_worker(repository, receiver, config.write_timeout));

        Self {
            sender: Mutex::new(Some(sender)),
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Queue a last-login write without waiting for it
    ///
    /// Returns `false` when the event was dropped because the queue is full
    /// or the recorder has shut down.
    pub fn record(&self, user_id: &str, at: DateTime<Utc>) -> bool {
        let sender = self.sender.lock();
        let Some(sender) = sender.as_ref() else {
            warn!(user_id = %user_id, "Login recorder stopped, dropping last-login update");
            return false;
        };

        let event = LoginEvent {
            user_id: user_id.to_string(),
            at,
        };
        match sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                warn!(user_id = %event.user_id, "Login recorder queue full, dropping last-login update");
                false
            }
            Err(TrySendError::Closed(event)) => {
                warn!(user_id = %event.user_id, "Login recorder worker gone, dropping last-login update");
                false
            }
        }
    }

    /// Close the queue, let the worker drain it, and wait for it to exit
    pub async fn shutdown(&self) {
        drop(self.sender.lock().take());
        let worker = self.worker.lock().take();
        if let Some(worker) = worker {
            if let Err(e) = worker.await {
                warn!(error = %e, "Login recorder worker ended abnormally");
            } else {
                info!("Login recorder stopped");
            }
        }
    }
}

async fn run_worker(
    repository: Arc<dyn UserRepository>,
    mut receiver: mpsc::Receiver<LoginEvent>,
    write_timeout: Duration,
) {
    while let Some(event) = receiver.recv().await {
        let write = repository.update_last_login(&event.user_id, event.at);
        match tokio::time::timeout(write_timeout, write).await {
            Ok(Ok(())) => debug!(user_id = %event.user_id, "Recorded last login"),
            Ok(Err(e)) => warn!(user_id = %event.user_id, error = %e, "Failed to record last login"),
            Err(_) => warn!(
                user_id = %event.user_id,
                timeout_ms = write_timeout.as_millis() as u64,
                "Timed out recording last login"
            ),
        }
    }
}
