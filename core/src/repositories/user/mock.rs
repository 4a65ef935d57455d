//! Mock implementation of UserRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use super::trait_::UserRepository;
use crate::errors::DomainError;

/// Mock user repository recording every last-login write
#[derive(Clone, Default)]
pub struct MockUserRepository {
    logins: Arc<Mutex<Vec<(String, DateTime<Utc>)>>>,
    delay: Option<Duration>,
    fail: bool,
}

impl MockUserRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write sleep before completing
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Make every write fail
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Writes that completed successfully
    pub fn recorded_logins(&self) -> Vec<(String, DateTime<Utc>)> {
        self.logins.lock().clone()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn update_last_login(&self, user_id: &str, at: DateTime<Utc>) -> Result<(), DomainError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(DomainError::Internal {
                message: "user store unavailable".to_string(),
            });
        }
        self.logins.lock().push((user_id.to_string(), at));
        Ok(())
    }
}
