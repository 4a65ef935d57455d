//! User repository trait for the parts of user persistence this service touches.
//!
//! User records are owned by an external collaborator; the auth pipeline only
//! needs to stamp the last successful login.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::DomainError;

/// Repository trait for user persistence operations
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Record the time of the user's last successful login
    async fn update_last_login(&self, user_id: &str, at: DateTime<Utc>) -> Result<(), DomainError>;
}
