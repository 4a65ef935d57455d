//! No-op implementation of UserRepository for deployments without a user store

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::UserRepository;
use crate::errors::DomainError;

/// No-op implementation of UserRepository
///
/// Every write succeeds without doing anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpUserRepository;

impl NoOpUserRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl UserRepository for NoOpUserRepository {
    async fn update_last_login(&self, _user_id: &str, _at: DateTime<Utc>) -> Result<(), DomainError> {
        Ok(())
    }
}
