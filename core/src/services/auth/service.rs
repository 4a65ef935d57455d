//! Login completion and logout

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::entities::token::TokenPair;
use crate::domain::entities::user::UserIdentity;
use crate::errors::{AuthError, DomainResult};
use crate::services::token::TokenService;

use super::login_recorder::LoginRecorder;

/// Finishes a login once credentials have been checked elsewhere
pub struct AuthService {
    /// Token service for JWT management
    token_service: Arc<TokenService>,
    /// Background last-login writer
    login_recorder: Arc<LoginRecorder>,
}

impl AuthService {
    pub fn new(token_service: Arc<TokenService>, login_recorder: Arc<LoginRecorder>) -> Self {
        Self {
            token_service,
            login_recorder,
        }
    }

    /// Issue a token pair for an authenticated user
    ///
    /// The last-login update is queued, never awaited; its outcome cannot
    /// delay or fail the login.
    pub fn complete_login(&self, identity: &UserIdentity) -> DomainResult<TokenPair> {
        let pair = self.token_service.generate_token_pair(identity)?;
        self.login_recorder.record(&identity.user_id, Utc::now());

        info!(user_id = %identity.user_id, role = %identity.role, "Login completed");
        Ok(pair)
    }

    /// Revoke the presented access token
    ///
    /// Succeeds for any non-empty token, including expired or unreadable ones.
    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::EmptyToken);
        }
        self.token_service.revoke_token(token).await;
        Ok(())
    }
}
