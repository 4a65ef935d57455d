//! Authentication route handlers
//!
//! This module contains the token endpoints:
//! - Single token verification
//! - Bulk verification for internal services
//! - Revocation (logout)

pub mod revoke;
pub mod verify;
pub mod verify_bulk;

use std::sync::Arc;

use ca_core::services::{AuthService, RateLimiter, TokenService};

use crate::middleware::CallerResolver;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub token_service: Arc<TokenService>,
    pub auth_service: Arc<AuthService>,
    pub rate_limiter: Arc<RateLimiter>,
    pub callers: Arc<CallerResolver>,
    /// Largest accepted JSON body, in bytes
    pub max_payload_size: usize,
}
