//! Shared wiring for HTTP tests
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use actix_web::web;

use ca_api::{middleware::CallerResolver, AppState};
use ca_core::domain::UserIdentity;
use ca_core::repositories::{InMemoryTokenCache, NoOpUserRepository};
use ca_core::services::{
    AuthService, JwtSigner, LoginRecorder, LoginRecorderConfig, RateLimiter, RateLimiterConfig,
    TokenService, TokenServiceConfig,
};
use ca_shared::config::{JwtConfig, RateLimitConfig};

pub const SECRET: &str = "0123456789abcdef0123456789abcdef";
pub const ISSUER: &str = "central";
pub const SERVICE_KEY: &str = "svc-reporting";
pub const EXTERNAL_PEER: &str = "203.0.113.7:41000";
pub const INTERNAL_PEER: &str = "10.20.30.40:41000";

pub struct TestContext {
    pub state: web::Data<AppState>,
    pub token_service: Arc<TokenService>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_limits(1000, 100)
    }

    /// Limiter ceilings per one-minute window
    pub fn with_limits(internal_max: u32, external_max: u32) -> Self {
        let signer = JwtSigner::new(&JwtConfig::new(SECRET, ISSUER)).expect("valid signer config");
        let token_service = Arc::new(TokenService::new(
            signer,
            Some(Arc::new(InMemoryTokenCache::new())),
            TokenServiceConfig::default(),
        ));

        let rate_limiter = Arc::new(RateLimiter::new(RateLimiterConfig {
            internal_max,
            external_max,
            window: Duration::from_secs(60),
            sweep_interval: Duration::from_secs(60),
        }));

        let rate_limit_config = RateLimitConfig::default()
            .with_internal_network("10.0.0.0/8".parse().expect("valid network"))
            .with_internal_api_key(SERVICE_KEY);

        let login_recorder = Arc::new(LoginRecorder::spawn(
            Arc::new(NoOpUserRepository),
            LoginRecorderConfig::default(),
        ));

        let state = web::Data::new(AppState {
            token_service: token_service.clone(),
            auth_service: Arc::new(AuthService::new(token_service.clone(), login_recorder)),
            rate_limiter,
            callers: Arc::new(CallerResolver::from_config(&rate_limit_config)),
            max_payload_size: 1024 * 1024,
        });

        Self {
            state,
            token_service,
        }
    }

    pub fn access_token(&self, user_id: &str) -> String {
        let identity = UserIdentity::new(user_id, format!("{}@example.com", user_id), "staff")
            .with_school("school-1");
        self.token_service
            .generate_access_token(&identity)
            .expect("token issued")
            .token
    }
}

pub fn peer(addr: &str) -> SocketAddr {
    addr.parse().expect("valid socket address")
}
