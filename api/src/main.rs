use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing::{error, info, warn};

use ca_api::{create_app, middleware::CallerResolver, telemetry, AppState};
use ca_core::repositories::{InMemoryTokenCache, NoOpUserRepository, TokenCache};
use ca_core::services::{
    AuthService, JwtSigner, LoginRecorder, LoginRecorderConfig, RateLimiter, RateLimiterConfig,
    TokenService, TokenServiceConfig,
};
use ca_infra::{RedisClient, RedisTokenCache};
use ca_shared::config::{AppConfig, CacheConfig};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("invalid configuration")?;
    telemetry::init_tracing(&config.logging);

    info!(environment = %config.environment, "Starting Central Auth server");

    let signer = JwtSigner::new(&config.jwt).context("invalid JWT configuration")?;
    let cache = build_token_cache(&config.cache).await;
    let token_service = Arc::new(TokenService::new(
        signer,
        Some(cache),
        TokenServiceConfig::from(&config.cache),
    ));

    let rate_limiter = Arc::new(RateLimiter::new(RateLimiterConfig::from(&config.rate_limit)));
    let sweeper = rate_limiter.start_sweeper();

    let login_recorder = Arc::new(LoginRecorder::spawn(
        Arc::new(NoOpUserRepository),
        LoginRecorderConfig::default(),
    ));
    let auth_service = Arc::new(AuthService::new(token_service.clone(), login_recorder.clone()));

    let state = web::Data::new(AppState {
        token_service,
        auth_service,
        rate_limiter,
        callers: Arc::new(CallerResolver::from_config(&config.rate_limit)),
        max_payload_size: config.server.max_payload_size,
    });

    let bind_address = config.server.bind_address();
    info!(address = %bind_address, "Server will bind");

    let mut server = HttpServer::new(move || create_app(state.clone()));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }
    let result = server.bind(&bind_address)?.run().await;

    info!("HTTP server stopped, shutting down background tasks");
    sweeper.shutdown().await;
    login_recorder.shutdown().await;

    if let Err(e) = &result {
        error!(error = %e, "Server exited with an error");
    }
    result.context("HTTP server failed")
}

/// Redis when configured and reachable, otherwise the in-process cache
///
/// The in-process cache is per instance: revocations are not shared.
async fn build_token_cache(config: &CacheConfig) -> Arc<dyn TokenCache> {
    if config.redis_url.is_none() {
        info!("REDIS_URL not set, using in-process token cache");
        return Arc::new(InMemoryTokenCache::new());
    }

    match RedisClient::connect(config).await {
        Ok(client) => {
            info!("Using Redis token cache");
            Arc::new(RedisTokenCache::new(client))
        }
        Err(e) => {
            warn!(error = %e, "Redis unavailable, falling back to in-process token cache");
            Arc::new(InMemoryTokenCache::new())
        }
    }
}
