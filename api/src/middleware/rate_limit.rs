//! Rate limiting middleware for API endpoints
//!
//! Counts every request against its caller's fixed window and tier ceiling.
//! Allowed responses carry the `X-RateLimit-*` headers; denied requests are
//! answered with 429 and `Retry-After` before reaching the handler.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderMap, HeaderName, HeaderValue},
    Error,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
};
use tracing::{debug, warn};

use ca_core::services::rate_limit::{RateLimitDecision, RateLimiter};

use super::caller::CallerResolver;
use crate::handlers::error::handle_auth_error;

pub const X_RATELIMIT_LIMIT: &str = "x-ratelimit-limit";
pub const X_RATELIMIT_REMAINING: &str = "x-ratelimit-remaining";
pub const X_RATELIMIT_RESET: &str = "x-ratelimit-reset";

/// Rate limiter middleware factory
#[derive(Clone)]
pub struct RateLimit {
    limiter: Arc<RateLimiter>,
    callers: Arc<CallerResolver>,
}

impl RateLimit {
    pub fn new(limiter: Arc<RateLimiter>, callers: Arc<CallerResolver>) -> Self {
        Self { limiter, callers }
    }
}

/// Middleware implementation for rate limiting
impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
            callers: self.callers.clone(),
        }))
    }
}

/// Rate limiter middleware service
pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limiter: Arc<RateLimiter>,
    callers: Arc<CallerResolver>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut std::task::Context<'_>) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let caller = self.callers.resolve(req.headers(), req.peer_addr());
        let decision = self.limiter.check(&caller);

        if let Some(err) = decision.to_error() {
            warn!(
                caller = %caller.identifier,
                path = %req.path(),
                limit = decision.limit,
                "Rate limit exceeded"
            );
            let mut response = handle_auth_error(&err);
            apply_headers(response.headers_mut(), &decision);
            let response = req.into_response(response).map_into_right_body();
            return Box::pin(async move { Ok(response) });
        }

        debug!(
            caller = %caller.identifier,
            remaining = decision.remaining,
            "Request counted"
        );

        let service = self.service.clone();
        Box::pin(async move {
            let mut response = service.call(req).await?;
            apply_headers(response.headers_mut(), &decision);
            Ok(response.map_into_left_body())
        })
    }
}

fn apply_headers(headers: &mut HeaderMap, decision: &RateLimitDecision) {
    headers.insert(
        HeaderName::from_static(X_RATELIMIT_LIMIT),
        HeaderValue::from(decision.limit),
    );
    headers.insert(
        HeaderName::from_static(X_RATELIMIT_REMAINING),
        HeaderValue::from(decision.remaining),
    );
    headers.insert(
        HeaderName::from_static(X_RATELIMIT_RESET),
        HeaderValue::from(decision.reset_unix_seconds()),
    );
}
