//! Identifying the caller behind an HTTP request

use std::net::{IpAddr, SocketAddr};

use actix_web::http::header::HeaderMap;

use ca_core::services::rate_limit::{Caller, CallerClassifier};
use ca_shared::config::RateLimitConfig;

/// Header carrying an internal service's API key
pub const SERVICE_API_KEY_HEADER: &str = "X-Service-API-Key";

/// Resolves the API key and source address of a request into a [`Caller`]
///
/// Forwarding headers are only honoured when the server sits behind a proxy
/// that sets them; otherwise the socket peer address is used.
#[derive(Debug, Clone)]
pub struct CallerResolver {
    classifier: CallerClassifier,
    trust_forwarded_headers: bool,
}

impl CallerResolver {
    pub fn new(classifier: CallerClassifier, trust_forwarded_headers: bool) -> Self {
        Self {
            classifier,
            trust_forwarded_headers,
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(
            CallerClassifier::from_config(config),
            config.trust_forwarded_headers,
        )
    }

    pub fn resolve(&self, headers: &HeaderMap, peer_addr: Option<SocketAddr>) -> Caller {
        let api_key = headers
            .get(SERVICE_API_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|key| !key.is_empty());

        self.classifier
            .classify(api_key, self.client_ip(headers, peer_addr))
    }

    /// Source address of the request
    pub fn client_ip(&self, headers: &HeaderMap, peer_addr: Option<SocketAddr>) -> Option<IpAddr> {
        if self.trust_forwarded_headers {
            // First hop of X-Forwarded-For is the original client
            let forwarded = headers
                .get("X-Forwarded-For")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.split(',').next())
                .and_then(|ip| ip.trim().parse().ok());
            if forwarded.is_some() {
                return forwarded;
            }

            let real_ip = headers
                .get("X-Real-IP")
                .and_then(|value| value.to_str().ok())
                .and_then(|ip| ip.trim().parse().ok());
            if real_ip.is_some() {
                return real_ip;
            }
        }

        peer_addr.map(|addr| addr.ip())
    }
}
