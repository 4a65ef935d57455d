//! HTTP boundary of the Central Auth server
//!
//! Binds the verify, bulk verify and revoke endpoints to the token service
//! and wraps them in the tiered rate limiter.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod telemetry;

pub use app::create_app;
pub use routes::auth::AppState;
