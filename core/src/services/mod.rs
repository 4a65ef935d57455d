//! Business services: token handling, rate limiting and login completion.

pub mod auth;
pub mod rate_limit;
pub mod token;

pub use auth::{AuthService, LoginRecorder, LoginRecorderConfig};
pub use rate_limit::{
    Caller, CallerClassifier, CallerTier, RateLimitDecision, RateLimitSweeper, RateLimiter,
    RateLimiterConfig,
};
pub use token::{token_fragment, JwtSigner, TokenMetadata, TokenService, TokenServiceConfig};
