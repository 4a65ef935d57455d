//! Error type definitions for token handling, caller contracts and the cache
//!
//! `TokenError` values never surface as transport errors from the verify
//! path; their `Display` text is the reason string carried by a negative
//! verification result.

use thiserror::Error;

/// Token validation and issuance errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("token algorithm does not match the expected algorithm")]
    AlgorithmMismatch,

    #[error("token has expired")]
    Expired,

    #[error("token is not yet valid")]
    NotYetValid,

    #[error("token issuer mismatch")]
    IssuerMismatch,

    #[error("token has been revoked")]
    Revoked,

    #[error("refresh token cannot be used for access")]
    WrongTokenType,

    #[error("missing claim: {claim}")]
    MissingClaim { claim: String },

    #[error("token generation failed: {message}")]
    TokenGenerationFailed { message: String },
}

/// Caller contract violations
///
/// Unlike token errors these are reported as 4xx responses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("rate limit exceeded, retry after {retry_after_seconds} seconds")]
    RateLimitExceeded { retry_after_seconds: u64 },

    #[error("a valid service API key or internal source address is required")]
    ApiKeyRequired,

    #[error("batch size {size} is invalid, expected 1 to {max} tokens")]
    BatchSizeInvalid { size: usize, max: usize },

    #[error("token is required")]
    EmptyToken,
}

/// Failures of the verification cache or blacklist store
///
/// Always recoverable: the token service degrades to direct validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("cache unavailable: {message}")]
    Unavailable { message: String },

    #[error("cache operation timed out")]
    Timeout,

    #[error("cache serialization error: {message}")]
    Serialization { message: String },
}
