//! Domain-specific error types and error handling.

mod types;

pub use types::{AuthError, CacheError, TokenError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_errors_read_as_reasons() {
        assert_eq!(TokenError::Expired.to_string(), "token has expired");
        assert_eq!(TokenError::Revoked.to_string(), "token has been revoked");
        assert_eq!(
            TokenError::WrongTokenType.to_string(),
            "refresh token cannot be used for access"
        );
    }

    #[test]
    fn test_domain_error_bridges() {
        let err: DomainError = AuthError::BatchSizeInvalid { size: 101, max: 100 }.into();
        assert!(matches!(err, DomainError::Auth(AuthError::BatchSizeInvalid { size: 101, .. })));
        assert_eq!(err.to_string(), "batch size 101 is invalid, expected 1 to 100 tokens");

        let err: DomainError = CacheError::Timeout.into();
        assert!(matches!(err, DomainError::Cache(CacheError::Timeout)));
    }
}
