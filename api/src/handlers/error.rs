//! Mapping of caller-contract errors onto HTTP responses
//!
//! Token verification failures never pass through here; they are returned as
//! `valid: false` results with status 200.

use actix_web::{
    http::{header, StatusCode},
    HttpResponse,
};

use ca_core::errors::AuthError;
use ca_shared::errors::error_codes;

use crate::dto::error::{ErrorResponse, ErrorResponseExt};

/// Convert an [`AuthError`] into its HTTP response
pub fn handle_auth_error(err: &AuthError) -> HttpResponse {
    match err {
        AuthError::RateLimitExceeded { retry_after_seconds } => {
            let retry_after = (*retry_after_seconds).max(1);
            let body = ErrorResponse::new(
                "rate_limit_exceeded",
                error_codes::RATE_LIMIT,
                format!("Too many requests. Please try again in {} seconds", retry_after),
            )
            .add_detail("retry_after_seconds", retry_after);

            HttpResponse::TooManyRequests()
                .insert_header((header::RETRY_AFTER, retry_after.to_string()))
                .json(body)
        }
        AuthError::ApiKeyRequired => ErrorResponse::new(
            "api_key_required",
            error_codes::API_KEY_REQUIRED,
            "Bulk verification requires a service API key or an internal source address",
        )
        .to_response(StatusCode::UNAUTHORIZED),
        AuthError::BatchSizeInvalid { size, max } => {
            ErrorResponse::new("batch_size_invalid", error_codes::BATCH_SIZE_INVALID, err.to_string())
                .add_detail("size", size)
                .add_detail("max", max)
                .to_response(StatusCode::BAD_REQUEST)
        }
        AuthError::EmptyToken => {
            ErrorResponse::new("token_required", error_codes::TOKEN_REQUIRED, err.to_string())
                .to_response(StatusCode::BAD_REQUEST)
        }
    }
}
