use std::time::Instant;

use actix_web::{web, HttpResponse};

use ca_core::errors::AuthError;

use crate::dto::auth::TokenRequest;
use crate::handlers::error::handle_auth_error;

use super::AppState;

pub const X_RESPONSE_TIME: &str = "x-response-time";

/// Handler for POST /auth/verify
///
/// Verifies a single access token.
///
/// # Request Body
///
/// ```json
/// {
///     "token": "Bearer eyJ..."
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// Returned for every non-empty token, valid or not:
/// ```json
/// {
///     "valid": true,
///     "userId": "u1",
///     "email": "a@b.com",
///     "role": "admin",
///     "expiresAt": "2024-01-01T00:15:00Z"
/// }
/// ```
/// or
/// ```json
/// {
///     "valid": false,
///     "error": "token has expired"
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Token missing or empty
/// - 429 Too Many Requests: Rate limit exceeded
pub async fn verify(
    state: web::Data<AppState>,
    request: web::Json<TokenRequest>,
) -> HttpResponse {
    let started = Instant::now();

    let token = request.bearer_token();
    if token.is_empty() {
        return handle_auth_error(&AuthError::EmptyToken);
    }

    let result = state.token_service.verify_token(token).await;
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    HttpResponse::Ok()
        .insert_header((X_RESPONSE_TIME, format!("{:.3}ms", elapsed_ms)))
        .json(result)
}
