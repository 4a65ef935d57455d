use actix_web::{web, HttpResponse};

use crate::dto::auth::TokenRequest;
use crate::handlers::error::handle_auth_error;

use super::AppState;

/// Handler for POST /auth/revoke
///
/// Revokes a token until its natural expiry.
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
/// ## Success (204 No Content)
/// Returned for any non-empty token, whether it was valid, already expired,
/// or the blacklist store could not be reached.
///
/// ## Errors
/// - 400 Bad Request: Token missing or empty
/// - 429 Too Many Requests: Rate limit exceeded
pub async fn revoke(
    state: web::Data<AppState>,
    request: web::Json<TokenRequest>,
) -> HttpResponse {
    match state.auth_service.logout(request.bearer_token()).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => handle_auth_error(&err),
    }
}
