use actix_web::{web, HttpRequest, HttpResponse};
use tracing::{debug, warn};

use ca_core::errors::AuthError;

use crate::dto::auth::{BulkVerifyRequest, BulkVerifyResponse};
use crate::handlers::error::handle_auth_error;

use super::AppState;

/// Handler for POST /auth/verify-bulk
///
/// Verifies up to 100 tokens in one call. Only internal callers, identified
/// by a known `X-Service-API-Key` or an allow-listed source address, may use it.
///
/// # Request Body
///
/// ```json
/// {
///     "tokens": ["eyJ...", "eyJ..."]
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "results": {
///         "eyJhbGciOi...sw5c6Jw0Fk": { "valid": true, "userId": "u1" }
///     }
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Empty batch or more than 100 tokens
/// - 401 Unauthorized: Caller is not internal
/// - 429 Too Many Requests: Rate limit exceeded
pub async fn verify_bulk(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<BulkVerifyRequest>,
) -> HttpResponse {
    let caller = state.callers.resolve(req.headers(), req.peer_addr());
    if !caller.is_internal() {
        warn!(caller = %caller.identifier, "Bulk verification refused for external caller");
        return handle_auth_error(&AuthError::ApiKeyRequired);
    }

    match state.token_service.verify_tokens_bulk(&request.tokens).await {
        Ok(results) => {
            debug!(caller = %caller.identifier, count = results.len(), "Bulk verification completed");
            HttpResponse::Ok().json(BulkVerifyResponse { results })
        }
        Err(err) => handle_auth_error(&err),
    }
}
