//! Application factory
//!
//! Builds the Actix-web application from the shared state: health check,
//! the rate limited `/auth` scope, JSON body limits and the 404 fallback.

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    error::InternalError,
    http::StatusCode,
    web, App, Error, HttpResponse,
};
use tracing_actix_web::TracingLogger;

use ca_shared::errors::error_codes;

use crate::dto::error::{ErrorResponse, ErrorResponseExt};
use crate::middleware::RateLimit;
use crate::routes::auth::{revoke::revoke, verify::verify, verify_bulk::verify_bulk, AppState};

/// Create and configure the application with all dependencies
pub fn create_app(
    state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let rate_limit = RateLimit::new(state.rate_limiter.clone(), state.callers.clone());
    let json_config = web::JsonConfig::default()
        .limit(state.max_payload_size)
        .error_handler(|err, _req| {
            let response = ErrorResponse::new("invalid_request", error_codes::BAD_REQUEST, err.to_string())
                .to_response(StatusCode::BAD_REQUEST);
            InternalError::from_response(err, response).into()
        });

    App::new()
        .app_data(state)
        .app_data(json_config)
        .wrap(TracingLogger::default())
        // Health check endpoint
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/auth")
                .wrap(rate_limit)
                .route("/verify", web::post().to(verify))
                .route("/verify-bulk", web::post().to(verify_bulk))
                .route("/revoke", web::post().to(revoke)),
        )
        // Default 404 handler
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "central-auth",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn not_found() -> HttpResponse {
    ErrorResponse::new(
        "not_found",
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    )
    .to_response(StatusCode::NOT_FOUND)
}
