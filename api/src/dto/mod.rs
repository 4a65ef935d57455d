pub mod auth;
pub mod error;

pub use auth::{BulkVerifyRequest, BulkVerifyResponse, TokenRequest};
pub use error::{ErrorResponse, ErrorResponseExt};
