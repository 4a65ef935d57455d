//! Token service module for JWT management
//!
//! This module handles all token-related operations including:
//! - JWT access and refresh token generation
//! - Signature, algorithm, expiry and issuer validation
//! - Cached single and bulk verification
//! - Revocation through the token ID blacklist

mod config;
mod service;
mod signer;

#[cfg(test)]
mod tests;

pub use config::{TokenServiceConfig, MAX_BULK_TOKENS};
pub use service::{token_fragment, TokenService};
pub use signer::{JwtSigner, TokenMetadata, MIN_SECRET_LENGTH};
