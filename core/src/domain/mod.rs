//! Domain layer containing the token and identity entities.

pub mod entities;

// Re-export commonly used domain types
pub use entities::{Claims, IssuedToken, TokenPair, TokenType, UserIdentity, VerificationResult};
