//! # Central Auth Core
//!
//! Token pipeline of the Central Auth server: signing and validating session
//! tokens, cached verification with a revocation blacklist, tiered rate
//! limiting, and login completion. Storage is reached only through the
//! capability traits in [`repositories`].

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
