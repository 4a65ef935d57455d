pub mod token_cache;
pub mod user;

pub use token_cache::{hash_token, InMemoryTokenCache, TokenCache};
pub use user::{NoOpUserRepository, UserRepository};

#[cfg(test)]
pub use user::MockUserRepository;
