pub mod caller;
pub mod rate_limit;

pub use caller::{CallerResolver, SERVICE_API_KEY_HEADER};
pub use rate_limit::RateLimit;
