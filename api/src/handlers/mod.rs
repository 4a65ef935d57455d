pub mod error;

pub use error::handle_auth_error;
