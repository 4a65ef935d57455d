//! Authentication service module
//!
//! Completes logins by issuing token pairs and recording the last login in
//! the background, and handles logout through token revocation.

mod login_recorder;
mod service;

#[cfg(test)]
mod tests;

pub use login_recorder::{LoginRecorder, LoginRecorderConfig};
pub use service::AuthService;
