//! Tests for the token signer and token service

mod mocks;
mod signer_tests;
