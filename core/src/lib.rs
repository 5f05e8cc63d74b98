//! # PhoneVerify Core
//!
//! Core domain layer for phone number verification.
//! This crate contains the verification session entity, value objects, the
//! provider contract and the verification flow that ties them together.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
