//! Shared utilities and common types for PhoneVerify
//!
//! This crate provides common functionality used across all workspace crates:
//! - Configuration types
//! - Tracing subscriber setup
//! - Phone number utilities (masking for logs, E.164 check)

pub mod config;
pub mod logging;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, Environment, LogFormat, LoggingConfig, ProviderConfig, VerificationSettings,
    CODE_PLACEHOLDER,
};
pub use logging::{init_tracing, LoggingError};
pub use utils::phone;
