//! Verification flow module for phone number ownership checks
//!
//! This module drives a verification session through its states:
//! - Requesting a one-time code from the provider for a phone number
//! - Checking the code the user submits back
//! - Classifying provider failures into retry or restart outcomes
//! - Bounding every provider call with a timeout

mod config;
mod flow;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use config::{VerificationFlowConfig, DEFAULT_PROVIDER_TIMEOUT_SECS};
pub use flow::VerificationFlow;
pub use traits::{RequestOptions, VerificationProvider};
pub use types::{StartResult, VerifyResult};
