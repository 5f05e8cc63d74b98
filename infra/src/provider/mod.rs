//! Verification Provider Module
//!
//! Implementations of the core `VerificationProvider` trait:
//!
//! - **Mock**: in-memory provider printing codes to the console/log
//! - **MessageBird**: production provider backed by the MessageBird Verify API

use std::sync::Arc;
use std::time::Duration;

use pv_core::services::verification::VerificationProvider;
use pv_shared::ProviderConfig;

use crate::InfrastructureError;

pub mod mock;

// MessageBird Verify provider (feature-gated)
#[cfg(feature = "messagebird")]
pub mod messagebird;

pub use mock::MockVerificationProvider;

#[cfg(feature = "messagebird")]
pub use messagebird::{MessageBirdConfig, MessageBirdVerifyProvider};

#[cfg(test)]
mod tests;

/// Create a verification provider based on configuration
///
/// Unknown provider names fall back to the mock implementation. A known
/// provider with incomplete settings is a configuration error.
pub fn create_verification_provider(
    config: &ProviderConfig,
) -> Result<Arc<dyn VerificationProvider>, InfrastructureError> {
    match config.provider.to_lowercase().as_str() {
        "mock" => Ok(Arc::new(mock_from_config(config))),
        #[cfg(feature = "messagebird")]
        "messagebird" => {
            let messagebird_config = MessageBirdConfig::from_provider_config(config)?;
            Ok(Arc::new(MessageBirdVerifyProvider::new(messagebird_config)?))
        }
        other => {
            tracing::warn!(
                "Unknown verification provider '{}', using mock implementation",
                other
            );
            Ok(Arc::new(mock_from_config(config)))
        }
    }
}

fn mock_from_config(config: &ProviderConfig) -> MockVerificationProvider {
    MockVerificationProvider::with_options(
        config.console_output,
        Duration::from_secs(config.code_ttl_secs),
    )
}
