//! Configuration for the verification flow

use std::time::Duration;

use pv_shared::VerificationSettings;

use crate::domain::value_objects::MessageTemplate;
use crate::errors::FlowError;

/// Default upper bound on a single provider call
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 15;

/// Configuration for the verification flow
#[derive(Debug, Clone)]
pub struct VerificationFlowConfig {
    /// Message template passed to the provider with every code request
    pub template: MessageTemplate,
    /// Provider calls still pending after this long resolve as `"timeout"`
    pub provider_timeout: Duration,
}

impl Default for VerificationFlowConfig {
    fn default() -> Self {
        Self {
            template: MessageTemplate::default(),
            provider_timeout: Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
        }
    }
}

impl TryFrom<&VerificationSettings> for VerificationFlowConfig {
    type Error = FlowError;

    fn try_from(settings: &VerificationSettings) -> Result<Self, Self::Error> {
        if settings.provider_timeout_secs == 0 {
            return Err(FlowError::InvalidProviderTimeout);
        }
        Ok(Self {
            template: MessageTemplate::new(settings.template.clone())?,
            provider_timeout: Duration::from_secs(settings.provider_timeout_secs),
        })
    }
}
