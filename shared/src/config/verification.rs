//! Verification flow settings

use serde::{Deserialize, Serialize};
use std::env;

/// Placeholder the provider replaces with the generated code
pub const CODE_PLACEHOLDER: &str = "%token";

/// Settings for the verification flow itself
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerificationSettings {
    /// Message body sent with the code; must contain exactly one `%token`
    #[serde(default = "default_template")]
    pub template: String,

    /// Upper bound on a single provider call, in seconds
    #[serde(default = "default_provider_timeout")]
    pub provider_timeout_secs: u64,
}

impl Default for VerificationSettings {
    fn default() -> Self {
        Self {
            template: default_template(),
            provider_timeout_secs: default_provider_timeout(),
        }
    }
}

impl VerificationSettings {
    /// Load settings from `VERIFY_TEMPLATE` and `VERIFY_TIMEOUT_SECS`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            template: env::var("VERIFY_TEMPLATE").unwrap_or(defaults.template),
            provider_timeout_secs: env::var("VERIFY_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.provider_timeout_secs),
        }
    }
}

fn default_template() -> String {
    format!("Your verification code is {}", CODE_PLACEHOLDER)
}

fn default_provider_timeout() -> u64 {
    15
}
