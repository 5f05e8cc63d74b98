//! Configuration module
//!
//! - `environment` - Environment detection and logging configuration
//! - `provider` - Verification provider selection and credentials
//! - `verification` - Message template and provider call timeout

pub mod environment;
pub mod provider;
pub mod verification;

use serde::{Deserialize, Serialize};

pub use environment::{Environment, LogFormat, LoggingConfig};
pub use provider::ProviderConfig;
pub use verification::{VerificationSettings, CODE_PLACEHOLDER};

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Verification provider configuration
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Verification flow settings
    #[serde(default)]
    pub verification: VerificationSettings,
}

impl AppConfig {
    /// Create configuration for development environment
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            logging: LoggingConfig::for_environment(Environment::Development),
            provider: ProviderConfig {
                console_output: true,
                ..Default::default()
            },
            verification: VerificationSettings::default(),
        }
    }

    /// Load configuration from environment
    ///
    /// Callers that want `.env` support load it before calling this.
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        Self {
            environment,
            logging: LoggingConfig::from_env(environment),
            provider: ProviderConfig::from_env(),
            verification: VerificationSettings::from_env(),
        }
    }
}
