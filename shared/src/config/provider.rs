//! Verification provider configuration module

use serde::{Deserialize, Serialize};
use std::env;

/// Default base URL of the MessageBird REST API
pub const DEFAULT_MESSAGEBIRD_BASE_URL: &str = "https://rest.messagebird.com";

/// Verification provider configuration
///
/// Credentials are read once at startup and handed to the provider
/// constructor; nothing reads them from the environment afterwards.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Provider implementation ("messagebird", "mock")
    pub provider: String,

    /// API access key
    #[serde(default)]
    pub access_key: String,

    /// Sender name or number shown to the recipient
    #[serde(default = "default_originator")]
    pub originator: String,

    /// Base URL of the provider API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout for a single HTTP request to the provider, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Lifetime of an issued code, in seconds (mock provider only)
    #[serde(default = "default_code_ttl")]
    pub code_ttl_secs: u64,

    /// Print outgoing messages to the console (mock provider only)
    #[serde(default)]
    pub console_output: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: String::from("mock"),
            access_key: String::new(),
            originator: default_originator(),
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
            code_ttl_secs: default_code_ttl(),
            console_output: false,
        }
    }
}

impl ProviderConfig {
    /// Load provider configuration from `VERIFY_*` environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            provider: env::var("VERIFY_PROVIDER").unwrap_or(defaults.provider),
            access_key: env::var("VERIFY_ACCESS_KEY").unwrap_or_default(),
            originator: env::var("VERIFY_ORIGINATOR").unwrap_or(defaults.originator),
            base_url: env::var("VERIFY_BASE_URL").unwrap_or(defaults.base_url),
            request_timeout_secs: env::var("VERIFY_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout_secs),
            code_ttl_secs: env::var("VERIFY_CODE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.code_ttl_secs),
            console_output: env::var("VERIFY_CONSOLE_OUTPUT")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }

    /// Whether this configuration selects the in-memory mock provider
    pub fn is_mock(&self) -> bool {
        self.provider.eq_ignore_ascii_case("mock")
    }
}

fn default_originator() -> String {
    String::from("Verify")
}

fn default_base_url() -> String {
    String::from(DEFAULT_MESSAGEBIRD_BASE_URL)
}

fn default_request_timeout() -> u64 {
    10
}

fn default_code_ttl() -> u64 {
    30
}
