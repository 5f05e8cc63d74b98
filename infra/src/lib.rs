//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for PhoneVerify. It
//! provides concrete verification providers and wires them into the core
//! verification flow.
//!
//! ## Features
//!
//! - `messagebird`: Enable the MessageBird Verify provider (default)

use std::sync::Arc;

use pv_core::errors::FlowError;
use pv_core::services::verification::{
    VerificationFlow, VerificationFlowConfig, VerificationProvider,
};
use pv_shared::AppConfig;

/// Verification provider module - mock and external providers
pub mod provider;

pub use provider::create_verification_provider;

/// Verification flow backed by whichever provider was configured
pub type DynVerificationFlow = VerificationFlow<dyn VerificationProvider>;

/// Infrastructure service container
#[derive(Clone)]
pub struct InfrastructureServices {
    /// Configuration the services were built from
    pub config: AppConfig,
    /// Verification flow with the configured provider injected
    pub verification_flow: Arc<DynVerificationFlow>,
}

/// Build the infrastructure services from environment configuration
///
/// This function:
/// - Loads `.env` (if present) and the environment
/// - Creates the configured verification provider
/// - Builds the verification flow around it
pub fn initialize() -> Result<InfrastructureServices, InfrastructureError> {
    tracing::info!("Initializing infrastructure services...");

    let config = load_config();
    let services = build_services(config)?;

    tracing::info!(
        environment = %services.config.environment,
        provider = services.verification_flow.provider().provider_name(),
        "Infrastructure services initialized successfully"
    );

    Ok(services)
}

/// Build the infrastructure services from an explicit configuration
pub fn build_services(config: AppConfig) -> Result<InfrastructureServices, InfrastructureError> {
    let provider = create_verification_provider(&config.provider)?;
    let flow_config = VerificationFlowConfig::try_from(&config.verification)?;

    Ok(InfrastructureServices {
        verification_flow: Arc::new(VerificationFlow::new(provider, flow_config)),
        config,
    })
}

/// Load configuration from environment
pub fn load_config() -> AppConfig {
    dotenvy::dotenv().ok(); // Load .env file if present
    AppConfig::from_env()
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// HTTP client construction error
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid verification flow settings
    #[error("Verification settings error: {0}")]
    Flow(#[from] FlowError),
}
