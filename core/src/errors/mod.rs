//! Domain-specific error types and error handling.

mod types;

pub use types::{ProviderError, ProviderErrorKind, TIMEOUT_CODE};

use thiserror::Error;

/// Reasons a verification step did not succeed
///
/// Flow operations never return these as `Err`; they are folded into the
/// `message` of a `StartResult` or `VerifyResult`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("phone number is required")]
    MissingPhoneNumber,

    #[error("verification id is required")]
    MissingVerificationId,

    #[error("no verification code has been requested")]
    CodeNotRequested,

    #[error("phone number is already verified")]
    AlreadyVerified,

    #[error("verification is no longer valid, request a new code")]
    RestartRequired,

    #[error("message template must contain exactly one '{placeholder}' placeholder, found {placeholders}")]
    InvalidTemplate {
        placeholders: usize,
        placeholder: &'static str,
    },

    #[error("provider timeout must be greater than zero")]
    InvalidProviderTimeout,

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl FlowError {
    /// The session cannot continue and the caller must go back to `start`
    pub fn restart_required(&self) -> bool {
        match self {
            FlowError::RestartRequired => true,
            FlowError::Provider(err) => err.is_terminal(),
            _ => false,
        }
    }

    /// Provider classification, if the failure came from the provider
    pub fn provider_kind(&self) -> Option<ProviderErrorKind> {
        match self {
            FlowError::Provider(err) => Some(err.kind),
            _ => None,
        }
    }
}

pub type FlowResult<T> = Result<T, FlowError>;
