//! Provider error types
//!
//! Each provider has its own error taxonomy. Adapters classify their native
//! codes into a [`ProviderErrorKind`]; the flow relies on the kind alone and
//! forwards the description to the caller verbatim.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Machine code attached to timeouts raised by the flow itself
pub const TIMEOUT_CODE: &str = "timeout";

/// Classification of a provider failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderErrorKind {
    /// Phone number malformed, unsupported or blocked
    InputRejected,
    /// Submitted code does not match
    CodeRejected,
    /// Verification id exists but can no longer be checked
    CodeExpired,
    /// Verification id unknown or already consumed
    IdentifierInvalid,
    /// Network failure, timeout or provider unavailable
    TransportFailure,
    /// Any provider failure the adapter could not classify
    Unclassified,
}

impl ProviderErrorKind {
    /// The verification id is dead; the caller has to start over
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::CodeExpired | Self::IdentifierInvalid)
    }

    /// The same call may succeed if the caller tries again later
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransportFailure)
    }
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InputRejected => "input_rejected",
            Self::CodeRejected => "code_rejected",
            Self::CodeExpired => "code_expired",
            Self::IdentifierInvalid => "identifier_invalid",
            Self::TransportFailure => "transport_failure",
            Self::Unclassified => "unclassified",
        };
        f.write_str(name)
    }
}

/// Failure reported by a verification provider
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{description}")]
pub struct ProviderError {
    /// Classification assigned by the provider adapter
    pub kind: ProviderErrorKind,
    /// Provider's own machine code, opaque to the flow
    pub code: String,
    /// Human-readable description, surfaced unmodified
    pub description: String,
}

impl ProviderError {
    pub fn new(
        kind: ProviderErrorKind,
        code: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            code: code.into(),
            description: description.into(),
        }
    }

    pub fn input_rejected(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::InputRejected, code, description)
    }

    pub fn code_rejected(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::CodeRejected, code, description)
    }

    pub fn code_expired(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::CodeExpired, code, description)
    }

    pub fn identifier_invalid(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::IdentifierInvalid, code, description)
    }

    pub fn transport(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::TransportFailure, code, description)
    }

    /// A provider call that did not resolve in time
    pub fn timeout() -> Self {
        Self::transport(TIMEOUT_CODE, "timeout")
    }

    pub fn is_terminal(&self) -> bool {
        self.kind.is_terminal()
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}
