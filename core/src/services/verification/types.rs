//! Plain result structures handed to the presentation layer

use serde::Serialize;

use crate::domain::value_objects::VerificationId;
use crate::errors::{FlowError, ProviderErrorKind};

/// Outcome of requesting a code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartResult {
    /// Whether the provider dispatched a code
    pub ok: bool,
    /// Identifier to carry into the verify step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_id: Option<String>,
    /// Failure description, verbatim from the provider where it came from one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Provider classification of the failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ProviderErrorKind>,
}

impl StartResult {
    pub(crate) fn sent(verification_id: &VerificationId) -> Self {
        Self {
            ok: true,
            verification_id: Some(verification_id.to_string()),
            message: None,
            error_kind: None,
        }
    }

    pub(crate) fn failed(error: &FlowError) -> Self {
        Self {
            ok: false,
            verification_id: None,
            message: Some(error.to_string()),
            error_kind: error.provider_kind(),
        }
    }
}

/// Outcome of submitting a code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResult {
    /// Whether the provider confirmed the code
    pub ok: bool,
    /// The submitted identifier, echoed on failure for a retry form
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_id: Option<String>,
    /// Failure description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// The identifier is dead and the caller has to call `start` again
    pub restart_required: bool,
    /// Provider classification of the failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ProviderErrorKind>,
}

impl VerifyResult {
    pub(crate) fn verified() -> Self {
        Self {
            ok: true,
            verification_id: None,
            message: None,
            restart_required: false,
            error_kind: None,
        }
    }

    pub(crate) fn rejected(verification_id: Option<&VerificationId>, error: &FlowError) -> Self {
        Self {
            ok: false,
            verification_id: verification_id.map(|id| id.to_string()),
            message: Some(error.to_string()),
            restart_required: error.restart_required(),
            error_kind: error.provider_kind(),
        }
    }
}
