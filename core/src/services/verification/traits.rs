//! Trait for verification provider integration

use async_trait::async_trait;

use crate::domain::value_objects::{MessageTemplate, VerificationId};
use crate::errors::ProviderError;

/// Options sent along with a code request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    /// Message body; the provider fills in the code it generates
    pub template: MessageTemplate,
}

/// External service that generates, delivers and checks one-time codes
///
/// Implementations own the code itself. Callers only ever see the
/// verification id the provider hands back.
#[async_trait]
pub trait VerificationProvider: Send + Sync {
    /// Generate a code and deliver it to `phone_number`
    async fn request_code(
        &self,
        phone_number: &str,
        options: &RequestOptions,
    ) -> Result<VerificationId, ProviderError>;

    /// Check `code` against the verification identified by `verification_id`
    ///
    /// A verification that already succeeded once must be rejected.
    async fn check_code(
        &self,
        verification_id: &VerificationId,
        code: &str,
    ) -> Result<(), ProviderError>;

    /// Provider name for logging
    fn provider_name(&self) -> &str;
}
