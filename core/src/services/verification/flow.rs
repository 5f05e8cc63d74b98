//! Verification flow driving sessions through the provider

use std::future::Future;
use std::sync::Arc;

use pv_shared::phone::mask_phone_number;

use crate::domain::entities::{SessionState, VerificationSession};
use crate::domain::value_objects::VerificationId;
use crate::errors::{FlowError, FlowResult, ProviderError};

use super::config::VerificationFlowConfig;
use super::traits::{RequestOptions, VerificationProvider};
use super::types::{StartResult, VerifyResult};

/// Orchestrates code requests and code checks against a provider
///
/// The flow holds no per-user state. Every operation returns a plain result
/// value; provider failures, timeouts and misuse all come back as `ok: false`
/// and nothing is retried here.
pub struct VerificationFlow<P: VerificationProvider + ?Sized> {
    /// Provider that issues and checks codes
    provider: Arc<P>,
    /// Flow configuration
    config: VerificationFlowConfig,
}

impl<P: VerificationProvider + ?Sized> VerificationFlow<P> {
    /// Create a new verification flow
    ///
    /// # Arguments
    ///
    /// * `provider` - Provider implementation, constructed once at startup
    /// * `config` - Message template and provider timeout
    pub fn new(provider: Arc<P>, config: VerificationFlowConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &VerificationFlowConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Request a code for a freshly submitted phone number
    ///
    /// The number is passed to the provider as given; only an empty value is
    /// rejected locally.
    pub async fn start(&self, phone_number: &str) -> StartResult {
        let mut session = VerificationSession::new(phone_number);
        self.start_session(&mut session).await
    }

    /// Request (or re-request) a code for a session the caller holds
    ///
    /// A successful re-send replaces the session's verification id. A failed
    /// one leaves state and id as they were and records `last_error`.
    pub async fn start_session(&self, session: &mut VerificationSession) -> StartResult {
        match self.request_code(session).await {
            Ok(verification_id) => StartResult::sent(&verification_id),
            Err(err) => {
                session.record_error(err.to_string());
                StartResult::failed(&err)
            }
        }
    }

    /// Check a code for the verification id carried over by the caller
    pub async fn submit_code(&self, verification_id: &str, code: &str) -> VerifyResult {
        let verification_id = match VerificationId::new(verification_id) {
            Ok(id) => id,
            Err(err) => return VerifyResult::rejected(None, &err),
        };
        let mut session = VerificationSession::resume(verification_id, None);
        self.submit_session_code(&mut session, code).await
    }

    /// Check a code for a session the caller holds
    ///
    /// Only a `CodeSent` session reaches the provider. Terminal provider
    /// failures move the session to `Failed`; anything else keeps it in
    /// `CodeSent` so the caller may retry.
    pub async fn submit_session_code(
        &self,
        session: &mut VerificationSession,
        code: &str,
    ) -> VerifyResult {
        let submitted = session.verification_id().cloned();
        match self.check_code(session, code).await {
            Ok(()) => VerifyResult::verified(),
            Err(err) => {
                if err.restart_required() {
                    session.mark_failed(err.to_string());
                } else {
                    session.record_error(err.to_string());
                }
                VerifyResult::rejected(submitted.as_ref(), &err)
            }
        }
    }

    async fn request_code(&self, session: &mut VerificationSession) -> FlowResult<VerificationId> {
        if session.is_verified() {
            return Err(FlowError::AlreadyVerified);
        }
        let phone_number = session
            .phone_number()
            .filter(|phone| !phone.trim().is_empty())
            .ok_or(FlowError::MissingPhoneNumber)?
            .to_string();
        let masked = mask_phone_number(&phone_number);
        let options = RequestOptions {
            template: self.config.template.clone(),
        };

        tracing::info!(
            phone = %masked,
            provider = self.provider.provider_name(),
            resend = session.state() == SessionState::CodeSent,
            event = "code_requested",
            "Requesting verification code"
        );

        let verification_id = self
            .guarded(self.provider.request_code(&phone_number, &options))
            .await
            .map_err(|err| {
                tracing::warn!(
                    phone = %masked,
                    kind = %err.kind,
                    code = %err.code,
                    event = "code_request_failed",
                    "Provider rejected verification code request"
                );
                err
            })?;

        tracing::info!(
            phone = %masked,
            verification_id = %verification_id,
            event = "code_sent",
            "Verification code dispatched"
        );

        session.mark_code_sent(verification_id.clone());
        Ok(verification_id)
    }

    async fn check_code(&self, session: &mut VerificationSession, code: &str) -> FlowResult<()> {
        match session.state() {
            SessionState::CodeSent => {}
            SessionState::New => return Err(FlowError::CodeNotRequested),
            SessionState::Verified => return Err(FlowError::AlreadyVerified),
            SessionState::Failed => return Err(FlowError::RestartRequired),
        }
        let verification_id = session
            .verification_id()
            .cloned()
            .ok_or(FlowError::CodeNotRequested)?;

        self.guarded(self.provider.check_code(&verification_id, code))
            .await
            .map_err(|err| {
                tracing::warn!(
                    verification_id = %verification_id,
                    kind = %err.kind,
                    code = %err.code,
                    terminal = err.is_terminal(),
                    event = "code_check_failed",
                    "Verification code rejected"
                );
                err
            })?;

        tracing::info!(
            verification_id = %verification_id,
            event = "code_verified",
            "Verification code confirmed"
        );

        session.mark_verified();
        Ok(())
    }

    /// Bound a provider call by the configured timeout
    async fn guarded<T, F>(&self, call: F) -> Result<T, ProviderError>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        match tokio::time::timeout(self.config.provider_timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(
                    timeout_ms = self.config.provider_timeout.as_millis() as u64,
                    provider = self.provider.provider_name(),
                    event = "provider_timeout",
                    "Verification provider call timed out"
                );
                Err(ProviderError::timeout())
            }
        }
    }
}
