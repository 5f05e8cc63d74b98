//! MessageBird Verify Provider Implementation
//!
//! This module talks to the MessageBird Verify REST API:
//!
//! - `POST /verify` creates a verification; MessageBird generates the code,
//!   renders our template and sends the SMS
//! - `GET /verify/{id}?token={code}` checks a code
//!
//! Failures come back as `{"errors": [{"code", "description", "parameter"}]}`.
//! The first error is authoritative; its description is surfaced verbatim and
//! its code plus the HTTP status decide the [`ProviderErrorKind`].

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info};

use pv_core::errors::{ProviderError, ProviderErrorKind};
use pv_core::services::verification::{RequestOptions, VerificationProvider};
use pv_core::VerificationId;
use pv_shared::phone::mask_phone_number;
use pv_shared::ProviderConfig;

use crate::InfrastructureError;

/// MessageBird error code: request not allowed (bad credentials)
pub const ERROR_REQUEST_NOT_ALLOWED: i64 = 2;
/// MessageBird error code: missing parameters
pub const ERROR_MISSING_PARAMS: i64 = 9;
/// MessageBird error code: invalid parameters (including a wrong token)
pub const ERROR_INVALID_PARAMS: i64 = 10;
/// MessageBird error code: object not found
pub const ERROR_NOT_FOUND: i64 = 20;
/// MessageBird error code: bad request
pub const ERROR_BAD_REQUEST: i64 = 21;
/// MessageBird error code: not enough balance
pub const ERROR_NOT_ENOUGH_BALANCE: i64 = 25;

/// MessageBird provider configuration
#[derive(Debug, Clone)]
pub struct MessageBirdConfig {
    /// API access key
    pub access_key: String,
    /// Sender name or number
    pub originator: String,
    /// API base URL
    pub base_url: String,
    /// Timeout for API requests in seconds
    pub request_timeout_secs: u64,
}

impl MessageBirdConfig {
    /// Take the MessageBird settings out of the generic provider configuration
    pub fn from_provider_config(config: &ProviderConfig) -> Result<Self, InfrastructureError> {
        if config.access_key.trim().is_empty() {
            return Err(InfrastructureError::Config(
                "VERIFY_ACCESS_KEY must be set for the messagebird provider".to_string(),
            ));
        }
        if config.originator.trim().is_empty() {
            return Err(InfrastructureError::Config(
                "VERIFY_ORIGINATOR must not be empty".to_string(),
            ));
        }
        Ok(Self {
            access_key: config.access_key.clone(),
            originator: config.originator.clone(),
            base_url: config.base_url.clone(),
            request_timeout_secs: config.request_timeout_secs,
        })
    }
}

/// Which provider call produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    RequestCode,
    CheckCode,
}

#[derive(Debug, Deserialize)]
struct VerifyObject {
    id: String,
    #[serde(default)]
    status: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: i64,
    description: String,
}

/// MessageBird Verify provider
pub struct MessageBirdVerifyProvider {
    client: Client,
    base_url: Url,
    config: MessageBirdConfig,
}

impl MessageBirdVerifyProvider {
    /// Create a new MessageBird provider
    pub fn new(config: MessageBirdConfig) -> Result<Self, InfrastructureError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            InfrastructureError::Config(format!(
                "Invalid provider base URL '{}': {}",
                config.base_url, e
            ))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(InfrastructureError::Config(format!(
                "Provider base URL '{}' cannot be used as a base",
                config.base_url
            )));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        info!(
            "MessageBird verify provider initialized with originator: {}",
            config.originator
        );

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// Build `{base}/verify[/{id}]` with every segment percent-encoded
    fn endpoint(&self, verification_id: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("verify");
            if let Some(id) = verification_id {
                segments.push(id);
            }
        }
        url
    }

    fn authorization(&self) -> String {
        format!("AccessKey {}", self.config.access_key)
    }
}

#[async_trait]
impl VerificationProvider for MessageBirdVerifyProvider {
    async fn request_code(
        &self,
        phone_number: &str,
        options: &RequestOptions,
    ) -> Result<VerificationId, ProviderError> {
        debug!(
            "Requesting verification for {} via MessageBird",
            mask_phone_number(phone_number)
        );

        let response = self
            .client
            .post(self.endpoint(None))
            .header(AUTHORIZATION, self.authorization())
            .form(&[
                ("recipient", phone_number),
                ("originator", self.config.originator.as_str()),
                ("template", options.template.as_str()),
                ("type", "sms"),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            let err = classify_error(Operation::RequestCode, status.as_u16(), &body);
            error!(
                "MessageBird rejected verification request for {} ({}): {}",
                mask_phone_number(phone_number),
                status,
                err.description
            );
            return Err(err);
        }

        parse_verification_id(&body)
    }

    async fn check_code(
        &self,
        verification_id: &VerificationId,
        code: &str,
    ) -> Result<(), ProviderError> {
        let response = self
            .client
            .get(self.endpoint(Some(verification_id.as_str())))
            .header(AUTHORIZATION, self.authorization())
            .query(&[("token", code)])
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(classify_error(Operation::CheckCode, status.as_u16(), &body));
        }

        interpret_check_status(&body)
    }

    fn provider_name(&self) -> &str {
        "MessageBird"
    }
}

/// Map a transport-level reqwest error
fn transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        return ProviderError::timeout();
    }
    let code = if err.is_connect() { "connect" } else { "http" };
    ProviderError::transport(code, err.to_string())
}

/// Extract the verification id from a successful create response
pub fn parse_verification_id(body: &str) -> Result<VerificationId, ProviderError> {
    let object: VerifyObject = serde_json::from_str(body).map_err(|e| {
        ProviderError::new(
            ProviderErrorKind::Unclassified,
            "invalid_response",
            format!("Unexpected provider response: {}", e),
        )
    })?;
    VerificationId::new(object.id).map_err(|_| {
        ProviderError::new(
            ProviderErrorKind::Unclassified,
            "invalid_response",
            "Provider returned an empty verification id",
        )
    })
}

/// Decide the outcome of a 2xx check response from the verify object status
pub fn interpret_check_status(body: &str) -> Result<(), ProviderError> {
    let object: VerifyObject = serde_json::from_str(body).map_err(|e| {
        ProviderError::new(
            ProviderErrorKind::Unclassified,
            "invalid_response",
            format!("Unexpected provider response: {}", e),
        )
    })?;
    match object.status.as_str() {
        "verified" => Ok(()),
        "expired" => Err(ProviderError::code_expired(
            object.status.clone(),
            "The verification has expired",
        )),
        "failed" => Err(ProviderError::identifier_invalid(
            object.status.clone(),
            "The verification has failed",
        )),
        other => Err(ProviderError::code_rejected(
            other.to_string(),
            format!("The verification is {}", other),
        )),
    }
}

/// Classify a non-2xx response
///
/// Only the first entry of the `errors` array is considered. Bodies that are
/// not in the MessageBird error shape fall back to the HTTP status.
pub fn classify_error(operation: Operation, status: u16, body: &str) -> ProviderError {
    let first = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.errors.into_iter().next());

    let (code, description) = match first {
        Some(api_error) => (Some(api_error.code), api_error.description),
        None => (None, format!("Provider responded with HTTP {}", status)),
    };
    let machine_code = code
        .map(|c| c.to_string())
        .unwrap_or_else(|| status.to_string());
    let mentions_expiry = description.to_lowercase().contains("expired");

    let kind = if status >= 500 || status == 429 {
        ProviderErrorKind::TransportFailure
    } else if status == 401
        || status == 403
        || matches!(code, Some(ERROR_REQUEST_NOT_ALLOWED | ERROR_NOT_ENOUGH_BALANCE))
    {
        ProviderErrorKind::Unclassified
    } else if operation == Operation::CheckCode && mentions_expiry {
        ProviderErrorKind::CodeExpired
    } else if operation == Operation::CheckCode
        && (status == 404 || code == Some(ERROR_NOT_FOUND))
    {
        ProviderErrorKind::IdentifierInvalid
    } else if matches!(code, Some(ERROR_MISSING_PARAMS | ERROR_INVALID_PARAMS | ERROR_BAD_REQUEST))
        || status == 400
        || status == 422
    {
        match operation {
            Operation::RequestCode => ProviderErrorKind::InputRejected,
            Operation::CheckCode => ProviderErrorKind::CodeRejected,
        }
    } else {
        ProviderErrorKind::Unclassified
    };

    ProviderError::new(kind, machine_code, description)
}
