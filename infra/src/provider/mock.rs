//! Mock Verification Provider Implementation
//!
//! An in-memory verification provider for development and testing.
//! Codes are generated locally, "delivered" to the console or the log, and
//! checked against an in-memory table. Behaves like a real provider where it
//! matters to the flow: number rejection, single use, expiry, unknown ids.

use async_trait::async_trait;
use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, RngCore};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use pv_core::errors::ProviderError;
use pv_core::services::verification::{RequestOptions, VerificationProvider};
use pv_core::VerificationId;
use pv_shared::phone::{is_valid_international_phone, mask_phone_number};

/// Length of the generated codes
pub const MOCK_CODE_LENGTH: usize = 6;

/// Default lifetime of a mock verification
pub const DEFAULT_MOCK_CODE_TTL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
struct MockVerification {
    phone: String,
    code: String,
    created_at: Instant,
    verified: bool,
}

/// Mock verification provider for development and testing
#[derive(Clone)]
pub struct MockVerificationProvider {
    /// Live verifications by id, at most one per phone number
    verifications: Arc<RwLock<HashMap<String, MockVerification>>>,
    /// Counter for tracking number of codes requested
    request_count: Arc<AtomicU64>,
    /// Whether to simulate an unreachable provider
    simulate_failure: Arc<AtomicBool>,
    /// Whether to print messages to console
    console_output: bool,
    /// How long an issued code stays checkable
    code_ttl: Duration,
}

impl MockVerificationProvider {
    /// Create a new mock provider
    pub fn new() -> Self {
        Self::with_options(false, DEFAULT_MOCK_CODE_TTL)
    }

    /// Create a mock provider with configurable options
    pub fn with_options(console_output: bool, code_ttl: Duration) -> Self {
        Self {
            verifications: Arc::new(RwLock::new(HashMap::new())),
            request_count: Arc::new(AtomicU64::new(0)),
            simulate_failure: Arc::new(AtomicBool::new(false)),
            console_output,
            code_ttl,
        }
    }

    /// Get the total number of codes requested
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Enable or disable outage simulation
    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, Ordering::SeqCst);
    }

    /// Code issued for `verification_id`, for tests and local development
    pub async fn sent_code(&self, verification_id: &VerificationId) -> Option<String> {
        self.verifications
            .read()
            .await
            .get(verification_id.as_str())
            .map(|v| v.code.clone())
    }

    /// Phone number a verification was issued for
    pub async fn phone_for(&self, verification_id: &VerificationId) -> Option<String> {
        self.verifications
            .read()
            .await
            .get(verification_id.as_str())
            .map(|v| v.phone.clone())
    }

    /// Generate a random 6-digit code using the OS CSPRNG
    pub fn generate_code() -> String {
        let mut bytes = [0u8; 4];
        OsRng.fill_bytes(&mut bytes);
        let num = u32::from_le_bytes(bytes) % 1_000_000;
        format!("{:0width$}", num, width = MOCK_CODE_LENGTH)
    }

    fn check_outage(&self) -> Result<(), ProviderError> {
        if self.simulate_failure.load(Ordering::SeqCst) {
            warn!(provider = "mock", "Mock provider simulating outage");
            return Err(ProviderError::transport(
                "mock_unavailable",
                "Simulated provider outage",
            ));
        }
        Ok(())
    }
}

impl Default for MockVerificationProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VerificationProvider for MockVerificationProvider {
    async fn request_code(
        &self,
        phone_number: &str,
        options: &RequestOptions,
    ) -> Result<VerificationId, ProviderError> {
        self.check_outage()?;

        if !is_valid_international_phone(phone_number) {
            return Err(ProviderError::input_rejected(
                "21",
                "is not a valid phone number",
            ));
        }

        let id = Uuid::new_v4().simple().to_string();
        let code = Self::generate_code();
        let message = options.template.render(&code);
        let count = self.request_count.fetch_add(1, Ordering::SeqCst) + 1;
        let masked_phone = mask_phone_number(phone_number);

        if self.console_output {
            println!("\n{}", "=".repeat(60));
            println!("MOCK VERIFICATION PROVIDER - MESSAGE #{}", count);
            println!("{}", "=".repeat(60));
            println!("To: {}", phone_number);
            println!("Verification ID: {}", id);
            println!("Content: {}", message);
            println!("{}\n", "=".repeat(60));
        }

        info!(
            target: "verification_provider",
            provider = "mock",
            phone = %masked_phone,
            verification_id = %id,
            message_length = message.len(),
            "Mock verification code issued"
        );

        let mut verifications = self.verifications.write().await;
        let before = verifications.len();
        // A resend replaces any earlier verification for the number
        verifications.retain(|_, existing| {
            existing.phone != phone_number && existing.created_at.elapsed() <= self.code_ttl
        });
        let pruned = before - verifications.len();
        if pruned > 0 {
            debug!(
                provider = "mock",
                phone = %masked_phone,
                pruned,
                "Dropped superseded or expired mock verifications"
            );
        }
        verifications.insert(
            id.clone(),
            MockVerification {
                phone: phone_number.to_string(),
                code,
                created_at: Instant::now(),
                verified: false,
            },
        );
        drop(verifications);

        VerificationId::new(id)
            .map_err(|e| ProviderError::transport("mock_internal", e.to_string()))
    }

    async fn check_code(
        &self,
        verification_id: &VerificationId,
        code: &str,
    ) -> Result<(), ProviderError> {
        self.check_outage()?;

        let mut verifications = self.verifications.write().await;
        let verification = verifications
            .get_mut(verification_id.as_str())
            .ok_or_else(|| {
                ProviderError::identifier_invalid("20", "verify object could not be found")
            })?;

        if verification.verified {
            return Err(ProviderError::identifier_invalid(
                "20",
                "The verification has already been completed",
            ));
        }
        if verification.created_at.elapsed() > self.code_ttl {
            return Err(ProviderError::code_expired(
                "20",
                "The verification has expired",
            ));
        }
        if code.len() != verification.code.len()
            || !constant_time_eq(code.as_bytes(), verification.code.as_bytes())
        {
            debug!(
                provider = "mock",
                verification_id = %verification_id,
                "Mock verification code mismatch"
            );
            return Err(ProviderError::code_rejected("10", "The token is invalid"));
        }

        verification.verified = true;
        info!(
            target: "verification_provider",
            provider = "mock",
            verification_id = %verification_id,
            "Mock verification completed"
        );
        Ok(())
    }

    fn provider_name(&self) -> &str {
        "Mock"
    }
}
