//! Example walking a phone number through the verification flow
//!
//! Runs against the in-memory mock provider, which prints each message.
//!
//! Run with: cargo run --example verification_flow_demo -- +15551234567

use std::sync::Arc;

use pv_core::services::verification::{VerificationFlow, VerificationFlowConfig};
use pv_core::{VerificationId, VerificationSession};
use pv_infra::provider::MockVerificationProvider;
use pv_shared::{init_tracing, AppConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::development();
    init_tracing(&config.logging)?;

    let phone = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "+15551234567".to_string());

    // Concrete mock so the demo can read back the issued code
    let provider = Arc::new(MockVerificationProvider::with_options(
        config.provider.console_output,
        std::time::Duration::from_secs(config.provider.code_ttl_secs),
    ));
    let flow_config = VerificationFlowConfig::try_from(&config.verification)?;
    let flow = VerificationFlow::new(Arc::clone(&provider), flow_config);

    println!("\n=== Requesting a code for {} ===", phone);
    let mut session = VerificationSession::new(phone.as_str());
    let started = flow.start_session(&mut session).await;
    println!("{}", serde_json::to_string_pretty(&started)?);

    let Some(verification_id) = started.verification_id else {
        println!("Provider refused the number, nothing to verify");
        return Ok(());
    };
    let id = VerificationId::new(verification_id.as_str())?;
    let code = provider
        .sent_code(&id)
        .await
        .ok_or_else(|| anyhow::anyhow!("mock provider lost verification {}", id))?;

    println!("\n=== Submitting a wrong code ===");
    let wrong = if code == "000000" { "111111" } else { "000000" };
    let rejected = flow.submit_session_code(&mut session, wrong).await;
    println!("{}", serde_json::to_string_pretty(&rejected)?);
    println!("Session state: {}", session.state());

    println!("\n=== Submitting the issued code ===");
    let verified = flow.submit_session_code(&mut session, &code).await;
    println!("{}", serde_json::to_string_pretty(&verified)?);
    println!("Session state: {}", session.state());

    println!("\n=== Requesting again after verification ===");
    let again = flow.start_session(&mut session).await;
    println!("{}", serde_json::to_string_pretty(&again)?);

    Ok(())
}
