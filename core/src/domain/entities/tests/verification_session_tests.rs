//! Unit tests for verification session entity

use crate::domain::entities::verification_session::{SessionState, VerificationSession};
use crate::domain::value_objects::VerificationId;

fn id(value: &str) -> VerificationId {
    VerificationId::new(value).unwrap()
}

#[test]
fn test_new_session() {
    let session = VerificationSession::new("+15551234567");

    assert_eq!(session.phone_number(), Some("+15551234567"));
    assert_eq!(session.state(), SessionState::New);
    assert!(session.verification_id().is_none());
    assert!(session.last_error().is_none());
    assert_eq!(session.created_at(), session.updated_at());
}

#[test]
fn test_resume_session() {
    let session = VerificationSession::resume(id("verif_abc"), None);

    assert_eq!(session.state(), SessionState::CodeSent);
    assert_eq!(session.verification_id().map(|v| v.as_str()), Some("verif_abc"));
    assert!(session.phone_number().is_none());
}

#[test]
fn test_code_sent_clears_error_and_sets_id() {
    let mut session = VerificationSession::new("+15551234567");
    session.record_error("is not a valid phone number");
    assert_eq!(session.state(), SessionState::New);

    session.mark_code_sent(id("verif_abc"));

    assert_eq!(session.state(), SessionState::CodeSent);
    assert_eq!(session.verification_id(), Some(&id("verif_abc")));
    assert!(session.last_error().is_none());
}

#[test]
fn test_resend_replaces_identifier() {
    let mut session = VerificationSession::new("+15551234567");
    session.mark_code_sent(id("verif_first"));
    session.mark_code_sent(id("verif_second"));

    assert_eq!(session.verification_id(), Some(&id("verif_second")));
    assert_eq!(session.state(), SessionState::CodeSent);
}

#[test]
fn test_verified_is_terminal() {
    let mut session = VerificationSession::new("+15551234567");
    session.mark_code_sent(id("verif_abc"));
    session.mark_verified();
    assert!(session.is_verified());
    assert!(session.state().is_terminal());

    session.mark_failed("expired");
    session.mark_code_sent(id("verif_other"));

    assert_eq!(session.state(), SessionState::Verified);
    assert_eq!(session.verification_id(), Some(&id("verif_abc")));
}

#[test]
fn test_verify_requires_code_sent() {
    let mut session = VerificationSession::new("+15551234567");
    session.mark_verified();
    assert_eq!(session.state(), SessionState::New);
}

#[test]
fn test_failed_drops_identifier() {
    let mut session = VerificationSession::new("+15551234567");
    session.mark_code_sent(id("verif_abc"));
    session.mark_failed("The verification has expired");

    assert_eq!(session.state(), SessionState::Failed);
    assert!(session.verification_id().is_none());
    assert_eq!(session.last_error(), Some("The verification has expired"));
    assert_eq!(session.phone_number(), Some("+15551234567"));
}

#[test]
fn test_state_display() {
    assert_eq!(SessionState::New.to_string(), "NEW");
    assert_eq!(SessionState::CodeSent.to_string(), "CODE_SENT");
    assert_eq!(SessionState::Verified.to_string(), "VERIFIED");
    assert_eq!(SessionState::Failed.to_string(), "FAILED");
}

#[test]
fn test_state_serializes_screaming_snake_case() {
    assert_eq!(
        serde_json::to_string(&SessionState::CodeSent).unwrap(),
        "\"CODE_SENT\""
    );
}
