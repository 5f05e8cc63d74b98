//! Verification session entity tracking one phone verification attempt.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::domain::value_objects::VerificationId;

/// Lifecycle state of a verification session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    /// Phone number collected, no code requested yet
    New,
    /// Provider accepted the request and dispatched a code
    CodeSent,
    /// Code confirmed by the provider (terminal)
    Verified,
    /// Verification id permanently invalid; restart from `New`
    Failed,
}

impl SessionState {
    /// No further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Verified)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::New => "NEW",
            SessionState::CodeSent => "CODE_SENT",
            SessionState::Verified => "VERIFIED",
            SessionState::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

/// In-memory record of one verification attempt
///
/// Sessions are request-scoped and never persisted. Between steps the caller
/// carries the verification id (and optionally the phone number) and rebuilds
/// the session with [`VerificationSession::resume`].
///
/// Invariants upheld by the transition methods:
/// - `verification_id` is present only in `CodeSent` or `Verified`
/// - `Verified` is never left
/// - the phone number cannot change after construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationSession {
    phone_number: Option<String>,
    verification_id: Option<VerificationId>,
    state: SessionState,
    last_error: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl VerificationSession {
    /// Creates a session at `New` for a freshly submitted phone number
    pub fn new(phone_number: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            phone_number: Some(phone_number.into()),
            verification_id: None,
            state: SessionState::New,
            last_error: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuilds a `CodeSent` session from the identifier the caller carried
    /// over from the previous step
    pub fn resume(verification_id: VerificationId, phone_number: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            phone_number,
            verification_id: Some(verification_id),
            state: SessionState::CodeSent,
            last_error: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }

    pub fn verification_id(&self) -> Option<&VerificationId> {
        self.verification_id.as_ref()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_verified(&self) -> bool {
        self.state == SessionState::Verified
    }

    /// A successful code request; replaces any previous identifier
    pub(crate) fn mark_code_sent(&mut self, verification_id: VerificationId) {
        if self.is_verified() {
            return;
        }
        self.verification_id = Some(verification_id);
        self.state = SessionState::CodeSent;
        self.last_error = None;
        self.touch();
    }

    /// A successful code check
    pub(crate) fn mark_verified(&mut self) {
        if self.state != SessionState::CodeSent {
            return;
        }
        self.state = SessionState::Verified;
        self.last_error = None;
        self.touch();
    }

    /// The provider declared the identifier permanently unusable
    pub(crate) fn mark_failed(&mut self, message: impl Into<String>) {
        if self.is_verified() {
            return;
        }
        self.verification_id = None;
        self.state = SessionState::Failed;
        self.last_error = Some(message.into());
        self.touch();
    }

    /// A failed step that leaves the state unchanged
    pub(crate) fn record_error(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
