//! Provider-issued verification identifier.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::FlowError;

/// Opaque identifier correlating a code request with its later check
///
/// Issued by the verification provider, never generated locally. The only
/// local rule is that it cannot be empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerificationId(String);

impl VerificationId {
    /// Wraps a provider-issued identifier, rejecting blank values
    pub fn new(id: impl Into<String>) -> Result<Self, FlowError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(FlowError::MissingVerificationId);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for VerificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VerificationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
