//! Domain entities representing core business objects.

pub mod verification_session;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use verification_session::{SessionState, VerificationSession};
