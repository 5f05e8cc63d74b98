//! Value objects representing immutable domain concepts.

pub mod message_template;
pub mod verification_id;

// Re-export commonly used types
pub use message_template::MessageTemplate;
pub use verification_id::VerificationId;
