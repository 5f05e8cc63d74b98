//! Message template handed to the provider with each code request.

use serde::{Deserialize, Serialize};

use crate::errors::FlowError;
use pv_shared::CODE_PLACEHOLDER;

/// SMS body containing exactly one code placeholder
///
/// The provider substitutes its generated code for the placeholder; the
/// verification flow itself never sees the code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageTemplate(String);

impl MessageTemplate {
    /// Creates a template, requiring exactly one `%token` placeholder
    pub fn new(template: impl Into<String>) -> Result<Self, FlowError> {
        let template = template.into();
        let placeholders = template.matches(CODE_PLACEHOLDER).count();
        if placeholders != 1 {
            return Err(FlowError::InvalidTemplate {
                placeholders,
                placeholder: CODE_PLACEHOLDER,
            });
        }
        Ok(Self(template))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substitutes `code` for the placeholder
    pub fn render(&self, code: &str) -> String {
        self.0.replacen(CODE_PLACEHOLDER, code, 1)
    }
}

impl Default for MessageTemplate {
    fn default() -> Self {
        Self(format!("Your verification code is {}", CODE_PLACEHOLDER))
    }
}

impl TryFrom<String> for MessageTemplate {
    type Error = FlowError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MessageTemplate> for String {
    fn from(template: MessageTemplate) -> Self {
        template.0
    }
}
