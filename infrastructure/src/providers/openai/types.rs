//! Wire types for chat completions

use health_crew_application::ports::llm_gateway::GatewayError;
use health_crew_domain::session::entities::Message;
use serde::{Deserialize, Serialize};

/// Request body. Messages use the domain [`Message`] directly since its
/// serialized form (`{"role": "user", "content": ...}`) is the wire format.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChoiceMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    pub fn into_text(self) -> Result<String, GatewayError> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::InvalidResponse("no choices in response".into()))?;

        match choice.message.content {
            Some(text) if !text.is_empty() => Ok(text),
            _ => Err(GatewayError::InvalidResponse(format!(
                "choice has no content (finish reason: {})",
                choice.finish_reason.as_deref().unwrap_or("unknown")
            ))),
        }
    }
}
