//! Chat completions session

use super::types::{ChatRequest, ChatResponse};
use crate::providers::ProviderSettings;
use crate::providers::http::send_json;
use async_trait::async_trait;
use health_crew_application::ports::llm_gateway::{GatewayError, LlmSession};
use health_crew_domain::Model;
use health_crew_domain::session::entities::Message;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

pub struct OpenAiSession {
    client: reqwest::Client,
    settings: Arc<ProviderSettings>,
    model: Model,
    /// Starts with the system message, if any.
    messages: Mutex<Vec<Message>>,
}

impl OpenAiSession {
    pub(crate) fn new(
        client: reqwest::Client,
        settings: Arc<ProviderSettings>,
        model: Model,
        system_prompt: Option<&str>,
    ) -> Self {
        let messages = system_prompt.map(Message::system).into_iter().collect();
        Self {
            client,
            settings,
            model,
            messages: Mutex::new(messages),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl LlmSession for OpenAiSession {
    fn model(&self) -> &Model {
        &self.model
    }

    async fn send(&self, content: &str) -> Result<String, GatewayError> {
        let mut messages = self.messages.lock().await;

        let mut outgoing = messages.clone();
        outgoing.push(Message::user(content));
        let body = ChatRequest {
            model: self.model.to_string(),
            messages: outgoing,
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_output_tokens,
        };

        debug!(model = %self.model, messages = body.messages.len(), "Sending chat completion");

        let mut request = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = &self.settings.api_key {
            request = request.bearer_auth(key);
        }

        let response: ChatResponse = send_json(request).await?;
        let text = response.into_text()?;

        messages.push(Message::user(content));
        messages.push(Message::assistant(text.clone()));
        Ok(text)
    }
}
