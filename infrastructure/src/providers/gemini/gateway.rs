//! Gemini gateway

use super::session::GeminiSession;
use crate::providers::ProviderSettings;
use crate::providers::http::build_client;
use async_trait::async_trait;
use health_crew_application::ports::llm_gateway::{GatewayError, LlmGateway, LlmSession};
use health_crew_domain::Model;
use std::sync::Arc;
use tracing::debug;

/// Gateway to the Gemini `generateContent` API.
///
/// One HTTP client is shared by every session created from the gateway.
pub struct GeminiGateway {
    client: reqwest::Client,
    settings: Arc<ProviderSettings>,
}

impl GeminiGateway {
    pub fn new(settings: ProviderSettings) -> Result<Self, GatewayError> {
        let client = build_client(settings.timeout)?;
        Ok(Self {
            client,
            settings: Arc::new(settings),
        })
    }

    fn open(&self, model: &Model, system_prompt: Option<&str>) -> Result<GeminiSession, GatewayError> {
        if model.is_gpt() {
            return Err(GatewayError::ModelNotAvailable(format!(
                "{model} is not served by Gemini"
            )));
        }
        debug!(model = %model, "Opening Gemini session");
        Ok(GeminiSession::new(
            self.client.clone(),
            self.settings.clone(),
            model.clone(),
            system_prompt.map(str::to_string),
        ))
    }
}

#[async_trait]
impl LlmGateway for GeminiGateway {
    fn provider_name(&self) -> &str {
        "gemini"
    }

    async fn create_session(&self, model: &Model) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(self.open(model, None)?))
    }

    async fn create_session_with_system_prompt(
        &self,
        model: &Model,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(self.open(model, Some(system_prompt))?))
    }
}
