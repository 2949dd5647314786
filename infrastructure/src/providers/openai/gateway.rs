//! OpenAI-compatible gateway

use super::session::OpenAiSession;
use crate::providers::ProviderSettings;
use crate::providers::http::build_client;
use async_trait::async_trait;
use health_crew_application::ports::llm_gateway::{GatewayError, LlmGateway, LlmSession};
use health_crew_domain::Model;
use std::sync::Arc;
use tracing::debug;

pub struct OpenAiGateway {
    client: reqwest::Client,
    settings: Arc<ProviderSettings>,
}

impl OpenAiGateway {
    pub fn new(settings: ProviderSettings) -> Result<Self, GatewayError> {
        let client = build_client(settings.timeout)?;
        Ok(Self {
            client,
            settings: Arc::new(settings),
        })
    }

    fn open(&self, model: &Model, system_prompt: Option<&str>) -> OpenAiSession {
        debug!(model = %model, base_url = %self.settings.base_url, "Opening chat session");
        OpenAiSession::new(
            self.client.clone(),
            self.settings.clone(),
            model.clone(),
            system_prompt,
        )
    }
}

#[async_trait]
impl LlmGateway for OpenAiGateway {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn create_session(&self, model: &Model) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(self.open(model, None)))
    }

    async fn create_session_with_system_prompt(
        &self,
        model: &Model,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(self.open(model, Some(system_prompt))))
    }
}
