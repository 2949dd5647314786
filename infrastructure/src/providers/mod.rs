//! LLM provider adapters
//!
//! Each provider implements [`LlmGateway`] over a stateless HTTP API; the
//! sessions keep the conversation history and resend it on every call.
//!
//! | Provider | Endpoint | Auth |
//! |----------|----------|------|
//! | `gemini` | `{base}/v1beta/models/{model}:generateContent` | `x-goog-api-key` |
//! | `openai` | `{base}/v1/chat/completions` | bearer token (optional) |

pub mod gemini;
mod http;
pub mod openai;

use crate::config::FileConfig;
use gemini::GeminiGateway;
use health_crew_application::ports::llm_gateway::{GatewayError, LlmGateway};
use openai::OpenAiGateway;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    #[default]
    Gemini,
    OpenAi,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::OpenAi => "openai",
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "openai" | "ollama" => Ok(ProviderKind::OpenAi),
            other => Err(format!("unknown provider '{other}' (valid: gemini, openai)")),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Connection and sampling settings shared by every session of a gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub temperature: f32,
    pub max_output_tokens: Option<u32>,
    pub timeout: Duration,
}

/// Build the gateway selected by `[llm] provider`.
pub fn build_gateway(config: &FileConfig) -> Result<Arc<dyn LlmGateway>, GatewayError> {
    let kind = config
        .llm
        .provider
        .parse::<ProviderKind>()
        .map_err(GatewayError::RequestFailed)?;

    let gateway: Arc<dyn LlmGateway> = match kind {
        ProviderKind::Gemini => {
            let gemini = &config.providers.gemini;
            let settings = ProviderSettings {
                api_key: gemini.resolve_api_key(),
                base_url: gemini.base_url.clone(),
                temperature: config.llm.temperature,
                max_output_tokens: config.llm.max_output_tokens,
                timeout: config.llm.timeout(),
            };
            if settings.api_key.is_none() {
                return Err(GatewayError::Authentication(format!(
                    "no Gemini API key: set {} or providers.gemini.api_key",
                    gemini.api_key_env
                )));
            }
            Arc::new(GeminiGateway::new(settings)?)
        }
        ProviderKind::OpenAi => {
            let openai = &config.providers.openai;
            let settings = ProviderSettings {
                api_key: openai.resolve_api_key(),
                base_url: openai.base_url.clone(),
                temperature: config.llm.temperature,
                max_output_tokens: config.llm.max_output_tokens,
                timeout: config.llm.timeout(),
            };
            Arc::new(OpenAiGateway::new(settings)?)
        }
    };

    info!(provider = kind.as_str(), model = %config.llm.model, "LLM gateway ready");
    Ok(gateway)
}
