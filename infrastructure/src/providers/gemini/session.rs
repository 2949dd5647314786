//! Gemini session
//!
//! `generateContent` is stateless, so the session keeps the exchanged
//! messages and resends them with every request.

use super::types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig};
use crate::providers::ProviderSettings;
use crate::providers::http::send_json;
use async_trait::async_trait;
use health_crew_application::ports::llm_gateway::{GatewayError, LlmSession};
use health_crew_domain::Model;
use health_crew_domain::session::entities::Message;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

pub struct GeminiSession {
    client: reqwest::Client,
    settings: Arc<ProviderSettings>,
    model: Model,
    system_prompt: Option<String>,
    history: Mutex<Vec<Message>>,
}

impl GeminiSession {
    pub(crate) fn new(
        client: reqwest::Client,
        settings: Arc<ProviderSettings>,
        model: Model,
        system_prompt: Option<String>,
    ) -> Self {
        Self {
            client,
            settings,
            model,
            system_prompt,
            history: Mutex::new(Vec::new()),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            self.model
        )
    }

    pub(crate) fn build_request(&self, history: &[Message]) -> GenerateContentRequest {
        GenerateContentRequest {
            system_instruction: self
                .system_prompt
                .as_deref()
                .map(|prompt| Content::text(None, prompt)),
            contents: history.iter().map(Content::from_message).collect(),
            generation_config: GenerationConfig {
                temperature: self.settings.temperature,
                max_output_tokens: self.settings.max_output_tokens,
            },
        }
    }
}

#[async_trait]
impl LlmSession for GeminiSession {
    fn model(&self) -> &Model {
        &self.model
    }

    async fn send(&self, content: &str) -> Result<String, GatewayError> {
        let mut history = self.history.lock().await;

        let mut messages = history.clone();
        messages.push(Message::user(content));
        let body = self.build_request(&messages);

        debug!(model = %self.model, turns = messages.len(), "Sending Gemini request");

        let mut request = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = &self.settings.api_key {
            request = request.header("x-goog-api-key", key);
        }

        let response: GenerateContentResponse = send_json(request).await?;
        let text = response.into_text()?;

        // Only completed exchanges enter the history.
        history.push(Message::user(content));
        history.push(Message::assistant(text.clone()));
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{Value, json};
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct Captured {
        bodies: Arc<std::sync::Mutex<Vec<Value>>>,
        keys: Arc<std::sync::Mutex<Vec<String>>>,
    }

    async fn generate(
        State(captured): State<Captured>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        let key = headers
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let turn = body["contents"].as_array().map(Vec::len).unwrap_or(0);
        captured.bodies.lock().unwrap().push(body);
        captured.keys.lock().unwrap().push(key.clone());

        if key != "test-key" {
            return (
                StatusCode::FORBIDDEN,
                Json(json!({"error": {"message": "API key not valid"}})),
            );
        }
        (
            StatusCode::OK,
            Json(json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": format!("answer {turn}")}]},
                    "finishReason": "STOP"
                }]
            })),
        )
    }

    async fn spawn_server() -> (String, Captured) {
        let captured = Captured::default();
        let app = Router::new()
            .route("/v1beta/models/{action}", post(generate))
            .with_state(captured.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}"), captured)
    }

    fn session(base_url: String, key: &str) -> GeminiSession {
        let settings = ProviderSettings {
            api_key: Some(key.to_string()),
            base_url,
            temperature: 0.5,
            max_output_tokens: Some(256),
            timeout: Duration::from_secs(5),
        };
        GeminiSession::new(
            reqwest::Client::new(),
            Arc::new(settings),
            Model::GeminiPro,
            Some("You are Doctor.".to_string()),
        )
    }

    #[tokio::test]
    async fn test_history_is_resent() {
        let (base_url, captured) = spawn_server().await;
        let session = session(base_url, "test-key");

        assert_eq!(session.send("first").await.unwrap(), "answer 1");
        assert_eq!(session.send("second").await.unwrap(), "answer 3");

        let bodies = captured.bodies.lock().unwrap();
        assert_eq!(bodies.len(), 2);
        assert_eq!(bodies[1]["contents"][1]["role"], "model");
        assert_eq!(bodies[1]["contents"][1]["parts"][0]["text"], "answer 1");
        assert_eq!(
            bodies[1]["systemInstruction"]["parts"][0]["text"],
            "You are Doctor."
        );
        assert_eq!(bodies[0]["generationConfig"]["maxOutputTokens"], 256);
        assert_eq!(captured.keys.lock().unwrap()[0], "test-key");
    }

    #[tokio::test]
    async fn test_rejected_key_maps_to_authentication() {
        let (base_url, _captured) = spawn_server().await;
        let session = session(base_url, "wrong");

        let err = session.send("hello").await.unwrap_err();
        assert!(matches!(err, GatewayError::Authentication(ref m) if m.contains("403")));
        assert!(session.history.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_a_connection_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let session = session(format!("http://{addr}"), "test-key");
        let err = session.send("hello").await.unwrap_err();
        assert!(matches!(err, GatewayError::ConnectionError(_)));
    }

    #[test]
    fn test_endpoint_uses_model_name() {
        let session = session("https://example.test/".to_string(), "k");
        assert_eq!(
            session.endpoint(),
            "https://example.test/v1beta/models/gemini-pro:generateContent"
        );
    }
}
