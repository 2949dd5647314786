//! Language model configuration from TOML (`[llm]` section)
//!
//! ```toml
//! [llm]
//! provider = "gemini"
//! model = "gemini-pro"
//! temperature = 0.5
//! timeout_secs = 120
//! ```

use crate::providers::ProviderKind;
use health_crew_domain::{ConfigIssue, ConfigIssueCode, Model};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw `[llm]` configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLlmConfig {
    /// Provider name: "gemini" or "openai"
    pub provider: String,
    /// Model name passed to the provider
    pub model: String,
    /// Sampling temperature (0.0 to 2.0)
    pub temperature: f32,
    /// Upper bound on generated tokens per response
    pub max_output_tokens: Option<u32>,
    /// Per-request HTTP timeout
    pub timeout_secs: u64,
}

impl Default for FileLlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Gemini.as_str().to_string(),
            model: Model::default().to_string(),
            temperature: 0.5,
            max_output_tokens: None,
            timeout_secs: 120,
        }
    }
}

impl FileLlmConfig {
    pub fn parse_model(&self) -> Model {
        Model::from(self.model.trim())
    }

    /// Parse the provider name, reporting an issue when it is unknown.
    pub fn parse_provider(&self) -> (Option<ProviderKind>, Vec<ConfigIssue>) {
        match self.provider.parse::<ProviderKind>() {
            Ok(kind) => (Some(kind), vec![]),
            Err(e) => (
                None,
                vec![ConfigIssue::error(
                    ConfigIssueCode::UnknownProvider,
                    format!("llm.provider: {}", e),
                )],
            ),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.model.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyModel,
                "llm.model: model name cannot be empty",
            ));
        }

        let (provider, provider_issues) = self.parse_provider();
        issues.extend(provider_issues);

        if let Some(provider) = provider
            && !self.model.trim().is_empty()
        {
            let model = self.parse_model();
            let mismatch = match provider {
                ProviderKind::Gemini => model.is_gpt(),
                ProviderKind::OpenAi => model.is_gemini(),
            };
            if mismatch {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::ModelProviderMismatch,
                    format!(
                        "llm.model: '{}' does not look like a {} model",
                        model,
                        provider.as_str()
                    ),
                ));
            }
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::TemperatureOutOfRange,
                format!(
                    "llm.temperature: {} is outside 0.0 to 2.0",
                    self.temperature
                ),
            ));
        }

        if self.timeout_secs == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroTimeout,
                "llm.timeout_secs cannot be 0",
            ));
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use health_crew_domain::Severity;

    #[test]
    fn test_defaults_match_gemini_pro() {
        let config = FileLlmConfig::default();
        assert_eq!(config.provider, "gemini");
        assert_eq!(config.parse_model(), Model::GeminiPro);
        assert_eq!(config.temperature, 0.5);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_unknown_provider_is_error() {
        let config = FileLlmConfig {
            provider: "bedrock".to_string(),
            ..Default::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, ConfigIssueCode::UnknownProvider);
        assert_eq!(issues[0].severity, Severity::Error);
    }

    #[test]
    fn test_gpt_model_on_gemini_warns() {
        let config = FileLlmConfig {
            model: "gpt-4o".to_string(),
            ..Default::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
    }

    #[test]
    fn test_out_of_range_values() {
        let config = FileLlmConfig {
            model: "  ".to_string(),
            temperature: 2.5,
            timeout_secs: 0,
            ..Default::default()
        };
        let codes: Vec<_> = config.validate().iter().map(|i| i.code).collect();
        assert_eq!(
            codes,
            vec![
                ConfigIssueCode::EmptyModel,
                ConfigIssueCode::TemperatureOutOfRange,
                ConfigIssueCode::ZeroTimeout,
            ]
        );
    }
}
