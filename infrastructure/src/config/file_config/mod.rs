//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod execution;
mod llm;
mod logging;
mod output;
mod prompt;
mod providers;
mod server;
mod tools;

pub use execution::FileExecutionConfig;
pub use llm::FileLlmConfig;
pub use logging::{FileLoggingConfig, expand_home};
pub use output::FileOutputConfig;
pub use prompt::FilePromptConfig;
pub use providers::{FileGeminiConfig, FileOpenAiConfig, FileProvidersConfig};
pub use server::FileServerConfig;
pub use tools::FileToolsConfig;

use health_crew_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Provider, model and sampling settings
    pub llm: FileLlmConfig,
    /// Per-provider credentials and endpoints
    pub providers: FileProvidersConfig,
    /// Stage loop limits
    pub execution: FileExecutionConfig,
    /// How form fields reach the model
    pub prompt: FilePromptConfig,
    /// Tool availability
    pub tools: FileToolsConfig,
    /// Terminal output settings
    pub output: FileOutputConfig,
    /// Web form server settings
    pub server: FileServerConfig,
    /// Log file settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Checks the model name, provider, temperature and timeout, the turn
    /// budget, and the prompt input mode.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.llm.validate());
        issues.extend(self.execution.validate());
        issues.extend(self.prompt.parse_input_mode().1);
        issues
    }

    /// The effective configuration as TOML, with API keys masked.
    pub fn to_redacted_toml(&self) -> Result<String, toml::ser::Error> {
        let mut shown = self.clone();
        for key in [
            &mut shown.providers.gemini.api_key,
            &mut shown.providers.openai.api_key,
        ] {
            if key.is_some() {
                *key = Some("********".to_string());
            }
        }
        toml::to_string_pretty(&shown)
    }
}
