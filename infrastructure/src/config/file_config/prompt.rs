//! Prompt configuration from TOML (`[prompt]` section)
//!
//! ```toml
//! [prompt]
//! # "interpolate" writes the form fields into the prompts;
//! # "structured" sends them as a separate data block.
//! input_mode = "structured"
//! ```

use health_crew_domain::{ConfigIssue, ConfigIssueCode, InputMode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePromptConfig {
    pub input_mode: String,
}

impl Default for FilePromptConfig {
    fn default() -> Self {
        Self {
            input_mode: InputMode::default().as_str().to_string(),
        }
    }
}

impl FilePromptConfig {
    /// Parse the input mode, falling back to the default on unknown values.
    pub fn parse_input_mode(&self) -> (InputMode, Vec<ConfigIssue>) {
        match self.input_mode.parse::<InputMode>() {
            Ok(mode) => (mode, vec![]),
            Err(e) => (
                InputMode::default(),
                vec![ConfigIssue::error(
                    ConfigIssueCode::UnknownInputMode,
                    format!("prompt.input_mode: {} (valid: interpolate, structured)", e),
                )],
            ),
        }
    }
}
