//! Model value object representing an LLM model

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Available LLM models (Value Object)
///
/// Every role of a consultation crew talks to the same model; the model is
/// part of the shared, read-only LLM configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    // Gemini models
    GeminiPro,
    Gemini15Pro,
    Gemini15Flash,
    Gemini20Flash,
    Gemini25Flash,
    Gemini25Pro,
    // GPT models
    Gpt4o,
    Gpt4oMini,
    Gpt41,
    Gpt41Mini,
    // Custom (e.g. local Ollama models behind an OpenAI-compatible endpoint)
    Custom(String),
}

impl Model {
    /// Get the string identifier for this model
    pub fn as_str(&self) -> &str {
        match self {
            Model::GeminiPro => "gemini-pro",
            Model::Gemini15Pro => "gemini-1.5-pro",
            Model::Gemini15Flash => "gemini-1.5-flash",
            Model::Gemini20Flash => "gemini-2.0-flash",
            Model::Gemini25Flash => "gemini-2.5-flash",
            Model::Gemini25Pro => "gemini-2.5-pro",
            Model::Gpt4o => "gpt-4o",
            Model::Gpt4oMini => "gpt-4o-mini",
            Model::Gpt41 => "gpt-4.1",
            Model::Gpt41Mini => "gpt-4.1-mini",
            Model::Custom(s) => s,
        }
    }

    /// Check if this is a Gemini model
    pub fn is_gemini(&self) -> bool {
        match self {
            Model::GeminiPro
            | Model::Gemini15Pro
            | Model::Gemini15Flash
            | Model::Gemini20Flash
            | Model::Gemini25Flash
            | Model::Gemini25Pro => true,
            Model::Custom(s) => s.starts_with("gemini-"),
            _ => false,
        }
    }

    /// Check if this is a GPT model
    pub fn is_gpt(&self) -> bool {
        matches!(
            self,
            Model::Gpt4o | Model::Gpt4oMini | Model::Gpt41 | Model::Gpt41Mini
        )
    }
}

impl Default for Model {
    /// Returns the default model (gemini-pro)
    fn default() -> Self {
        Model::GeminiPro
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "gemini-pro" => Model::GeminiPro,
            "gemini-1.5-pro" => Model::Gemini15Pro,
            "gemini-1.5-flash" => Model::Gemini15Flash,
            "gemini-2.0-flash" => Model::Gemini20Flash,
            "gemini-2.5-flash" => Model::Gemini25Flash,
            "gemini-2.5-pro" => Model::Gemini25Pro,
            "gpt-4o" => Model::Gpt4o,
            "gpt-4o-mini" => Model::Gpt4oMini,
            "gpt-4.1" => Model::Gpt41,
            "gpt-4.1-mini" => Model::Gpt41Mini,
            other => Model::Custom(other.to_string()),
        })
    }
}

impl From<&str> for Model {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(model) => model,
            Err(never) => match never {},
        }
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Model::from(s.as_str()))
    }
}
