//! OpenAI-compatible provider (`/v1/chat/completions`)
//!
//! Works with api.openai.com and with local servers that speak the same
//! protocol, e.g. Ollama at `http://localhost:11434`.

mod gateway;
mod session;
pub(crate) mod types;

pub use gateway::OpenAiGateway;
pub use session::OpenAiSession;
