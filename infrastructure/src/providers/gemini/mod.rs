//! Google Gemini provider (Generative Language REST API)

mod gateway;
mod session;
pub(crate) mod types;

pub use gateway::GeminiGateway;
pub use session::GeminiSession;
