//! Infrastructure layer for health-crew
//!
//! Adapters for the ports defined in the application layer: LLM providers,
//! the web search tool, the JSONL transcript, and configuration loading.

pub mod config;
pub mod logging;
pub mod providers;
pub mod tools;

// Re-export commonly used types
pub use config::{ConfigLoader, FileConfig};
pub use logging::JsonlConversationLogger;
pub use providers::{ProviderKind, ProviderSettings, build_gateway};
pub use tools::LocalToolExecutor;
