//! Application layer for health-crew
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ExecutionParams;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    llm_gateway::{GatewayError, LlmGateway, LlmSession},
    pipeline_executor::{ExecutorError, PipelineExecutor},
    progress::{NoProgress, ProgressNotifier},
    tool_executor::{NoTools, ToolExecutorPort},
};
pub use use_cases::execute_pipeline::ExecutePipelineUseCase;
pub use use_cases::run_consultation::{RunConsultationError, RunConsultationUseCase};
