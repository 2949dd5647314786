//! Conversation transcript logging.
//!
//! [`JsonlConversationLogger`] implements the
//! [`ConversationLogger`](health_crew_application::ConversationLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlConversationLogger;
