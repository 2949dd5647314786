//! LLM conversation domain.
//!
//! - [`entities::Message`] — a single message within a session

pub mod entities;
