//! Tool domain module
//!
//! Tools give a role capabilities beyond text generation. Every tool is
//! described by a [`ToolDefinition`], invoked through a [`ToolCall`] and
//! answered with a [`ToolResult`].
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolSpec     │───▶│ ToolCall     │───▶│ ToolResult   │
//! │ (registry)   │    │ (invocation) │    │ (output)     │
//! └──────────────┘    └──────────────┘    └──────────────┘
//! ```
//!
//! Whether a role may call a tool at all is decided by its
//! [`Capability`](crate::consultation::role::Capability) set, not here.

pub mod entities;
pub mod value_objects;

pub use entities::{ToolCall, ToolDefinition, ToolParameter, ToolSpec};
pub use value_objects::{ToolError, ToolResult, ToolResultMetadata};
