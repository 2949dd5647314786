//! Domain layer for health-crew
//!
//! This crate contains the consultation model, the crew vocabulary and the
//! prompt texts. It has no dependencies on infrastructure or presentation
//! concerns.
//!
//! # Core Concepts
//!
//! ## Consultation
//!
//! A [`ConsultationRequest`] (age, gender, disease indicator) is turned by
//! [`ConsultationRoster`] into a [`Pipeline`]: a crew of roles and an ordered
//! list of stages. A disease indicator of "yes" (any case) adds the Disease
//! Expert and a fourth stage.
//!
//! ## Crew
//!
//! While a stage runs, its role may write `tool` and `delegate`
//! [`Directive`]s. An answer without directives is the stage's final answer.

pub mod config;
pub mod consultation;
pub mod core;
pub mod crew;
pub mod prompt;
pub mod session;
pub mod tool;

pub use config::{
    InputMode, OutputFormat,
    validation::{ConfigIssue, ConfigIssueCode, Severity, has_errors},
};
pub use consultation::{
    pipeline::{Pipeline, PipelineShape, Process},
    request::{ConsultationRequest, DISEASE_YES},
    result::ConsultationResult,
    role::{Capability, RoleConfig, RoleKind},
    roster::{ConsultationRoster, finalize_report},
    stage::{StageConfig, StageKind},
};
pub use core::{error::DomainError, model::Model};
pub use crew::{Delegation, Directive, PipelineOutput, StageOutput, clean_final_answer, parse_directives};
pub use prompt::{ConsultationPromptTemplate, CrewPromptTemplate};
pub use session::entities::{Message, Role};
pub use tool::{ToolCall, ToolDefinition, ToolError, ToolParameter, ToolResult, ToolResultMetadata, ToolSpec};
