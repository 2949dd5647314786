//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Pipeline has no stages")]
    EmptyPipeline,

    #[error("Stage '{stage}' is assigned to role '{role}' which is not part of the crew")]
    UnassignedRole { stage: String, role: String },

    #[error("Role '{0}' appears more than once in the crew")]
    DuplicateRole(String),

    #[error("Invalid model: {0}")]
    InvalidModel(String),
}
