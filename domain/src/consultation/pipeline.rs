//! Pipeline — the ordered stages plus the crew that runs them

use super::role::{RoleConfig, RoleKind};
use super::stage::{StageConfig, StageKind};
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// How the stages of a pipeline are run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Process {
    /// One stage at a time, in order; each stage sees the outputs of the
    /// stages before it.
    #[default]
    Sequential,
}

/// Structural summary of a pipeline (stage order and crew membership).
///
/// Two pipelines built from the same request always have the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineShape {
    pub stages: Vec<StageKind>,
    pub roles: Vec<RoleKind>,
    pub process: Process,
}

/// An ordered, request-scoped sequence of stages (Entity)
///
/// Invariants checked at construction:
/// - at least one stage
/// - every role appears at most once in the crew
/// - every stage is assigned to a role of the crew
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    roles: Vec<RoleConfig>,
    stages: Vec<StageConfig>,
    process: Process,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    client_profile: Option<serde_json::Value>,
}

impl Pipeline {
    pub fn new(roles: Vec<RoleConfig>, stages: Vec<StageConfig>) -> Result<Self, DomainError> {
        if stages.is_empty() {
            return Err(DomainError::EmptyPipeline);
        }

        for (i, role) in roles.iter().enumerate() {
            if roles[..i].iter().any(|r| r.kind() == role.kind()) {
                return Err(DomainError::DuplicateRole(role.role().to_string()));
            }
        }

        if let Some(orphan) = stages
            .iter()
            .find(|s| !roles.iter().any(|r| r.kind() == s.assigned_role()))
        {
            return Err(DomainError::UnassignedRole {
                stage: orphan.kind().display_name().to_string(),
                role: orphan.assigned_role().title().to_string(),
            });
        }

        Ok(Self {
            roles,
            stages,
            process: Process::Sequential,
            client_profile: None,
        })
    }

    /// Attach client data that every role receives as a delimited data block
    /// instead of inside its instructions.
    pub fn with_client_profile(mut self, profile: serde_json::Value) -> Self {
        self.client_profile = Some(profile);
        self
    }

    pub fn client_profile(&self) -> Option<&serde_json::Value> {
        self.client_profile.as_ref()
    }

    pub fn roles(&self) -> &[RoleConfig] {
        &self.roles
    }

    pub fn stages(&self) -> &[StageConfig] {
        &self.stages
    }

    pub fn process(&self) -> Process {
        self.process
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Look up a crew member by kind.
    pub fn role(&self, kind: RoleKind) -> Option<&RoleConfig> {
        self.roles.iter().find(|r| r.kind() == kind)
    }

    pub fn has_role(&self, kind: RoleKind) -> bool {
        self.role(kind).is_some()
    }

    /// The role assigned to a stage.
    ///
    /// Always `Some` for stages of this pipeline (checked in [`Pipeline::new`]).
    pub fn role_for(&self, stage: &StageConfig) -> Option<&RoleConfig> {
        self.role(stage.assigned_role())
    }

    /// Every crew member except `kind` — the roles `kind` may delegate to.
    pub fn coworkers_of(&self, kind: RoleKind) -> impl Iterator<Item = &RoleConfig> {
        self.roles.iter().filter(move |r| r.kind() != kind)
    }

    pub fn shape(&self) -> PipelineShape {
        PipelineShape {
            stages: self.stages.iter().map(|s| s.kind()).collect(),
            roles: self.roles.iter().map(|r| r.kind()).collect(),
            process: self.process,
        }
    }
}
