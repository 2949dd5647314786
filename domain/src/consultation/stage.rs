//! Stage configuration — one unit of work in the pipeline

use super::role::RoleKind;
use serde::{Deserialize, Serialize};

/// The kinds of stage a consultation pipeline is built from, in run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Fitness,
    Nutrition,
    Health,
    DiseaseManagement,
}

impl StageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageKind::Fitness => "fitness",
            StageKind::Nutrition => "nutrition",
            StageKind::Health => "health",
            StageKind::DiseaseManagement => "disease_management",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            StageKind::Fitness => "Fitness",
            StageKind::Nutrition => "Nutrition",
            StageKind::Health => "Health",
            StageKind::DiseaseManagement => "Disease Management",
        }
    }
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A stage of the pipeline: a task description handed to one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageConfig {
    kind: StageKind,
    description: String,
    expected_output: String,
    assigned_role: RoleKind,
}

impl StageConfig {
    pub fn new(kind: StageKind, description: impl Into<String>, assigned_role: RoleKind) -> Self {
        Self {
            kind,
            description: description.into(),
            expected_output: String::new(),
            assigned_role,
        }
    }

    pub fn with_expected_output(mut self, expected_output: impl Into<String>) -> Self {
        self.expected_output = expected_output.into();
        self
    }

    pub fn kind(&self) -> StageKind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// What the assigned role should hand back (empty when unspecified).
    pub fn expected_output(&self) -> &str {
        &self.expected_output
    }

    pub fn assigned_role(&self) -> RoleKind {
        self.assigned_role
    }
}
