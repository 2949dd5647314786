//! Values produced by running a pipeline

use crate::consultation::role::RoleKind;
use crate::consultation::stage::StageKind;
use serde::{Deserialize, Serialize};

/// The final answer of one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageOutput {
    pub stage: StageKind,
    pub role: RoleKind,
    pub output: String,
    /// Tool calls made while working on the stage
    #[serde(default)]
    pub tool_calls: usize,
    /// Coworkers consulted while working on the stage
    #[serde(default)]
    pub delegations: Vec<RoleKind>,
}

impl StageOutput {
    pub fn new(stage: StageKind, role: RoleKind, output: impl Into<String>) -> Self {
        Self {
            stage,
            role,
            output: output.into(),
            tool_calls: 0,
            delegations: Vec::new(),
        }
    }
}

/// Everything a pipeline run hands back.
///
/// `final_output` is the consolidated text: the answer of the last stage,
/// which has seen every earlier stage's answer as context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub final_output: String,
    pub stages: Vec<StageOutput>,
}

impl PipelineOutput {
    /// Build from completed stages; the last stage's answer is the final output.
    pub fn from_stages(stages: Vec<StageOutput>) -> Self {
        let final_output = stages
            .last()
            .map(|s| s.output.clone())
            .unwrap_or_default();
        Self {
            final_output,
            stages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_output_is_last_stage() {
        let output = PipelineOutput::from_stages(vec![
            StageOutput::new(StageKind::Fitness, RoleKind::FitnessExpert, "run"),
            StageOutput::new(StageKind::Health, RoleKind::Doctor, "sleep well"),
        ]);
        assert_eq!(output.final_output, "sleep well");
        assert_eq!(output.stages.len(), 2);
    }

    #[test]
    fn test_empty_run_has_empty_output() {
        assert_eq!(PipelineOutput::from_stages(vec![]).final_output, "");
    }
}
