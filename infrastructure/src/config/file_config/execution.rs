//! Execution configuration from TOML (`[execution]` section)

use health_crew_application::ExecutionParams;
use health_crew_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutionConfig {
    /// Model turns per stage before a final answer is forced
    pub max_turns_per_stage: usize,
    /// Tool output beyond this many bytes is truncated
    pub max_observation_chars: usize,
}

impl Default for FileExecutionConfig {
    fn default() -> Self {
        let params = ExecutionParams::default();
        Self {
            max_turns_per_stage: params.max_turns_per_stage,
            max_observation_chars: params.max_observation_chars,
        }
    }
}

impl FileExecutionConfig {
    pub fn to_params(&self) -> ExecutionParams {
        ExecutionParams::default()
            .with_max_turns_per_stage(self.max_turns_per_stage)
            .with_max_observation_chars(self.max_observation_chars)
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        if self.max_turns_per_stage == 0 {
            vec![ConfigIssue::error(
                ConfigIssueCode::ZeroTurnBudget,
                "execution.max_turns_per_stage cannot be 0",
            )]
        } else {
            vec![]
        }
    }
}
