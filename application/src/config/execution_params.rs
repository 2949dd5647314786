//! Execution parameters — stage loop control.
//!
//! [`ExecutionParams`] groups the static parameters that control the
//! turn loop in [`ExecutePipelineUseCase`](crate::use_cases::execute_pipeline::ExecutePipelineUseCase).
//! These are application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};

/// Stage loop control parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Maximum model turns per stage before a final answer is forced.
    ///
    /// A delegated coworker run gets the same budget.
    pub max_turns_per_stage: usize,
    /// Tool output longer than this is truncated before it reaches the model.
    pub max_observation_chars: usize,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            max_turns_per_stage: 5,
            max_observation_chars: 6000,
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_max_turns_per_stage(mut self, max: usize) -> Self {
        self.max_turns_per_stage = max;
        self
    }

    pub fn with_max_observation_chars(mut self, max: usize) -> Self {
        self.max_observation_chars = max;
        self
    }
}
