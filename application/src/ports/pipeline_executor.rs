//! Pipeline Executor port
//!
//! The consultation use case hands a finished [`Pipeline`] to an executor and
//! waits for one consolidated text.

use super::llm_gateway::GatewayError;
use super::progress::ProgressNotifier;
use async_trait::async_trait;
use health_crew_domain::{Pipeline, PipelineOutput, RoleKind, StageKind};
use thiserror::Error;

/// Errors that abort a pipeline run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutorError {
    #[error("{stage} stage ({role}) failed: {source}")]
    Gateway {
        stage: StageKind,
        role: RoleKind,
        #[source]
        source: GatewayError,
    },

    #[error("{stage} stage has no assigned role in the crew")]
    MissingRole { stage: StageKind },
}

impl ExecutorError {
    /// The gateway failure behind this error, if any.
    pub fn gateway_error(&self) -> Option<&GatewayError> {
        match self {
            ExecutorError::Gateway { source, .. } => Some(source),
            ExecutorError::MissingRole { .. } => None,
        }
    }
}

/// Runs every stage of a pipeline in order.
#[async_trait]
pub trait PipelineExecutor: Send + Sync {
    async fn kickoff(
        &self,
        pipeline: &Pipeline,
        progress: &dyn ProgressNotifier,
    ) -> Result<PipelineOutput, ExecutorError>;
}
