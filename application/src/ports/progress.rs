//! Progress notification port
//!
//! Defines the interface for reporting progress while a pipeline runs.

use health_crew_domain::{PipelineShape, RoleKind, StageKind};

/// Callback for progress updates during pipeline execution
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console progress bar, server logs, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called once before the first stage
    fn on_pipeline_start(&self, shape: &PipelineShape);

    /// Called when a stage starts; `index` is zero-based
    fn on_stage_start(&self, stage: StageKind, role: RoleKind, index: usize, total: usize);

    /// Called when a stage finishes, successfully or not
    fn on_stage_complete(&self, stage: StageKind, success: bool);

    /// Called before a tool runs on behalf of `role`
    fn on_tool_call(&self, _role: RoleKind, _tool_name: &str) {}

    /// Called before `from` hands a question to `to`
    fn on_delegation(&self, _from: RoleKind, _to: RoleKind) {}

    /// Called after the last stage
    fn on_pipeline_complete(&self, _success: bool) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_pipeline_start(&self, _shape: &PipelineShape) {}
    fn on_stage_start(&self, _stage: StageKind, _role: RoleKind, _index: usize, _total: usize) {}
    fn on_stage_complete(&self, _stage: StageKind, _success: bool) {}
}
