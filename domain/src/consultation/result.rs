//! Consultation result value object

use super::pipeline::PipelineShape;
use super::request::ConsultationRequest;
use crate::crew::output::StageOutput;
use serde::{Deserialize, Serialize};

/// The outcome of one consultation.
///
/// `report` is the text shown to the user: the executor's consolidated
/// output, suffixed with the disease line when no disease branch ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsultationResult {
    pub request: ConsultationRequest,
    pub disease_branch: bool,
    pub pipeline: PipelineShape,
    pub stages: Vec<StageOutput>,
    pub report: String,
}

impl ConsultationResult {
    pub fn as_str(&self) -> &str {
        &self.report
    }

    pub fn into_report(self) -> String {
        self.report
    }
}

impl std::fmt::Display for ConsultationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.report)
    }
}
