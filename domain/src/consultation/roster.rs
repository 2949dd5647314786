//! Crew assembly — roles, stages and the disease branch
//!
//! ```text
//! request ──► base roles (Fitness Expert, Nutritionist, Doctor)
//!                 │
//!                 ├─ has_disease() ──► + Disease Expert
//!                 │                    [Fitness, Nutrition, Health, Disease Management]
//!                 │
//!                 └─ otherwise ──────► [Fitness, Nutrition, Health]
//! ```
//!
//! Each branch builds its own complete stage list; nothing is shared between
//! the two paths except the base roles.

use super::pipeline::Pipeline;
use super::request::ConsultationRequest;
use super::role::{Capability, RoleConfig, RoleKind};
use super::stage::{StageConfig, StageKind};
use crate::config::InputMode;
use crate::core::error::DomainError;
use crate::prompt::ConsultationPromptTemplate;

/// Builds the crew and pipeline for one request.
pub struct ConsultationRoster<'a> {
    request: &'a ConsultationRequest,
    template: ConsultationPromptTemplate<'a>,
}

impl<'a> ConsultationRoster<'a> {
    pub fn new(request: &'a ConsultationRequest, mode: InputMode) -> Self {
        Self {
            request,
            template: ConsultationPromptTemplate::new(request, mode),
        }
    }

    /// Fitness Expert, Nutritionist and Doctor, in that order.
    ///
    /// All three may delegate; only the Fitness Expert can search the web.
    pub fn base_roles(&self) -> Vec<RoleConfig> {
        let t = &self.template;
        vec![
            RoleConfig::new(RoleKind::FitnessExpert, t.fitness_goal(), t.fitness_backstory())
                .with_delegation(true)
                .with_capability(Capability::WebSearch),
            RoleConfig::new(
                RoleKind::Nutritionist,
                t.nutritionist_goal(),
                t.nutritionist_backstory(),
            )
            .with_delegation(true),
            RoleConfig::new(RoleKind::Doctor, t.doctor_goal(), t.doctor_backstory())
                .with_delegation(true),
        ]
    }

    pub fn disease_expert(&self) -> RoleConfig {
        let t = &self.template;
        RoleConfig::new(
            RoleKind::DiseaseExpert,
            t.disease_expert_goal(),
            t.disease_expert_backstory(),
        )
        .with_delegation(true)
    }

    fn stages_without_disease(&self) -> Vec<StageConfig> {
        let t = &self.template;
        vec![
            StageConfig::new(StageKind::Fitness, t.fitness_task(), RoleKind::FitnessExpert)
                .with_expected_output(ConsultationPromptTemplate::fitness_expected_output()),
            StageConfig::new(StageKind::Nutrition, t.nutrition_task(), RoleKind::Nutritionist)
                .with_expected_output(ConsultationPromptTemplate::nutrition_expected_output()),
            StageConfig::new(StageKind::Health, t.health_task(), RoleKind::Doctor)
                .with_expected_output(ConsultationPromptTemplate::health_expected_output()),
        ]
    }

    fn stages_with_disease(&self) -> Vec<StageConfig> {
        let t = &self.template;
        vec![
            StageConfig::new(
                StageKind::Fitness,
                t.fitness_task_with_disease(),
                RoleKind::FitnessExpert,
            )
            .with_expected_output(ConsultationPromptTemplate::fitness_expected_output()),
            StageConfig::new(
                StageKind::Nutrition,
                t.nutrition_task_with_disease(),
                RoleKind::Nutritionist,
            )
            .with_expected_output(ConsultationPromptTemplate::nutrition_expected_output()),
            StageConfig::new(StageKind::Health, t.health_task_with_disease(), RoleKind::Doctor)
                .with_expected_output(ConsultationPromptTemplate::health_expected_output()),
            StageConfig::new(
                StageKind::DiseaseManagement,
                t.disease_management_task(),
                RoleKind::DiseaseExpert,
            )
            .with_expected_output(
                ConsultationPromptTemplate::disease_management_expected_output(),
            ),
        ]
    }

    /// Assemble the pipeline, branching on the disease indicator.
    pub fn build(&self) -> Result<Pipeline, DomainError> {
        let mut roles = self.base_roles();

        let stages = if self.request.has_disease() {
            roles.push(self.disease_expert());
            self.stages_with_disease()
        } else {
            self.stages_without_disease()
        };

        let pipeline = Pipeline::new(roles, stages)?;
        Ok(match self.template.client_profile() {
            Some(profile) => pipeline.with_client_profile(profile),
            None => pipeline,
        })
    }
}

/// Suffix the executor output with the disease line when no disease branch ran.
///
/// The indicator is echoed exactly as entered (no lowercasing, no trimming).
pub fn finalize_report(request: &ConsultationRequest, output: String) -> String {
    if request.has_disease() {
        output
    } else {
        format!("{}\n disease: {}", output, request.disease_indicator)
    }
}
