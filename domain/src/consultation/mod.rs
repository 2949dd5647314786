//! Consultation domain.
//!
//! - [`request::ConsultationRequest`] — the three free-text inputs
//! - [`role::RoleConfig`] — a persona with goal, backstory and capabilities
//! - [`stage::StageConfig`] — a task handed to one role
//! - [`pipeline::Pipeline`] — the ordered stages plus the crew
//! - [`roster::ConsultationRoster`] — builds the pipeline, branching on disease
//! - [`result::ConsultationResult`] — the final report

pub mod pipeline;
pub mod request;
pub mod result;
pub mod role;
pub mod roster;
pub mod stage;
