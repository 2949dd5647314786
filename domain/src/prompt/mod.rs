//! Prompt domain
//!
//! - [`ConsultationPromptTemplate`] — goals, backstories and tasks rendered
//!   from a consultation request
//! - [`CrewPromptTemplate`] — system and turn prompts used while a stage runs

mod consultation;
mod crew;

pub use consultation::ConsultationPromptTemplate;
pub use crew::CrewPromptTemplate;
