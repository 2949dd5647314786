//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`] — available AI models (Gemini, GPT, custom)
//! - [`error::DomainError`] — domain-level errors

pub mod error;
pub mod model;
pub mod string;
