//! Configuration value objects for the domain layer
//!
//! These are domain concepts related to configuration that are
//! used across multiple layers.

mod input_mode;
mod output_format;
pub mod validation;

pub use input_mode::InputMode;
pub use output_format::OutputFormat;
