//! Application use cases
//!
//! - [`run_consultation`] — builds the crew for a request and runs it
//! - [`execute_pipeline`] — the sequential executor behind it

pub mod execute_pipeline;
pub mod run_consultation;
