//! Application-level configuration.
//!
//! - [`ExecutionParams`] — stage loop control (turn budget, observation size)

pub mod execution_params;

pub use execution_params::ExecutionParams;
