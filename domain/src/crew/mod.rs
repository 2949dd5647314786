//! Crew execution vocabulary.
//!
//! - [`directive`] — the tool and delegate blocks a role may write
//! - [`output`] — what a pipeline run hands back

pub mod directive;
pub mod output;

pub use directive::{Delegation, Directive, clean_final_answer, parse_directives};
pub use output::{PipelineOutput, StageOutput};
