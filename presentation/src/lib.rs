//! Presentation layer for health-crew
//!
//! This crate contains CLI definitions, the terminal form, output formatters,
//! progress reporters, and the web form server.

pub mod cli;
pub mod form;
pub mod output;
pub mod progress;
pub mod web;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, ConsultArgs, OutputArg, ServeArgs};
pub use form::{FieldPrompter, FormError, PartialRequest, TerminalForm, fill_request};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
pub use web::{AppState, create_router, serve};
