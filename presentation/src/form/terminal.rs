//! Interactive terminal form (rustyline)

use super::{FORM_DESCRIPTION, FORM_TITLE, FieldPrompter, FormError, FormField};
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

/// Prompts for form fields on the terminal, one line per field.
///
/// Ctrl-C or Ctrl-D cancels the whole form.
pub struct TerminalForm {
    editor: DefaultEditor,
}

impl TerminalForm {
    pub fn new() -> Result<Self, FormError> {
        let editor = DefaultEditor::new().map_err(|e| FormError::Input(e.to_string()))?;
        Ok(Self { editor })
    }

    pub fn print_welcome(&self) {
        println!();
        println!("{}", FORM_TITLE.cyan().bold());
        println!("{}", FORM_DESCRIPTION.dimmed());
        println!();
    }
}

impl FieldPrompter for TerminalForm {
    fn ask(&mut self, field: &FormField) -> Result<String, FormError> {
        match self.editor.readline(&format!("{}: ", field.label)) {
            Ok(line) => Ok(line),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Err(FormError::Cancelled),
            Err(e) => Err(FormError::Input(e.to_string())),
        }
    }
}
