//! Consultation form
//!
//! The three free-text fields of a consultation, filled from CLI flags and,
//! for whatever is missing, from an interactive prompt.

mod terminal;

pub use terminal::TerminalForm;

use health_crew_domain::ConsultationRequest;
use thiserror::Error;

/// A field of the consultation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
}

pub const AGE: FormField = FormField {
    name: "age",
    label: "Age",
};
pub const GENDER: FormField = FormField {
    name: "gender",
    label: "Gender",
};
pub const DISEASE: FormField = FormField {
    name: "disease",
    label: "Disease (yes, or 'no' if there is no disease)",
};

pub const FORM_TITLE: &str = "Health, Nutrition and Fitness Analysis";
pub const FORM_DESCRIPTION: &str = "Enter age, gender, and disease (or 'no' if there is no \
     disease) to analyze fitness, nutrition, and health strategies.";

#[derive(Error, Debug)]
pub enum FormError {
    #[error("form cancelled")]
    Cancelled,

    #[error("terminal input failed: {0}")]
    Input(String),
}

/// Source of answers for missing fields.
pub trait FieldPrompter {
    /// Ask for one field. The answer is returned exactly as typed.
    fn ask(&mut self, field: &FormField) -> Result<String, FormError>;
}

/// Field values given up front (e.g. as CLI flags).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialRequest {
    pub age: Option<String>,
    pub gender: Option<String>,
    pub disease: Option<String>,
}

impl PartialRequest {
    pub fn is_complete(&self) -> bool {
        self.age.is_some() && self.gender.is_some() && self.disease.is_some()
    }

    /// The request, if every field was given; otherwise `self` back.
    pub fn into_complete(self) -> Result<ConsultationRequest, Self> {
        match self {
            PartialRequest {
                age: Some(age),
                gender: Some(gender),
                disease: Some(disease),
            } => Ok(ConsultationRequest::new(age, gender, disease)),
            partial => Err(partial),
        }
    }
}

/// Complete a request, asking `prompter` only for the fields not given.
///
/// Empty answers are valid values; nothing is trimmed or validated.
pub fn fill_request(
    partial: PartialRequest,
    prompter: &mut dyn FieldPrompter,
) -> Result<ConsultationRequest, FormError> {
    let mut resolve = |given: Option<String>, field: &FormField| match given {
        Some(value) => Ok(value),
        None => prompter.ask(field),
    };

    let age = resolve(partial.age, &AGE)?;
    let gender = resolve(partial.gender, &GENDER)?;
    let disease = resolve(partial.disease, &DISEASE)?;
    Ok(ConsultationRequest::new(age, gender, disease))
}
