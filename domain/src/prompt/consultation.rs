//! Goal, backstory and task templates for the consultation crew

use crate::config::InputMode;
use crate::consultation::request::ConsultationRequest;

/// Renders the role and stage texts for one request.
///
/// In [`InputMode::Interpolate`] the request fields are written straight into
/// the text. In [`InputMode::Structured`] the text only refers to "the
/// client" and the fields are carried by [`client_profile`](Self::client_profile).
pub struct ConsultationPromptTemplate<'a> {
    request: &'a ConsultationRequest,
    mode: InputMode,
}

impl<'a> ConsultationPromptTemplate<'a> {
    pub fn new(request: &'a ConsultationRequest, mode: InputMode) -> Self {
        Self { request, mode }
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// "a 45-year-old male"
    fn subject(&self) -> String {
        match self.mode {
            InputMode::Interpolate => {
                format!("a {}-year-old {}", self.request.age, self.request.gender)
            }
            InputMode::Structured => "the client described in the client profile".to_string(),
        }
    }

    /// "a 45-year-old male with no"
    fn subject_with_condition(&self) -> String {
        match self.mode {
            InputMode::Interpolate => format!(
                "a {}-year-old {} with {}",
                self.request.age, self.request.gender, self.request.disease_indicator
            ),
            InputMode::Structured => {
                "the client described in the client profile, including their disease status"
                    .to_string()
            }
        }
    }

    fn condition(&self) -> String {
        match self.mode {
            InputMode::Interpolate => self.request.disease_indicator.clone(),
            InputMode::Structured => "the client's condition".to_string(),
        }
    }

    fn age_group(&self) -> String {
        match self.mode {
            InputMode::Interpolate => format!("{} years old", self.request.age),
            InputMode::Structured => "the client's age".to_string(),
        }
    }

    // ==================== Roles ====================

    pub fn fitness_goal(&self) -> String {
        format!(
            "Analyze the fitness requirements for {} and suggest exercise routines and fitness strategies",
            self.subject_with_condition()
        )
    }

    pub fn fitness_backstory(&self) -> String {
        "Expert at understanding fitness needs, age-specific requirements, and gender-specific \
         considerations. Skilled in developing customized exercise routines and fitness strategies."
            .to_string()
    }

    pub fn nutritionist_goal(&self) -> String {
        format!(
            "Assess nutritional requirements for {} and provide dietary recommendations",
            self.subject_with_condition()
        )
    }

    pub fn nutritionist_backstory(&self) -> String {
        format!(
            "Knowledgeable in nutrition for different age groups and genders, especially for \
             individuals of {}. Provides tailored dietary advice based on specific nutritional needs.",
            self.age_group()
        )
    }

    pub fn doctor_goal(&self) -> String {
        format!(
            "Evaluate the overall health considerations for {} and provide recommendations for a \
             healthy lifestyle. Pass it on to the Disease Expert if you are not an expert of {}",
            self.subject_with_condition(),
            self.condition()
        )
    }

    pub fn doctor_backstory(&self) -> String {
        "Medical professional experienced in assessing overall health and well-being. Offers \
         recommendations for a healthy lifestyle considering age, gender, and disease factors."
            .to_string()
    }

    pub fn disease_expert_goal(&self) -> String {
        format!("Provide recommendations for managing {}", self.condition())
    }

    pub fn disease_expert_backstory(&self) -> String {
        format!(
            "Specialized in dealing with individuals having {}. Offers tailored advice for managing \
             the specific health condition. Do not prescribe medicines but only give advice.",
            self.condition()
        )
    }

    // ==================== Stages without a disease ====================

    pub fn fitness_task(&self) -> String {
        format!(
            "Analyze the fitness requirements for {}. Provide recommendations for exercise \
             routines and fitness strategies.",
            self.subject()
        )
    }

    pub fn nutrition_task(&self) -> String {
        format!(
            "Assess nutritional requirements for {}. Provide dietary recommendations based on \
             specific nutritional needs. Do not prescribe a medicine",
            self.subject()
        )
    }

    pub fn health_task(&self) -> String {
        format!(
            "Evaluate overall health considerations for {}. Provide recommendations for a \
             healthy lifestyle.",
            self.subject()
        )
    }

    // ==================== Stages with a disease ====================

    pub fn fitness_task_with_disease(&self) -> String {
        format!(
            "Analyze the fitness requirements for {} who is living with a disease. Provide \
             recommendations for exercise routines and fitness strategies that are safe for \
             the condition.",
            self.subject()
        )
    }

    pub fn nutrition_task_with_disease(&self) -> String {
        format!(
            "Assess nutritional requirements for {} who is living with a disease. Provide \
             dietary recommendations that support managing the condition.",
            self.subject()
        )
    }

    pub fn health_task_with_disease(&self) -> String {
        format!(
            "Evaluate overall health considerations for {} who is living with a disease. \
             Provide recommendations for a healthy lifestyle and hand disease-specific \
             questions to the Disease Expert.",
            self.subject()
        )
    }

    /// Templated with the disease indicator only, never with age or gender.
    pub fn disease_management_task(&self) -> String {
        format!("Provide recommendations for managing {}", self.condition())
    }

    // ==================== Expected outputs ====================

    pub fn fitness_expected_output() -> &'static str {
        "A set of exercise routines and fitness strategies with frequency and intensity."
    }

    pub fn nutrition_expected_output() -> &'static str {
        "Dietary recommendations with example meals and nutrients to focus on."
    }

    pub fn health_expected_output() -> &'static str {
        "Healthy lifestyle recommendations covering sleep, stress, check-ups and habits."
    }

    pub fn disease_management_expected_output() -> &'static str {
        "Practical advice for managing the condition day to day, without prescribing medicines."
    }

    // ==================== Structured data ====================

    /// The client profile as a JSON object, or `None` in interpolate mode.
    pub fn client_profile(&self) -> Option<serde_json::Value> {
        match self.mode {
            InputMode::Interpolate => None,
            InputMode::Structured => Some(serde_json::json!({
                "age": self.request.age,
                "gender": self.request.gender,
                "disease": self.request.disease_indicator,
            })),
        }
    }
}
