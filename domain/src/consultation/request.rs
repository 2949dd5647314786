//! Consultation request value object

use serde::{Deserialize, Serialize};

/// The literal that selects the disease branch (compared after lowercasing).
pub const DISEASE_YES: &str = "yes";

/// The three free-text inputs of a consultation (Value Object)
///
/// No field is validated or normalized: empty strings, odd casing and
/// surrounding whitespace are all kept exactly as entered, because the
/// disease line appended to the final report must echo the original text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsultationRequest {
    pub age: String,
    pub gender: String,
    #[serde(alias = "disease")]
    pub disease_indicator: String,
}

impl ConsultationRequest {
    pub fn new(
        age: impl Into<String>,
        gender: impl Into<String>,
        disease_indicator: impl Into<String>,
    ) -> Self {
        Self {
            age: age.into(),
            gender: gender.into(),
            disease_indicator: disease_indicator.into(),
        }
    }

    /// Whether the disease branch applies.
    ///
    /// The indicator is lowercased and compared to `"yes"`; it is not trimmed,
    /// so `"yes "` or `"y"` select the no-disease branch.
    pub fn has_disease(&self) -> bool {
        self.disease_indicator.to_lowercase() == DISEASE_YES
    }
}
