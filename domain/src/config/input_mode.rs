//! How user-supplied fields reach the model

use serde::{Deserialize, Serialize};

/// Placement of the consultation fields in the prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Fields are interpolated into role goals and stage descriptions.
    #[default]
    Interpolate,
    /// Goals and descriptions refer to "the client"; the fields travel as a
    /// separate JSON data block that the role is told never to obey.
    Structured,
}

impl InputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputMode::Interpolate => "interpolate",
            InputMode::Structured => "structured",
        }
    }
}

impl std::str::FromStr for InputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "interpolate" => Ok(InputMode::Interpolate),
            "structured" => Ok(InputMode::Structured),
            other => Err(format!("unknown input mode '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_interpolate() {
        assert_eq!(InputMode::default(), InputMode::Interpolate);
    }

    #[test]
    fn test_parse() {
        assert_eq!("Structured".parse::<InputMode>(), Ok(InputMode::Structured));
        assert!("templated".parse::<InputMode>().is_err());
    }
}
