//! Configuration validation issues.
//!
//! Loaders check a configuration and return every problem they find as a
//! [`ConfigIssue`]. Errors stop startup; warnings are logged and ignored.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// `llm.model` is empty.
    EmptyModel,
    /// `llm.provider` names no known provider.
    UnknownProvider,
    /// The model family does not match the selected provider.
    ModelProviderMismatch,
    /// `prompt.input_mode` is neither `interpolate` nor `structured`.
    UnknownInputMode,
    /// `llm.temperature` is outside 0.0 to 2.0.
    TemperatureOutOfRange,
    /// `execution.max_turns_per_stage` is zero.
    ZeroTurnBudget,
    /// `llm.timeout_secs` is zero.
    ZeroTimeout,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", level, self.message)
    }
}

/// True if any issue is fatal.
pub fn has_errors(issues: &[ConfigIssue]) -> bool {
    issues.iter().any(ConfigIssue::is_error)
}
