//! Output configuration from TOML (`[output]` section)
//!
//! ```toml
//! [output]
//! format = "full"     # text | full | json
//! color = false
//! show_progress = true
//! ```

use health_crew_domain::OutputFormat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Default output format when `-o` is not given
    pub format: Option<OutputFormat>,
    /// Enable colored terminal output
    pub color: bool,
    /// Show the stage progress bar
    pub show_progress: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
            show_progress: true,
        }
    }
}

impl FileOutputConfig {
    /// The command-line choice if any, then the configured one, then `text`.
    pub fn resolve_format(&self, cli: Option<OutputFormat>) -> OutputFormat {
        cli.or(self.format).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_deserialize() {
        let toml_str = r#"
[output]
format = "json"
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.output.format, Some(OutputFormat::Json));
        assert!(config.output.show_progress);
    }

    #[test]
    fn test_cli_format_wins() {
        let config = FileOutputConfig {
            format: Some(OutputFormat::Full),
            ..Default::default()
        };
        assert_eq!(config.resolve_format(Some(OutputFormat::Json)), OutputFormat::Json);
        assert_eq!(config.resolve_format(None), OutputFormat::Full);
        assert_eq!(
            FileOutputConfig::default().resolve_format(None),
            OutputFormat::Text
        );
    }
}
