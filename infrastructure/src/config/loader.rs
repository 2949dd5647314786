//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "health-crew";
const PROJECT_FILES: [&str; 2] = ["health-crew.toml", ".health-crew.toml"];
const ENV_PREFIX: &str = "HEALTH_CREW_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Explicit config path (if provided)
    /// 2. `HEALTH_CREW_*` environment variables (`__` separates sections)
    /// 3. Project root: `./health-crew.toml` or `./.health-crew.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/health-crew/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(config_path).extract().map_err(Box::new)
    }

    fn figment(config_path: Option<&PathBuf>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/health-crew/config.toml if set,
    /// otherwise the platform config directory.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Describe the config sources being used (for `--show-config`)
    pub fn describe_sources(config_path: Option<&Path>) -> Vec<String> {
        let mark = |found: bool| if found { "[FOUND]" } else { "[     ]" };
        let mut lines = vec!["Configuration sources (in priority order):".to_string()];

        if let Some(path) = config_path {
            lines.push(format!(
                "  {} Explicit: {}",
                mark(path.exists()),
                path.display()
            ));
        }

        let env_vars: Vec<String> = std::env::vars()
            .map(|(k, _)| k)
            .filter(|k| k.starts_with(ENV_PREFIX))
            .collect();
        if env_vars.is_empty() {
            lines.push(format!("  {} Env:     {}*", mark(false), ENV_PREFIX));
        } else {
            lines.push(format!("  {} Env:     {}", mark(true), env_vars.join(", ")));
        }

        match Self::project_config_path() {
            Some(path) => lines.push(format!("  {} Project: {}", mark(true), path.display())),
            None => lines.push(format!(
                "  {} Project: ./{} or ./{}",
                mark(false),
                PROJECT_FILES[0],
                PROJECT_FILES[1]
            )),
        }

        if let Some(path) = Self::global_config_path() {
            lines.push(format!(
                "  {} Global:  {}",
                mark(path.exists()),
                path.display()
            ));
        }

        lines.push(format!("  {} Default: built-in defaults", mark(true)));
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use health_crew_domain::{InputMode, Model};

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.llm.parse_model(), Model::GeminiPro);
        assert!(config.tools.web_search);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("health-crew"));
    }

    #[test]
    fn test_project_file_and_env_are_merged() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "health-crew.toml",
                r#"
[llm]
model = "gemini-1.5-pro"
temperature = 0.1

[prompt]
input_mode = "structured"
"#,
            )?;
            jail.set_env("HEALTH_CREW_LLM__TEMPERATURE", "0.9");

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.llm.parse_model(), Model::Gemini15Pro);
            assert_eq!(config.llm.temperature, 0.9);
            assert_eq!(config.prompt.parse_input_mode().0, InputMode::Structured);
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file_has_highest_priority() {
        Jail::expect_with(|jail| {
            jail.create_file(".health-crew.toml", "[server]\nport = 9000\n")?;
            jail.create_file("custom.toml", "[server]\nport = 9100\n")?;
            jail.set_env("HEALTH_CREW_SERVER__PORT", "9050");

            let path = PathBuf::from("custom.toml");
            let config = ConfigLoader::load(Some(&path)).map_err(|e| *e)?;
            assert_eq!(config.server.port, 9100);
            Ok(())
        });
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[llm\nmodel = ").unwrap();

        assert!(ConfigLoader::load(Some(&path)).is_err());
    }

    #[test]
    fn test_describe_sources_lists_explicit_path() {
        let lines = ConfigLoader::describe_sources(Some(Path::new("/nonexistent/crew.toml")));
        assert!(lines[1].contains("Explicit: /nonexistent/crew.toml"));
        assert!(lines.last().unwrap().contains("built-in defaults"));
    }
}
