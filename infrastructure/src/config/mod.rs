//! Configuration file loading for health-crew
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. `HEALTH_CREW_*` environment variables
//! 3. Project root: `./health-crew.toml` or `./.health-crew.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/health-crew/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileConfig, FileExecutionConfig, FileGeminiConfig, FileLlmConfig, FileLoggingConfig,
    FileOpenAiConfig, FileOutputConfig, FilePromptConfig, FileProvidersConfig, FileServerConfig,
    FileToolsConfig, expand_home,
};
pub use loader::ConfigLoader;
