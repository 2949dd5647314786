//! Logging configuration from TOML (`[logging]` section)
//!
//! ```toml
//! [logging]
//! conversation_log = "~/.local/state/health-crew/conversations.jsonl"
//! log_dir = "~/.local/state/health-crew/logs"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL conversation transcript; disabled when unset
    pub conversation_log: Option<PathBuf>,
    /// Directory for daily-rolling operation logs; disabled when unset
    pub log_dir: Option<PathBuf>,
}

/// Expand a leading `~/` to the home directory.
pub fn expand_home(path: &std::path::Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}

impl FileLoggingConfig {
    pub fn conversation_log_path(&self) -> Option<PathBuf> {
        self.conversation_log.as_deref().map(expand_home)
    }

    pub fn log_dir_path(&self) -> Option<PathBuf> {
        self.log_dir.as_deref().map(expand_home)
    }
}
