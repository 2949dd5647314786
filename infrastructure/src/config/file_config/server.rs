//! Web form server configuration from TOML (`[server]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 7860,
        }
    }
}

impl FileServerConfig {
    /// `bind:port`, e.g. `127.0.0.1:7860`
    pub fn address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}
