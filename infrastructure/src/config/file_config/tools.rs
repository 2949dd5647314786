//! Tools configuration from TOML (`[tools]` section)
//!
//! ```toml
//! [tools]
//! web_search = false   # hide web_search even when built with web-tools
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    /// Register the `web_search` tool (requires the `web-tools` feature)
    pub web_search: bool,
    /// Timeout for a single tool HTTP request
    pub timeout_secs: u64,
}

impl Default for FileToolsConfig {
    fn default() -> Self {
        Self {
            web_search: true,
            timeout_secs: 30,
        }
    }
}
