//! Web tools (`web-tools` feature)
//!
//! | Tool | Description | Key Dependency |
//! |------|-------------|----------------|
//! | `web_search` | DuckDuckGo Instant Answer API | `reqwest` |

mod search;

pub use search::{DDG_API_URL, WEB_SEARCH, execute_web_search, web_search_definition};
