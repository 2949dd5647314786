//! Tool implementations available to the crew
//!
//! Only one tool exists today: `web_search`, compiled in with the
//! `web-tools` feature and registered unless `[tools] web_search = false`.

mod executor;
#[cfg(feature = "web-tools")]
pub mod web;

pub use executor::LocalToolExecutor;

use crate::config::FileToolsConfig;
use health_crew_domain::tool::ToolSpec;

/// Tool specification for the given `[tools]` settings.
pub fn tool_spec(config: &FileToolsConfig) -> ToolSpec {
    let spec = ToolSpec::new();
    #[cfg(feature = "web-tools")]
    let spec = if config.web_search {
        spec.register(web::web_search_definition())
    } else {
        spec
    };
    #[cfg(not(feature = "web-tools"))]
    let _ = config;
    spec
}
