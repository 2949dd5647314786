//! `web_search` tool: the DuckDuckGo Instant Answer API.
//!
//! Needs no API key. The API returns abstracts, instant answers, definitions
//! and related topics rather than a full result listing, which is enough for
//! a Fitness Expert looking up an exercise or a guideline.
//!
//! # Parameters
//!
//! | Name | Type | Required | Description |
//! |------|------|:---:|-------------|
//! | `query` | string | Yes | The search query |

use health_crew_domain::tool::{ToolCall, ToolDefinition, ToolError, ToolParameter, ToolResult};
use std::time::Instant;
use tracing::debug;

pub const WEB_SEARCH: &str = "web_search";

/// DuckDuckGo Instant Answer API endpoint.
pub const DDG_API_URL: &str = "https://api.duckduckgo.com/";

pub fn web_search_definition() -> ToolDefinition {
    ToolDefinition::new(
        WEB_SEARCH,
        "Search the web using DuckDuckGo. Returns instant answers, abstracts, and related topics.",
    )
    .with_parameter(ToolParameter::new("query", "The search query", true).with_type("string"))
}

/// Query `endpoint` (normally [`DDG_API_URL`]) and format the answer as markdown.
pub async fn execute_web_search(
    client: &reqwest::Client,
    endpoint: &str,
    call: &ToolCall,
) -> ToolResult {
    let start = Instant::now();

    let query = match call.require_string("query") {
        Ok(q) if !q.trim().is_empty() => q,
        Ok(_) => {
            return ToolResult::failure(
                WEB_SEARCH,
                ToolError::invalid_argument("query must not be empty"),
            );
        }
        Err(e) => return ToolResult::failure(WEB_SEARCH, ToolError::invalid_argument(e)),
    };

    debug!(query, "Running web search");

    let response = match client
        .get(endpoint)
        .query(&[
            ("q", query),
            ("format", "json"),
            ("no_html", "1"),
            ("skip_disambig", "1"),
        ])
        .header("User-Agent", concat!("health-crew/", env!("CARGO_PKG_VERSION")))
        .send()
        .await
    {
        Ok(r) => r,
        Err(e) if e.is_timeout() => {
            return ToolResult::failure(WEB_SEARCH, ToolError::timeout("web search"));
        }
        Err(e) => {
            return ToolResult::failure(
                WEB_SEARCH,
                ToolError::execution_failed(format!("Search request failed: {e}")),
            );
        }
    };

    if !response.status().is_success() {
        return ToolResult::failure(
            WEB_SEARCH,
            ToolError::execution_failed(format!(
                "Search API returned error: {}",
                response.status()
            )),
        );
    }

    // DuckDuckGo answers with `application/x-javascript`, so decode the text.
    let body: serde_json::Value = match response.text().await {
        Ok(text) => match serde_json::from_str(&text) {
            Ok(json) => json,
            Err(e) => {
                return ToolResult::failure(
                    WEB_SEARCH,
                    ToolError::execution_failed(format!("Failed to parse search results: {e}")),
                );
            }
        },
        Err(e) => {
            return ToolResult::failure(
                WEB_SEARCH,
                ToolError::execution_failed(format!("Failed to read search results: {e}")),
            );
        }
    };

    let (output, match_count) = format_search_results(query, &body);
    ToolResult::success(WEB_SEARCH, output)
        .with_duration(start.elapsed().as_millis() as u64)
        .with_match_count(match_count)
}

/// Render the populated sections of a DuckDuckGo answer, with the number of
/// entries found (summary, answer, definition, each topic, redirect).
fn format_search_results(query: &str, data: &serde_json::Value) -> (String, usize) {
    let mut sections: Vec<String> = Vec::new();
    let mut match_count = 0;

    sections.push(format!("## Search Results for: {}", query));

    // Abstract (main answer)
    if let Some(abstract_text) = data["AbstractText"].as_str()
        && !abstract_text.is_empty()
    {
        let source = data["AbstractSource"].as_str().unwrap_or("Unknown");
        let url = data["AbstractURL"].as_str().unwrap_or("");
        sections.push(format!(
            "### Summary ({})\n{}\nSource: {}",
            source, abstract_text, url
        ));
        match_count += 1;
    }

    // Answer (instant answer)
    if let Some(answer) = data["Answer"].as_str()
        && !answer.is_empty()
    {
        sections.push(format!("### Instant Answer\n{}", answer));
        match_count += 1;
    }

    // Definition
    if let Some(definition) = data["Definition"].as_str()
        && !definition.is_empty()
    {
        let source = data["DefinitionSource"].as_str().unwrap_or("Unknown");
        sections.push(format!("### Definition ({})\n{}", source, definition));
        match_count += 1;
    }

    // Related Topics
    if let Some(topics) = data["RelatedTopics"].as_array() {
        // Grouped topics nest their entries under "Topics"; flatten them.
        let topic_texts: Vec<String> = topics
            .iter()
            .flat_map(|t| match t["Topics"].as_array() {
                Some(group) => group.iter().collect::<Vec<_>>(),
                None => vec![t],
            })
            .filter_map(|t| {
                let text = t["Text"].as_str().filter(|text| !text.is_empty())?;
                let url = t["FirstURL"].as_str().unwrap_or("");
                Some(format!("- {text} ({url})"))
            })
            .take(10)
            .collect();

        match_count += topic_texts.len();
        if !topic_texts.is_empty() {
            sections.push(format!("### Related Topics\n{}", topic_texts.join("\n")));
        }
    }

    // Redirect (for !bang queries or similar)
    if let Some(redirect) = data["Redirect"].as_str()
        && !redirect.is_empty()
    {
        sections.push(format!("### Redirect\n{}", redirect));
        match_count += 1;
    }

    if match_count == 0 {
        sections.push(
            "No instant answer available. Try a shorter or more general query.".to_string(),
        );
    }

    (sections.join("\n\n"), match_count)
}
