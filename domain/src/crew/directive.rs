//! Directives a role can embed in its answer
//!
//! A role asks for a tool or a coworker with a fenced block:
//!
//! ````text
//! ```tool
//! {"tool": "web_search", "args": {"query": "..."}, "reasoning": "..."}
//! ```
//!
//! ```delegate
//! {"coworker": "Doctor", "task": "...", "context": "..."}
//! ```
//! ````
//!
//! An answer without any directive is the role's final answer. A block that
//! cannot be read (bad JSON, missing fields, no closing fence) is reported as
//! [`Directive::Invalid`] so the answer is never mistaken for a final one.

use crate::tool::ToolCall;
use serde::{Deserialize, Serialize};

/// A request embedded in a role's answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Directive {
    Tool(ToolCall),
    Delegate(Delegation),
    /// A block the role opened but did not write correctly
    Invalid(String),
}

/// A question handed to a coworker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegation {
    /// Role title as written by the model, e.g. "Disease Expert"
    pub coworker: String,
    pub task: String,
    #[serde(default)]
    pub context: String,
}

const FINAL_ANSWER_PREFIX: &str = "final answer:";

#[derive(Clone, Copy)]
enum Block {
    Tool,
    Delegate,
}

impl Block {
    fn as_str(self) -> &'static str {
        match self {
            Block::Tool => "tool",
            Block::Delegate => "delegate",
        }
    }
}

/// Extract every directive, in order of appearance.
///
/// Blocks that are not valid JSON, lack required fields or are never closed
/// come back as [`Directive::Invalid`].
pub fn parse_directives(response: &str) -> Vec<Directive> {
    let mut directives = Vec::new();
    let mut block: Option<Block> = None;
    let mut current_block = String::new();

    for line in response.lines() {
        let trimmed = line.trim();
        match block {
            None if trimmed == "```tool" => {
                block = Some(Block::Tool);
                current_block.clear();
            }
            None if trimmed == "```delegate" => {
                block = Some(Block::Delegate);
                current_block.clear();
            }
            Some(kind) if trimmed == "```" => {
                block = None;
                directives.push(parse_block(kind, &current_block));
            }
            Some(_) => {
                current_block.push_str(line);
                current_block.push('\n');
            }
            None => {}
        }
    }

    if let Some(kind) = block {
        directives.push(Directive::Invalid(format!(
            "The `{}` block was not closed with ```.",
            kind.as_str()
        )));
    }

    directives
}

fn parse_block(kind: Block, body: &str) -> Directive {
    let parsed = match serde_json::from_str::<serde_json::Value>(body) {
        Ok(parsed) => parsed,
        Err(e) => {
            return Directive::Invalid(format!(
                "The `{}` block is not valid JSON: {}",
                kind.as_str(),
                e
            ));
        }
    };
    match kind {
        Block::Tool => parse_tool_call(&parsed).map(Directive::Tool).unwrap_or_else(|| {
            Directive::Invalid("The `tool` block needs a \"tool\" field.".to_string())
        }),
        Block::Delegate => parse_delegation(&parsed)
            .map(Directive::Delegate)
            .unwrap_or_else(|| {
                Directive::Invalid(
                    "The `delegate` block needs \"coworker\" and \"task\" fields.".to_string(),
                )
            }),
    }
}

fn parse_tool_call(parsed: &serde_json::Value) -> Option<ToolCall> {
    let tool_name = parsed.get("tool").and_then(|v| v.as_str())?;
    let mut call = ToolCall::new(tool_name);

    if let Some(args) = parsed.get("args").and_then(|v| v.as_object()) {
        for (key, value) in args {
            call = call.with_arg(key, value.clone());
        }
    }

    if let Some(reasoning) = parsed.get("reasoning").and_then(|v| v.as_str()) {
        call = call.with_reasoning(reasoning);
    }

    Some(call)
}

fn parse_delegation(parsed: &serde_json::Value) -> Option<Delegation> {
    let coworker = parsed.get("coworker").and_then(|v| v.as_str())?;
    let task = parsed.get("task").and_then(|v| v.as_str())?;
    let context = parsed
        .get("context")
        .and_then(|v| v.as_str())
        .unwrap_or_default();

    Some(Delegation {
        coworker: coworker.to_string(),
        task: task.to_string(),
        context: context.to_string(),
    })
}

/// Trim an answer and drop a leading "Final Answer:" marker (any case).
pub fn clean_final_answer(response: &str) -> String {
    let trimmed = response.trim();
    match trimmed.get(..FINAL_ANSWER_PREFIX.len()) {
        Some(head) if head.eq_ignore_ascii_case(FINAL_ANSWER_PREFIX) => {
            trimmed[FINAL_ANSWER_PREFIX.len()..].trim().to_string()
        }
        _ => trimmed.to_string(),
    }
}
