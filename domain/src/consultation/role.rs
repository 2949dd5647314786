//! Role configuration — one persona of the consultation crew

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The personas a consultation crew can be made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleKind {
    FitnessExpert,
    Nutritionist,
    Doctor,
    DiseaseExpert,
}

impl RoleKind {
    /// Human-readable role title, also used as the coworker name in delegation.
    pub fn title(&self) -> &'static str {
        match self {
            RoleKind::FitnessExpert => "Fitness Expert",
            RoleKind::Nutritionist => "Nutritionist",
            RoleKind::Doctor => "Doctor",
            RoleKind::DiseaseExpert => "Disease Expert",
        }
    }

    /// Resolve a coworker name as written by a model.
    ///
    /// Accepts the title in any case, with underscores or hyphens in place of
    /// spaces (`"disease_expert"`, `"Disease-Expert"`).
    pub fn from_title(name: &str) -> Option<Self> {
        let normalized = name.trim().to_lowercase().replace(['_', '-'], " ");
        [
            RoleKind::FitnessExpert,
            RoleKind::Nutritionist,
            RoleKind::Doctor,
            RoleKind::DiseaseExpert,
        ]
        .into_iter()
        .find(|kind| kind.title().to_lowercase() == normalized)
    }
}

impl std::fmt::Display for RoleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// External capabilities a role may be granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Query a web search engine
    WebSearch,
}

impl Capability {
    /// Name of the tool that backs this capability.
    pub fn tool_name(&self) -> &'static str {
        match self {
            Capability::WebSearch => "web_search",
        }
    }

    /// Find the capability that grants access to a tool.
    pub fn for_tool(tool_name: &str) -> Option<Self> {
        match tool_name {
            "web_search" => Some(Capability::WebSearch),
            _ => None,
        }
    }
}

/// A role of the crew (Entity, request-scoped)
///
/// The capability set and delegation flag are fixed when the role is built;
/// there is no API to change them afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleConfig {
    kind: RoleKind,
    goal: String,
    backstory: String,
    allow_delegation: bool,
    capabilities: BTreeSet<Capability>,
}

impl RoleConfig {
    pub fn new(kind: RoleKind, goal: impl Into<String>, backstory: impl Into<String>) -> Self {
        Self {
            kind,
            goal: goal.into(),
            backstory: backstory.into(),
            allow_delegation: false,
            capabilities: BTreeSet::new(),
        }
    }

    pub fn with_delegation(mut self, allow: bool) -> Self {
        self.allow_delegation = allow;
        self
    }

    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capabilities.insert(capability);
        self
    }

    pub fn kind(&self) -> RoleKind {
        self.kind
    }

    pub fn role(&self) -> &'static str {
        self.kind.title()
    }

    pub fn goal(&self) -> &str {
        &self.goal
    }

    pub fn backstory(&self) -> &str {
        &self.backstory
    }

    pub fn allow_delegation(&self) -> bool {
        self.allow_delegation
    }

    pub fn capabilities(&self) -> &BTreeSet<Capability> {
        &self.capabilities
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Whether this role may call the named tool.
    pub fn can_use_tool(&self, tool_name: &str) -> bool {
        Capability::for_tool(tool_name).is_some_and(|cap| self.has_capability(cap))
    }
}
