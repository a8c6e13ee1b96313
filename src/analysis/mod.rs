//! Static analysis of MCP server projects
//!
//! Analysis is surface-level: each language declares a handful of regular
//! expressions matching the conventional way its SDK registers tools,
//! resources and prompts. No source is parsed into a syntax tree.

pub mod analyzer;
pub mod diagram;
pub mod extract;
pub mod validator;

use serde::Serialize;
use std::fmt;

use crate::core::Language;

pub use analyzer::{analyze, analyze_project, locate_capability_source, read_project_name};
pub use diagram::{DiagramFormat, check_output_path, render_diagram};
pub use extract::{CapabilityExtractor, PatternExtractor};
pub use validator::{ValidationResult, validate, validate_project};

/// What a server declares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityKind {
    Tool,
    Resource,
    Prompt,
}

impl CapabilityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CapabilityKind::Tool => "tool",
            CapabilityKind::Resource => "resource",
            CapabilityKind::Prompt => "prompt",
        }
    }

    pub fn all() -> &'static [CapabilityKind] {
        &[
            CapabilityKind::Tool,
            CapabilityKind::Resource,
            CapabilityKind::Prompt,
        ]
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CapabilityKind {
    type Err = crate::core::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tool" => Ok(CapabilityKind::Tool),
            "resource" => Ok(CapabilityKind::Resource),
            "prompt" => Ok(CapabilityKind::Prompt),
            _ => Err(crate::core::Error::invalid_input(format!(
                "Unknown capability kind: '{s}'. Available: tool, resource, prompt"
            ))),
        }
    }
}

/// A tool, resource or prompt found in source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Capability {
    pub kind: CapabilityKind,
    pub identifier: String,
}

impl Capability {
    pub fn new(kind: CapabilityKind, identifier: impl Into<String>) -> Self {
        Self {
            kind,
            identifier: identifier.into(),
        }
    }
}

/// Capabilities declared by one project, in discovery order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub project_name: String,
    pub language: Language,
    pub tools: Vec<Capability>,
    pub resources: Vec<Capability>,
    pub prompts: Vec<Capability>,
}

impl AnalysisResult {
    pub fn empty(project_name: impl Into<String>, language: Language) -> Self {
        Self {
            project_name: project_name.into(),
            language,
            tools: Vec::new(),
            resources: Vec::new(),
            prompts: Vec::new(),
        }
    }

    /// Sort a flat capability list into the per-kind lists, keeping order
    pub fn from_capabilities(
        project_name: impl Into<String>,
        language: Language,
        capabilities: Vec<Capability>,
    ) -> Self {
        let mut result = Self::empty(project_name, language);
        for capability in capabilities {
            result.push(capability);
        }
        result
    }

    pub fn push(&mut self, capability: Capability) {
        match capability.kind {
            CapabilityKind::Tool => self.tools.push(capability),
            CapabilityKind::Resource => self.resources.push(capability),
            CapabilityKind::Prompt => self.prompts.push(capability),
        }
    }

    pub fn of_kind(&self, kind: CapabilityKind) -> &[Capability] {
        match kind {
            CapabilityKind::Tool => &self.tools,
            CapabilityKind::Resource => &self.resources,
            CapabilityKind::Prompt => &self.prompts,
        }
    }

    /// Identifiers of one kind, in discovery order
    pub fn identifiers(&self, kind: CapabilityKind) -> Vec<&str> {
        self.of_kind(kind)
            .iter()
            .map(|c| c.identifier.as_str())
            .collect()
    }

    pub fn contains(&self, kind: CapabilityKind, identifier: &str) -> bool {
        self.of_kind(kind).iter().any(|c| c.identifier == identifier)
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty() && self.resources.is_empty() && self.prompts.is_empty()
    }
}
