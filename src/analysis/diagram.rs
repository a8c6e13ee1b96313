//! Mermaid diagrams of a server's capabilities

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::analysis::{AnalysisResult, CapabilityKind};
use crate::core::{Error, Result};

/// Output format of the `diagram` command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagramFormat {
    /// Bare Mermaid graph description
    #[default]
    Mermaid,
    /// The Mermaid graph inside a fenced code block
    Markdown,
}

impl DiagramFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagramFormat::Mermaid => "mermaid",
            DiagramFormat::Markdown => "markdown",
        }
    }
}

impl fmt::Display for DiagramFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiagramFormat {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mermaid" | "mmd" => Ok(DiagramFormat::Mermaid),
            "markdown" | "md" => Ok(DiagramFormat::Markdown),
            "png" | "svg" => Err(Error::invalid_input(format!(
                "Image output '{s}' is not supported. Available: mermaid, markdown"
            ))),
            _ => Err(Error::invalid_input(format!(
                "Unknown diagram format: '{s}'. Available: mermaid, markdown"
            ))),
        }
    }
}

/// Render the capability graph of `analysis`.
///
/// Kinds without capabilities get no subgraph. Node order follows the
/// analysis order, so the output is deterministic.
pub fn render_diagram(analysis: &AnalysisResult, format: DiagramFormat) -> String {
    let graph = mermaid(analysis);
    match format {
        DiagramFormat::Mermaid => graph,
        DiagramFormat::Markdown => format!("```mermaid\n{graph}```\n"),
    }
}

fn mermaid(analysis: &AnalysisResult) -> String {
    let mut out = String::from("graph TD\n");
    let mut edges = Vec::new();

    out.push_str("    subgraph server_group[\"MCP Server\"]\n");
    out.push_str(&format!(
        "        server[\"{}<br/>({})\"]\n",
        escape(&analysis.project_name),
        analysis.language.display_name()
    ));

    for kind in CapabilityKind::all() {
        let capabilities = analysis.of_kind(*kind);
        if capabilities.is_empty() {
            continue;
        }
        out.push_str(&format!(
            "        subgraph {}_group[\"{}\"]\n",
            kind.as_str(),
            group_title(*kind)
        ));
        for (index, capability) in capabilities.iter().enumerate() {
            let id = format!("{}_{index}", kind.as_str());
            out.push_str(&format!("            {id}[\"{}\"]\n", escape(&capability.identifier)));
            edges.push(id);
        }
        out.push_str("        end\n");
    }

    for id in &edges {
        out.push_str(&format!("        server --> {id}\n"));
    }
    out.push_str("    end\n");
    out.push_str("    client([\"MCP Client\"]) <-->|MCP| server\n");
    out
}

/// Reject an `--output` file whose extension names an image format, since
/// diagrams are only ever written as text
pub fn check_output_path(path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);
    match extension.as_deref() {
        Some(ext @ ("png" | "svg" | "jpg" | "jpeg" | "gif" | "pdf")) => Err(Error::invalid_input(
            format!(
                "Image output '.{ext}' is not supported; diagrams are written as text (mermaid, markdown)"
            ),
        )),
        _ => Ok(()),
    }
}

fn group_title(kind: CapabilityKind) -> &'static str {
    match kind {
        CapabilityKind::Tool => "Tools",
        CapabilityKind::Resource => "Resources",
        CapabilityKind::Prompt => "Prompts",
    }
}

fn escape(label: &str) -> String {
    label.replace('"', "#quot;")
}
