//! Adding a capability to an existing project
//!
//! Generated capability files carry `mcp-scaffold:<kind>s` marker comments.
//! A new capability is rendered from the language's snippet and inserted
//! directly above its marker, with the marker's indentation.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tera::Tera;
use tokio::fs;
use tracing::info;

use crate::analysis::{CapabilityKind, locate_capability_source, read_project_name};
use crate::core::naming::to_snake;
use crate::core::{Error, NameForms, Result};
use crate::languages::{detect_language, registry};

/// A scheme, `://`, then anything that can sit inside a string literal of
/// every target language
static RESOURCE_URI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^[A-Za-z][A-Za-z0-9+.-]*://[^\s"'`\\{}\p{Cc}]*$"#)
        .expect("resource URI pattern must compile")
});

/// The capability that was written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddedCapability {
    pub kind: CapabilityKind,
    pub identifier: String,
    pub file: PathBuf,
}

/// Identifier, function name and URI for a requested capability
#[derive(Debug, Clone, PartialEq, Eq)]
struct Request {
    identifier: String,
    name: String,
    uri: String,
}

/// Insert a new `kind` named `name` into the project at `project`
pub async fn add_capability(
    project: &Path,
    kind: CapabilityKind,
    name: &str,
) -> Result<AddedCapability> {
    if !fs::try_exists(project).await? {
        return Err(Error::NotFound(project.to_path_buf()));
    }
    let language = detect_language(project)
        .await
        .ok_or_else(|| Error::LanguageNotDetected(project.to_path_buf()))?;
    let support = registry().get(language)?;
    let request = normalize(kind, name)?;

    let names = NameForms::new(&read_project_name(project, support.as_ref()).await);
    let source_path = locate_capability_source(project, support.as_ref(), &names)
        .await
        .ok_or_else(|| {
            let expected = support
                .capability_sources(&names)
                .into_iter()
                .next()
                .unwrap_or_default();
            Error::NotFound(project.join(expected))
        })?;
    let source = fs::read_to_string(&source_path).await?;

    if support.reserved_names(kind).contains(&request.name.as_str()) {
        return Err(Error::invalid_input(format!(
            "'{}' is reserved in {} projects; choose another {kind} name",
            request.name,
            support.language().display_name()
        )));
    }

    let shared = support.shared_namespace(kind);
    let existing = support.extractor().extract(&source);
    let clash = existing.iter().find(|c| {
        (c.kind == kind && c.identifier == request.identifier)
            || (shared.contains(&c.kind) && c.identifier == request.name)
    });
    if let Some(clash) = clash {
        return Err(Error::DuplicateCapability {
            kind: clash.kind.to_string(),
            identifier: clash.identifier.clone(),
        });
    }

    let mut insertions = vec![(marker(kind), support.snippet(kind))];
    insertions.extend(
        support
            .companion_snippets(kind)
            .iter()
            .map(|(marker, template)| (marker.to_string(), *template)),
    );

    let mut updated = source;
    for (marker, template) in insertions {
        let snippet = render_snippet(template, kind, &request)?;
        updated = insert_before_marker(&updated, &marker, support.comment_prefix(), &snippet)
            .ok_or_else(|| Error::MissingMarker {
                marker,
                path: source_path.clone(),
            })?;
    }
    fs::write(&source_path, updated).await?;

    info!(%kind, identifier = %request.identifier, file = %source_path.display(), "Capability added");
    Ok(AddedCapability {
        kind,
        identifier: request.identifier,
        file: source_path,
    })
}

/// Marker text for a kind, without the comment prefix
pub fn marker(kind: CapabilityKind) -> String {
    format!("mcp-scaffold:{kind}s")
}

fn normalize(kind: CapabilityKind, raw: &str) -> Result<Request> {
    let raw = raw.trim();
    if kind == CapabilityKind::Resource && raw.contains("://") {
        if !RESOURCE_URI.is_match(raw) {
            return Err(Error::invalid_input(format!(
                "Invalid resource URI: '{raw}'. Use <scheme>://<path> without quotes, backslashes, braces or whitespace"
            )));
        }
        let name = identifier_from_uri(raw);
        if name.is_empty() {
            return Err(Error::invalid_input(format!("Invalid resource URI: '{raw}'")));
        }
        return Ok(Request {
            identifier: raw.to_string(),
            name,
            uri: raw.to_string(),
        });
    }

    let name = to_snake(raw);
    let valid = name.starts_with(|c: char| c.is_ascii_alphabetic())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(Error::invalid_input(format!(
            "Invalid {kind} name: '{raw}'. Use letters, digits, dashes and underscores, starting with a letter"
        )));
    }

    Ok(match kind {
        CapabilityKind::Resource => Request {
            identifier: format!("{name}://default"),
            uri: format!("{name}://default"),
            name,
        },
        CapabilityKind::Tool | CapabilityKind::Prompt => Request {
            identifier: name.clone(),
            uri: String::new(),
            name,
        },
    })
}

/// Function-safe name for a resource URI, e.g. `data_items` for `data://items`
fn identifier_from_uri(uri: &str) -> String {
    let mut name = String::new();
    for c in uri.chars() {
        if c.is_ascii_alphanumeric() {
            name.push(c.to_ascii_lowercase());
        } else if !name.is_empty() && !name.ends_with('_') {
            name.push('_');
        }
    }
    let name = name.trim_end_matches('_').to_string();
    match name.chars().next() {
        Some(c) if c.is_ascii_digit() => format!("resource_{name}"),
        _ => name,
    }
}

fn render_snippet(template: &str, kind: CapabilityKind, request: &Request) -> Result<String> {
    let mut context = tera::Context::new();
    context.insert("name", &request.name);
    context.insert("uri", &request.uri);
    context.insert("description", &format!("The {} {kind}", request.name));
    Ok(Tera::one_off(template, &context, false)?)
}

/// `source` with `snippet` inserted above the first marker line, or `None`
/// when no line carries the marker
fn insert_before_marker(
    source: &str,
    marker: &str,
    comment_prefix: &str,
    snippet: &str,
) -> Option<String> {
    let marker_line = format!("{comment_prefix} {marker}");
    let mut out = String::with_capacity(source.len() + snippet.len());
    let mut inserted = false;

    for line in source.split_inclusive('\n') {
        if !inserted && line.trim() == marker_line {
            let indent: String = line.chars().take_while(|c| c.is_whitespace()).collect();
            for snippet_line in snippet.split_inclusive('\n') {
                if !snippet_line.trim().is_empty() {
                    out.push_str(&indent);
                }
                out.push_str(snippet_line);
            }
            if !snippet.ends_with('\n') {
                out.push('\n');
            }
            inserted = true;
        }
        out.push_str(line);
    }

    inserted.then_some(out)
}
