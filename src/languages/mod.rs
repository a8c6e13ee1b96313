//! Per-language support for generation, analysis and validation
//!
//! Each target language implements [`LanguageSupport`] once and is registered
//! in the [`LanguageRegistry`]. Generators, the analyzer, the validator and
//! the `add` flow all dispatch through the registry instead of matching on
//! [`Language`] themselves.

pub mod go;
pub mod python;
pub mod registry;
pub mod rust;
pub mod typescript;

use std::path::PathBuf;

use crate::analysis::{CapabilityExtractor, CapabilityKind};
use crate::core::{Language, NameForms, Transport};

pub use registry::{LanguageRegistry, detect_language, registry};

/// One generated file: a tera template for its relative path and one for its body
#[derive(Debug, Clone, Copy)]
pub struct FileTemplate {
    pub path: &'static str,
    pub body: &'static str,
}

/// Everything mcp-scaffold knows about one target language
pub trait LanguageSupport: Send + Sync {
    fn language(&self) -> Language;

    /// Manifest whose presence identifies a project in this language
    fn manifest_file(&self) -> &'static str;

    /// Files emitted by the built-in generator
    fn files(&self) -> &'static [FileTemplate];

    /// Shell command that runs the generated server
    fn run_command(&self, names: &NameForms, transport: Transport) -> String;

    /// Shell command that installs the generated project's dependencies
    fn install_command(&self) -> &'static str;

    /// Candidate entry-point files, relative to the project root
    fn entry_points(&self, names: &NameForms) -> Vec<PathBuf>;

    /// Candidate files declaring capabilities, in lookup order
    fn capability_sources(&self, names: &NameForms) -> Vec<PathBuf>;

    /// Project name declared in the manifest text
    fn project_name(&self, manifest: &str) -> Option<String>;

    /// Problems with the manifest text: missing required fields or the
    /// missing MCP SDK dependency
    fn check_manifest(&self, manifest: &str) -> Vec<String>;

    fn extractor(&self) -> &dyn CapabilityExtractor;

    /// Line comment prefix, used for insertion markers
    fn comment_prefix(&self) -> &'static str {
        "//"
    }

    /// Tera template for a capability added to an existing project
    fn snippet(&self, kind: CapabilityKind) -> &'static str;

    /// Further code an added capability needs elsewhere in the same file, as
    /// (marker, tera template) pairs
    fn companion_snippets(&self, _kind: CapabilityKind) -> &'static [(&'static str, &'static str)] {
        &[]
    }

    /// Names an added capability may not use because the generated code
    /// already defines them or the language reserves them
    fn reserved_names(&self, _kind: CapabilityKind) -> &'static [&'static str] {
        &[]
    }

    /// Kinds whose added functions live in the same namespace as `kind`'s
    fn shared_namespace(&self, _kind: CapabilityKind) -> &'static [CapabilityKind] {
        &[]
    }
}

/// README shared by every language
pub const README_TEMPLATE: &str = r#"# {{ projectName }}

An MCP (Model Context Protocol) server written in {{ language_name }}, generated
with the `{{ pattern }}` pattern. It serves over `{{ transport }}`.

## Capabilities

### Tools
{% for tool in tools %}
- `{{ tool.name }}`: {{ tool.description }}
{%- endfor %}

### Resources
{% for resource in resources %}
- `{{ resource.uri }}`: {{ resource.description }}
{%- endfor %}
{%- if prompts %}

### Prompts
{% for prompt in prompts %}
- `{{ prompt.name }}`: {{ prompt.description }}
{%- endfor %}
{%- endif %}

## Getting started

```sh
{{ install_command }}
{{ run_command }}
```
{%- if auth %}

## Authentication

Set `MCP_AUTH_ENABLED=true` and `MCP_AUTH_TOKEN=<secret>` to require
`Authorization: Bearer <secret>` on every request. Authentication only applies
to network transports.
{%- endif %}

## Adding capabilities

```sh
mcp-scaffold add tool my_tool
mcp-scaffold add resource data://items
mcp-scaffold add prompt summarize
```
"#;
