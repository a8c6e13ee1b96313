//! Python servers built on the official `mcp` package (FastMCP)

use once_cell::sync::Lazy;
use std::path::PathBuf;

use crate::analysis::{CapabilityExtractor, CapabilityKind, PatternExtractor};
use crate::core::{Language, NameForms, Transport};
use crate::languages::{FileTemplate, LanguageSupport, README_TEMPLATE};

static EXTRACTOR: Lazy<PatternExtractor> = Lazy::new(|| {
    PatternExtractor::new(&[
        (
            CapabilityKind::Tool,
            r"@\w+\.tool\([^)]*\)\s*(?:async\s+)?def\s+(\w+)",
        ),
        (
            CapabilityKind::Resource,
            r#"@\w+\.resource\(\s*["']([^"']+)["']"#,
        ),
        (
            CapabilityKind::Prompt,
            r"@\w+\.prompt\([^)]*\)\s*(?:async\s+)?def\s+(\w+)",
        ),
    ])
});

const PYPROJECT: &str = r#"[project]
name = "{{ projectName }}"
version = "0.1.0"
description = "{{ projectNamePascal }} MCP server"
readme = "README.md"
requires-python = ">=3.10"
dependencies = [
    "mcp[cli]>=1.9.0",
]

[project.scripts]
{{ projectNameKebab }} = "{{ projectNameSnake }}.__main__:main"

[build-system]
requires = ["hatchling"]
build-backend = "hatchling.build"

[tool.hatch.build.targets.wheel]
packages = ["{{ projectNameSnake }}"]
"#;

const INIT: &str = r#""""{{ projectNamePascal }} MCP server."""

__version__ = "0.1.0"
"#;

const MAIN: &str = r#""""Entry point for `python -m {{ projectNameSnake }}`."""

from {{ projectNameSnake }}.server import main

if __name__ == "__main__":
    main()
"#;

const SERVER: &str = r#""""{{ projectNamePascal }} MCP server."""

import json
{%- if lifecycle %}
import logging
import os
from collections.abc import AsyncIterator
from contextlib import asynccontextmanager
from datetime import datetime, timezone
{%- endif %}

from mcp.server.fastmcp import FastMCP
{%- if lifecycle %}

logger = logging.getLogger("{{ projectNameSnake }}")

AUTH_ENABLED = os.environ.get("MCP_AUTH_ENABLED", "false").lower() == "true"
STARTED_AT = datetime.now(timezone.utc)


@asynccontextmanager
async def lifespan(server: FastMCP) -> AsyncIterator[dict]:
    """Startup and shutdown hooks around the server."""
    logger.info("Starting %s", server.name)
    try:
        yield {"started_at": STARTED_AT}
    finally:
        logger.info("Shutting down %s", server.name)


def auth_options() -> dict:
    """Bearer-token verification, switched on by MCP_AUTH_ENABLED=true."""
    if not AUTH_ENABLED:
        return {}

    from mcp.server.auth.provider import AccessToken
    from mcp.server.auth.settings import AuthSettings

    class StaticTokenVerifier:
        async def verify_token(self, token: str) -> AccessToken | None:
            if token != os.environ.get("MCP_AUTH_TOKEN"):
                return None
            return AccessToken(token=token, client_id="{{ projectNameKebab }}", scopes=[])

    return {
        "token_verifier": StaticTokenVerifier(),
        "auth": AuthSettings(
            issuer_url="http://localhost:8000",
            resource_server_url="http://localhost:8000",
        ),
    }


mcp = FastMCP("{{ projectName }}", lifespan=lifespan, **auth_options())
{%- else %}

mcp = FastMCP("{{ projectName }}")
{%- endif %}
{%- for tool in tools %}


@mcp.tool()
{%- if tool.shape == "greeting" %}
def {{ tool.name }}(name: str = "World") -> str:
    """{{ tool.description }}."""
    return f"Hello, {name}!"
{%- elif tool.shape == "addition" %}
def {{ tool.name }}(a: float, b: float) -> float:
    """{{ tool.description }}."""
    return a + b
{%- elif tool.shape == "health" %}
def {{ tool.name }}() -> dict:
    """{{ tool.description }}."""
    uptime = (datetime.now(timezone.utc) - STARTED_AT).total_seconds()
    return {"status": "ok", "uptime_seconds": uptime, "auth_enabled": AUTH_ENABLED}
{%- endif %}
{%- endfor %}


# mcp-scaffold:tools
{%- for resource in resources %}


@mcp.resource("{{ resource.uri }}")
def {{ resource.name }}() -> str:
    """{{ resource.description }}."""
    return json.dumps(
        {"name": "{{ projectName }}", "transport": "{{ transport }}", "pattern": "{{ pattern }}"}
    )
{%- endfor %}


# mcp-scaffold:resources
{%- for prompt in prompts %}


@mcp.prompt()
def {{ prompt.name }}(content: str) -> str:
    """{{ prompt.description }}."""
    return f"{{ prompt.instruction }}:\n\n{content}"
{%- endfor %}


# mcp-scaffold:prompts


def main() -> None:
    """Run the server over {{ transport }}."""
{%- if lifecycle %}
    logging.basicConfig(level=os.environ.get("LOG_LEVEL", "INFO"))
{%- endif %}
    mcp.run(transport="{% if transport == "http" %}streamable-http{% else %}{{ transport }}{% endif %}")


if __name__ == "__main__":
    main()
"#;

const GITIGNORE: &str = r#"__pycache__/
*.py[cod]
.venv/
build/
dist/
*.egg-info/
.env
"#;

const FILES: &[FileTemplate] = &[
    FileTemplate {
        path: "pyproject.toml",
        body: PYPROJECT,
    },
    FileTemplate {
        path: "{{ projectNameSnake }}/__init__.py",
        body: INIT,
    },
    FileTemplate {
        path: "{{ projectNameSnake }}/__main__.py",
        body: MAIN,
    },
    FileTemplate {
        path: "{{ projectNameSnake }}/server.py",
        body: SERVER,
    },
    FileTemplate {
        path: "README.md",
        body: README_TEMPLATE,
    },
    FileTemplate {
        path: ".gitignore",
        body: GITIGNORE,
    },
];

const TOOL_SNIPPET: &str = r#"@mcp.tool()
def {{ name }}(input: str) -> str:
    """{{ description }}."""
    return input


"#;

const RESOURCE_SNIPPET: &str = r#"@mcp.resource("{{ uri }}")
def {{ name }}() -> str:
    """{{ description }}."""
    return ""


"#;

const PROMPT_SNIPPET: &str = r#"@mcp.prompt()
def {{ name }}(content: str) -> str:
    """{{ description }}."""
    return content


"#;

/// Module-level names of the generated `server.py` and Python keywords
const RESERVED_NAMES: &[&str] = &[
    "mcp", "main", "json", "logging", "logger", "os", "lifespan", "auth_options", "datetime",
    "timezone", "asynccontextmanager", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

pub struct PythonSupport;

impl LanguageSupport for PythonSupport {
    fn language(&self) -> Language {
        Language::Python
    }

    fn manifest_file(&self) -> &'static str {
        "pyproject.toml"
    }

    fn files(&self) -> &'static [FileTemplate] {
        FILES
    }

    fn run_command(&self, names: &NameForms, _transport: Transport) -> String {
        format!("python -m {}", names.snake())
    }

    fn install_command(&self) -> &'static str {
        "pip install -e ."
    }

    fn entry_points(&self, names: &NameForms) -> Vec<PathBuf> {
        let package = PathBuf::from(names.snake());
        vec![
            package.join("__main__.py"),
            package.join("server.py"),
            PathBuf::from("src").join(names.snake()).join("__main__.py"),
            PathBuf::from("src").join(names.snake()).join("server.py"),
            PathBuf::from("server.py"),
            PathBuf::from("main.py"),
        ]
    }

    fn capability_sources(&self, names: &NameForms) -> Vec<PathBuf> {
        vec![
            PathBuf::from(names.snake()).join("server.py"),
            PathBuf::from("src").join(names.snake()).join("server.py"),
            PathBuf::from("server.py"),
            PathBuf::from("src").join("server.py"),
            PathBuf::from("main.py"),
        ]
    }

    fn project_name(&self, manifest: &str) -> Option<String> {
        let value: toml::Value = toml::from_str(manifest).ok()?;
        value
            .get("project")
            .and_then(|p| p.get("name"))
            .or_else(|| value.get("tool")?.get("poetry")?.get("name"))
            .and_then(|n| n.as_str())
            .map(str::to_string)
    }

    fn check_manifest(&self, manifest: &str) -> Vec<String> {
        let value: toml::Value = match toml::from_str(manifest) {
            Ok(value) => value,
            Err(e) => return vec![format!("pyproject.toml is not valid TOML: {e}")],
        };

        let mut errors = Vec::new();
        if self.project_name(manifest).is_none() {
            errors.push("pyproject.toml is missing [project].name".to_string());
        }

        let pep621 = value
            .get("project")
            .and_then(|p| p.get("dependencies"))
            .and_then(|d| d.as_array())
            .is_some_and(|deps| {
                deps.iter()
                    .filter_map(|d| d.as_str())
                    .any(|d| requirement_name(d).eq_ignore_ascii_case("mcp"))
            });
        let poetry = value
            .get("tool")
            .and_then(|t| t.get("poetry"))
            .and_then(|p| p.get("dependencies"))
            .and_then(|d| d.get("mcp"))
            .is_some();
        if !pep621 && !poetry {
            errors.push("pyproject.toml does not declare the 'mcp' dependency".to_string());
        }

        errors
    }

    fn extractor(&self) -> &dyn CapabilityExtractor {
        &*EXTRACTOR
    }

    fn comment_prefix(&self) -> &'static str {
        "#"
    }

    fn snippet(&self, kind: CapabilityKind) -> &'static str {
        match kind {
            CapabilityKind::Tool => TOOL_SNIPPET,
            CapabilityKind::Resource => RESOURCE_SNIPPET,
            CapabilityKind::Prompt => PROMPT_SNIPPET,
        }
    }

    fn reserved_names(&self, _kind: CapabilityKind) -> &'static [&'static str] {
        RESERVED_NAMES
    }
}

/// Distribution name of a PEP 508 requirement, e.g. `mcp` for `mcp[cli]>=1.9`
fn requirement_name(requirement: &str) -> &str {
    let trimmed = requirement.trim();
    let end = trimmed
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.'))
        .unwrap_or(trimmed.len());
    &trimmed[..end]
}
