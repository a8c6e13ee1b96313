//! Rust servers built on `rmcp`

use once_cell::sync::Lazy;
use std::path::PathBuf;

use crate::analysis::{CapabilityExtractor, CapabilityKind, PatternExtractor};
use crate::core::{Language, NameForms, Transport};
use crate::languages::{FileTemplate, LanguageSupport, README_TEMPLATE};

static EXTRACTOR: Lazy<PatternExtractor> = Lazy::new(|| {
    PatternExtractor::new(&[
        (
            CapabilityKind::Tool,
            r"#\[tool\b[^\]]*\]\s*(?:pub(?:\([^)]*\))?\s+)?(?:async\s+)?fn\s+(\w+)",
        ),
        (CapabilityKind::Resource, r#"RawResource::new\(\s*"([^"]+)""#),
        (
            CapabilityKind::Prompt,
            r"#\[prompt\b[^\]]*\]\s*(?:pub(?:\([^)]*\))?\s+)?(?:async\s+)?fn\s+(\w+)",
        ),
    ])
});

const CARGO_TOML: &str = r##"[package]
name = "{{ projectNameKebab }}"
version = "0.1.0"
edition = "2021"

[dependencies]
rmcp = { version = "0.8", features = ["server", "macros", {% if transport == "stdio" %}"transport-io"{% else %}"transport-streamable-http-server"{% endif %}] }
tokio = { version = "1", features = ["full"] }
serde = { version = "1", features = ["derive"] }
serde_json = "1"
schemars = "1"
anyhow = "1"
tracing = "0.1"
tracing-subscriber = { version = "0.3", features = ["env-filter"] }
{%- if transport != "stdio" %}
axum = "0.8"
{%- endif %}
"##;

const MAIN: &str = r##"mod server;

use anyhow::Result;
{%- if transport == "stdio" %}
use rmcp::{ServiceExt, transport::stdio};
{%- else %}
use rmcp::transport::streamable_http_server::{
    StreamableHttpService, session::local::LocalSessionManager,
};
{%- endif %}
use tracing_subscriber::EnvFilter;

use crate::server::{{ projectNamePascal }}Server;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
{%- if lifecycle %}

    tracing::info!("starting {{ projectName }}");
{%- endif %}
{%- if transport == "stdio" %}

    let service = {{ projectNamePascal }}Server::new().serve(stdio()).await?;
{%- if lifecycle %}
    let cancel = service.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });
    service.waiting().await?;
    tracing::info!("{{ projectName }} stopped");
{%- else %}
    service.waiting().await?;
{%- endif %}
{%- else %}

    let service = StreamableHttpService::new(
        || Ok({{ projectNamePascal }}Server::new()),
        LocalSessionManager::default().into(),
        Default::default(),
    );
    let router = axum::Router::new().nest_service("/mcp", service);
{%- if auth %}
    let router = router.layer(axum::middleware::from_fn(require_auth));
{%- endif %}

    let addr = format!("0.0.0.0:{}", std::env::var("PORT").unwrap_or_else(|_| "8000".to_string()));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("{{ projectName }} listening on {addr}");
    axum::serve(listener, router)
{%- if lifecycle %}
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down {{ projectName }}");
        })
{%- endif %}
        .await?;
{%- endif %}
    Ok(())
}
{%- if auth and transport != "stdio" %}

async fn require_auth(
    request: axum::extract::Request,
    next: axum::middleware::Next,
) -> Result<axum::response::Response, axum::http::StatusCode> {
    if std::env::var("MCP_AUTH_ENABLED").as_deref() != Ok("true") {
        return Ok(next.run(request).await);
    }
    let expected = format!("Bearer {}", std::env::var("MCP_AUTH_TOKEN").unwrap_or_default());
    let provided = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    if provided != Some(expected.as_str()) {
        return Err(axum::http::StatusCode::UNAUTHORIZED);
    }
    Ok(next.run(request).await)
}
{%- endif %}
"##;

const SERVER: &str = r##"use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::{
        router::{prompt::PromptRouter, tool::ToolRouter},
        wrapper::Parameters,
    },
    model::*,
    prompt, prompt_handler, prompt_router, schemars,
    service::RequestContext,
    tool, tool_handler, tool_router,
};
use serde::Deserialize;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct HelloArgs {
    /// Who to greet
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddArgs {
    pub a: f64,
    pub b: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ContentArgs {
    /// Content to work on
    pub content: String,
}

#[derive(Clone)]
pub struct {{ projectNamePascal }}Server {
{%- if lifecycle %}
    started_at: std::time::Instant,
{%- endif %}
    tool_router: ToolRouter<Self>,
    prompt_router: PromptRouter<Self>,
}

impl {{ projectNamePascal }}Server {
    pub fn new() -> Self {
        Self {
{%- if lifecycle %}
            started_at: std::time::Instant::now(),
{%- endif %}
            tool_router: Self::tool_router(),
            prompt_router: Self::prompt_router(),
        }
    }

    fn settings_json(&self) -> String {
        serde_json::json!({
            "name": "{{ projectName }}",
            "transport": "{{ transport }}",
            "pattern": "{{ pattern }}",
        })
        .to_string()
    }
}

#[tool_router]
impl {{ projectNamePascal }}Server {
{%- for tool in tools %}
    #[tool(description = "{{ tool.description }}")]
{%- if tool.shape == "greeting" %}
    async fn {{ tool.name }}(
        &self,
        Parameters(args): Parameters<HelloArgs>,
    ) -> Result<CallToolResult, McpError> {
        let name = args.name.unwrap_or_else(|| "World".to_string());
        Ok(CallToolResult::success(vec![Content::text(format!("Hello, {name}!"))]))
    }
{%- elif tool.shape == "addition" %}
    async fn {{ tool.name }}(
        &self,
        Parameters(args): Parameters<AddArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text((args.a + args.b).to_string())]))
    }
{%- elif tool.shape == "health" %}
    async fn {{ tool.name }}(&self) -> Result<CallToolResult, McpError> {
        let status = serde_json::json!({
            "status": "ok",
            "uptime_seconds": self.started_at.elapsed().as_secs_f64(),
            "auth_enabled": std::env::var("MCP_AUTH_ENABLED").as_deref() == Ok("true"),
        });
        Ok(CallToolResult::success(vec![Content::text(status.to_string())]))
    }
{%- endif %}

{%- endfor %}

    // mcp-scaffold:tools
}

#[prompt_router]
impl {{ projectNamePascal }}Server {
{%- for prompt in prompts %}
    #[prompt(name = "{{ prompt.name }}", description = "{{ prompt.description }}")]
    async fn {{ prompt.name }}(&self, Parameters(args): Parameters<ContentArgs>) -> Vec<PromptMessage> {
        vec![PromptMessage::new_text(
            PromptMessageRole::User,
            format!("{{ prompt.instruction }}:\n\n{}", args.content),
        )]
    }

{%- endfor %}

    // mcp-scaffold:prompts
}

#[tool_handler]
#[prompt_handler]
impl ServerHandler for {{ projectNamePascal }}Server {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some("{{ projectName }} MCP server".to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .enable_prompts()
                .build(),
            ..Default::default()
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult {
            resources: vec![
{%- for resource in resources %}
                RawResource::new("{{ resource.uri }}", "{{ resource.name }}").no_annotation(),
{%- endfor %}
                // mcp-scaffold:resources
            ],
            next_cursor: None,
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        match request.uri.as_str() {
{%- for resource in resources %}
            "{{ resource.uri }}" => Ok(ReadResourceResult {
                contents: vec![ResourceContents::text(self.settings_json(), request.uri.clone())],
            }),
{%- endfor %}
            // mcp-scaffold:resource-reads
            _ => Err(McpError::resource_not_found(
                format!("unknown resource: {}", request.uri),
                None,
            )),
        }
    }
}
"##;

const GITIGNORE: &str = r#"/target
.env
"#;

const FILES: &[FileTemplate] = &[
    FileTemplate {
        path: "Cargo.toml",
        body: CARGO_TOML,
    },
    FileTemplate {
        path: "src/main.rs",
        body: MAIN,
    },
    FileTemplate {
        path: "src/server.rs",
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

const TOOL_SNIPPET: &str = r##"#[tool(description = "{{ description }}")]
async fn {{ name }}(&self, Parameters(args): Parameters<ContentArgs>) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(args.content)]))
}

"##;

const RESOURCE_SNIPPET: &str = r##"RawResource::new("{{ uri }}", "{{ name }}").no_annotation(),
"##;

const RESOURCE_READ_SNIPPET: &str = r##""{{ uri }}" => Ok(ReadResourceResult {
    contents: vec![ResourceContents::text(String::new(), request.uri.clone())],
}),
"##;

const RESOURCE_COMPANIONS: &[(&str, &str)] =
    &[("mcp-scaffold:resource-reads", RESOURCE_READ_SNIPPET)];

/// Methods of the generated server type, the handler methods the rmcp
/// macros expand to, and Rust keywords
const RESERVED_METHODS: &[&str] = &[
    "new", "settings_json", "tool_router", "prompt_router", "get_info", "list_resources",
    "read_resource", "call_tool", "list_tools", "get_prompt", "list_prompts", "as", "async",
    "await", "break", "const", "continue", "crate", "dyn", "else", "enum", "extern", "false",
    "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub",
    "ref", "return", "self", "static", "struct", "super", "trait", "true", "try", "type",
    "unsafe", "use", "where", "while", "abstract", "become", "box", "do", "final", "macro",
    "override", "priv", "typeof", "unsized", "virtual", "yield",
];

const PROMPT_SNIPPET: &str = r##"#[prompt(name = "{{ name }}", description = "{{ description }}")]
async fn {{ name }}(&self, Parameters(args): Parameters<ContentArgs>) -> Vec<PromptMessage> {
    vec![PromptMessage::new_text(PromptMessageRole::User, args.content)]
}

"##;

pub struct RustSupport;

impl LanguageSupport for RustSupport {
    fn language(&self) -> Language {
        Language::Rust
    }

    fn manifest_file(&self) -> &'static str {
        "Cargo.toml"
    }

    fn files(&self) -> &'static [FileTemplate] {
        FILES
    }

    fn run_command(&self, _names: &NameForms, _transport: Transport) -> String {
        "cargo run --release".to_string()
    }

    fn install_command(&self) -> &'static str {
        "cargo fetch"
    }

    fn entry_points(&self, names: &NameForms) -> Vec<PathBuf> {
        vec![
            PathBuf::from("src/main.rs"),
            PathBuf::from("src/bin").join(format!("{}.rs", names.kebab())),
        ]
    }

    fn capability_sources(&self, names: &NameForms) -> Vec<PathBuf> {
        vec![
            PathBuf::from("src/server.rs"),
            PathBuf::from("src/main.rs"),
            PathBuf::from("src/lib.rs"),
            PathBuf::from(names.kebab()).join("src/server.rs"),
        ]
    }

    fn project_name(&self, manifest: &str) -> Option<String> {
        let value: toml::Value = toml::from_str(manifest).ok()?;
        value
            .get("package")?
            .get("name")?
            .as_str()
            .map(str::to_string)
    }

    fn check_manifest(&self, manifest: &str) -> Vec<String> {
        let value: toml::Value = match toml::from_str(manifest) {
            Ok(value) => value,
            Err(e) => return vec![format!("Cargo.toml is not valid TOML: {e}")],
        };

        let mut errors = Vec::new();
        if self.project_name(manifest).is_none() {
            errors.push("Cargo.toml is missing [package].name".to_string());
        }
        let has_rmcp = value
            .get("dependencies")
            .and_then(|deps| deps.get("rmcp"))
            .is_some();
        if !has_rmcp {
            errors.push("Cargo.toml does not declare the 'rmcp' dependency".to_string());
        }
        errors
    }

    fn extractor(&self) -> &dyn CapabilityExtractor {
        &*EXTRACTOR
    }

    fn snippet(&self, kind: CapabilityKind) -> &'static str {
        match kind {
            CapabilityKind::Tool => TOOL_SNIPPET,
            CapabilityKind::Resource => RESOURCE_SNIPPET,
            CapabilityKind::Prompt => PROMPT_SNIPPET,
        }
    }

    fn companion_snippets(&self, kind: CapabilityKind) -> &'static [(&'static str, &'static str)] {
        match kind {
            CapabilityKind::Resource => RESOURCE_COMPANIONS,
            CapabilityKind::Tool | CapabilityKind::Prompt => &[],
        }
    }

    fn reserved_names(&self, kind: CapabilityKind) -> &'static [&'static str] {
        match kind {
            CapabilityKind::Resource => &[],
            CapabilityKind::Tool | CapabilityKind::Prompt => RESERVED_METHODS,
        }
    }

    /// Tools and prompts are both methods of the server type
    fn shared_namespace(&self, kind: CapabilityKind) -> &'static [CapabilityKind] {
        match kind {
            CapabilityKind::Resource => &[],
            CapabilityKind::Tool | CapabilityKind::Prompt => {
                &[CapabilityKind::Tool, CapabilityKind::Prompt]
            }
        }
    }
}
