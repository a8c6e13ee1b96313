//! Go servers built on `github.com/mark3labs/mcp-go`

use once_cell::sync::Lazy;
use std::path::PathBuf;

use crate::analysis::{CapabilityExtractor, CapabilityKind, PatternExtractor};
use crate::core::{Language, NameForms, Transport};
use crate::languages::{FileTemplate, LanguageSupport, README_TEMPLATE};

/// Module paths accepted as the MCP SDK dependency
const SDK_MODULES: &[&str] = &[
    "github.com/mark3labs/mcp-go",
    "github.com/modelcontextprotocol/go-sdk",
];

static EXTRACTOR: Lazy<PatternExtractor> = Lazy::new(|| {
    PatternExtractor::new(&[
        (CapabilityKind::Tool, r#"mcp\.NewTool\(\s*"([^"]+)""#),
        (CapabilityKind::Resource, r#"mcp\.NewResource\(\s*"([^"]+)""#),
        (CapabilityKind::Prompt, r#"mcp\.NewPrompt\(\s*"([^"]+)""#),
    ])
});

const GO_MOD: &str = r#"module {{ projectNameKebab }}

go 1.23

require github.com/mark3labs/mcp-go v0.32.0
"#;

const MAIN: &str = r#"package main

import (
{%- if lifecycle %}
	"context"
{%- endif %}
	"log"
{%- if transport != "stdio" %}
	"net/http"
{%- endif %}
{%- if lifecycle or transport != "stdio" %}
	"os"
{%- endif %}
{%- if lifecycle %}
	"os/signal"
	"syscall"
{%- endif %}
{%- if lifecycle and transport != "stdio" %}
	"time"
{%- endif %}

	"github.com/mark3labs/mcp-go/server"
)
{%- if transport == "stdio" %}

func main() {
{%- if lifecycle %}
	ctx, stop := signal.NotifyContext(context.Background(), os.Interrupt, syscall.SIGTERM)
	defer stop()

	log.Printf("starting {{ projectName }}")
	stdio := server.NewStdioServer(newServer())
	if err := stdio.Listen(ctx, os.Stdin, os.Stdout); err != nil && ctx.Err() == nil {
		log.Fatalf("server error: %v", err)
	}
	log.Printf("{{ projectName }} stopped")
{%- else %}
	if err := server.ServeStdio(newServer()); err != nil {
		log.Fatalf("server error: %v", err)
	}
{%- endif %}
}
{%- else %}

func main() {
	addr := ":" + envOr("PORT", "8080")
	s := newServer()
{%- if transport == "sse" %}
	var handler http.Handler = server.NewSSEServer(s)
{%- else %}
	var handler http.Handler = server.NewStreamableHTTPServer(s)
{%- endif %}
{%- if auth %}
	handler = withAuth(handler)
{%- endif %}
	httpServer := &http.Server{Addr: addr, Handler: handler}
{%- if lifecycle %}

	ctx, stop := signal.NotifyContext(context.Background(), os.Interrupt, syscall.SIGTERM)
	defer stop()
	go func() {
		<-ctx.Done()
		log.Printf("shutting down {{ projectName }}")
		shutdownCtx, cancel := context.WithTimeout(context.Background(), 5*time.Second)
		defer cancel()
		if err := httpServer.Shutdown(shutdownCtx); err != nil {
			log.Printf("shutdown error: %v", err)
		}
	}()
{%- endif %}

	log.Printf("{{ projectName }} listening on %s", addr)
	if err := httpServer.ListenAndServe(); err != nil && err != http.ErrServerClosed {
		log.Fatalf("server error: %v", err)
	}
}

func envOr(key, fallback string) string {
	if value := os.Getenv(key); value != "" {
		return value
	}
	return fallback
}
{%- if auth %}

func withAuth(next http.Handler) http.Handler {
	return http.HandlerFunc(func(w http.ResponseWriter, r *http.Request) {
		if os.Getenv("MCP_AUTH_ENABLED") == "true" &&
			r.Header.Get("Authorization") != "Bearer "+os.Getenv("MCP_AUTH_TOKEN") {
			http.Error(w, "unauthorized", http.StatusUnauthorized)
			return
		}
		next.ServeHTTP(w, r)
	})
}
{%- endif %}
{%- endif %}
"#;

const SERVER: &str = r#"package main

import (
	"context"
	"encoding/json"
	"fmt"
{%- if lifecycle %}
	"os"
	"time"
{%- endif %}

	"github.com/mark3labs/mcp-go/mcp"
	"github.com/mark3labs/mcp-go/server"
)
{%- if lifecycle %}

var startedAt = time.Now()
{%- endif %}

func newServer() *server.MCPServer {
	s := server.NewMCPServer(
		"{{ projectName }}",
		"0.1.0",
		server.WithToolCapabilities(true),
		server.WithResourceCapabilities(false, true),
		server.WithPromptCapabilities(true),
	)
	registerTools(s)
	registerResources(s)
	registerPrompts(s)
	return s
}

func registerTools(s *server.MCPServer) {
{%- for tool in tools %}
	s.AddTool(
		mcp.NewTool("{{ tool.name }}",
			mcp.WithDescription("{{ tool.description }}"),
{%- if tool.shape == "greeting" %}
			mcp.WithString("name", mcp.Description("Who to greet")),
		),
		func(ctx context.Context, request mcp.CallToolRequest) (*mcp.CallToolResult, error) {
			name := request.GetString("name", "World")
			return mcp.NewToolResultText(fmt.Sprintf("Hello, %s!", name)), nil
		},
{%- elif tool.shape == "addition" %}
			mcp.WithNumber("a", mcp.Required(), mcp.Description("First number")),
			mcp.WithNumber("b", mcp.Required(), mcp.Description("Second number")),
		),
		func(ctx context.Context, request mcp.CallToolRequest) (*mcp.CallToolResult, error) {
			a, err := request.RequireFloat("a")
			if err != nil {
				return mcp.NewToolResultError(err.Error()), nil
			}
			b, err := request.RequireFloat("b")
			if err != nil {
				return mcp.NewToolResultError(err.Error()), nil
			}
			return mcp.NewToolResultText(fmt.Sprintf("%g", a+b)), nil
		},
{%- elif tool.shape == "health" %}
		),
		func(ctx context.Context, request mcp.CallToolRequest) (*mcp.CallToolResult, error) {
			body, err := json.Marshal(map[string]any{
				"status":         "ok",
				"uptime_seconds": time.Since(startedAt).Seconds(),
				"auth_enabled":   os.Getenv("MCP_AUTH_ENABLED") == "true",
			})
			if err != nil {
				return nil, err
			}
			return mcp.NewToolResultText(string(body)), nil
		},
{%- endif %}
	)

{%- endfor %}

	// mcp-scaffold:tools
}

func registerResources(s *server.MCPServer) {
{%- for resource in resources %}
	s.AddResource(
		mcp.NewResource("{{ resource.uri }}", "{{ resource.name }}",
			mcp.WithResourceDescription("{{ resource.description }}"),
			mcp.WithMIMEType("application/json"),
		),
		func(ctx context.Context, request mcp.ReadResourceRequest) ([]mcp.ResourceContents, error) {
			body, err := json.Marshal(map[string]string{
				"name":      "{{ projectName }}",
				"transport": "{{ transport }}",
				"pattern":   "{{ pattern }}",
			})
			if err != nil {
				return nil, err
			}
			return []mcp.ResourceContents{
				mcp.TextResourceContents{
					URI:      request.Params.URI,
					MIMEType: "application/json",
					Text:     string(body),
				},
			}, nil
		},
	)

{%- endfor %}

	// mcp-scaffold:resources
}

func registerPrompts(s *server.MCPServer) {
{%- for prompt in prompts %}
	s.AddPrompt(
		mcp.NewPrompt("{{ prompt.name }}",
			mcp.WithPromptDescription("{{ prompt.description }}"),
			mcp.WithArgument("content", mcp.ArgumentDescription("Content to work on"), mcp.RequiredArgument()),
		),
		func(ctx context.Context, request mcp.GetPromptRequest) (*mcp.GetPromptResult, error) {
			content := request.Params.Arguments["content"]
			return mcp.NewGetPromptResult(
				"{{ prompt.description }}",
				[]mcp.PromptMessage{
					mcp.NewPromptMessage(mcp.RoleUser, mcp.NewTextContent("{{ prompt.instruction }}:\n\n"+content)),
				},
			), nil
		},
	)

{%- endfor %}

	// mcp-scaffold:prompts
}
"#;

const GITIGNORE: &str = r#"/{{ projectNameKebab }}
*.exe
.env
"#;

const FILES: &[FileTemplate] = &[
    FileTemplate {
        path: "go.mod",
        body: GO_MOD,
    },
    FileTemplate {
        path: "main.go",
        body: MAIN,
    },
    FileTemplate {
        path: "server.go",
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

const TOOL_SNIPPET: &str = r#"s.AddTool(
	mcp.NewTool("{{ name }}",
		mcp.WithDescription("{{ description }}"),
		mcp.WithString("input", mcp.Required()),
	),
	func(ctx context.Context, request mcp.CallToolRequest) (*mcp.CallToolResult, error) {
		input, err := request.RequireString("input")
		if err != nil {
			return mcp.NewToolResultError(err.Error()), nil
		}
		return mcp.NewToolResultText(input), nil
	},
)

"#;

const RESOURCE_SNIPPET: &str = r#"s.AddResource(
	mcp.NewResource("{{ uri }}", "{{ name }}", mcp.WithResourceDescription("{{ description }}")),
	func(ctx context.Context, request mcp.ReadResourceRequest) ([]mcp.ResourceContents, error) {
		return []mcp.ResourceContents{
			mcp.TextResourceContents{URI: request.Params.URI, Text: ""},
		}, nil
	},
)

"#;

const PROMPT_SNIPPET: &str = r#"s.AddPrompt(
	mcp.NewPrompt("{{ name }}",
		mcp.WithPromptDescription("{{ description }}"),
		mcp.WithArgument("content", mcp.RequiredArgument()),
	),
	func(ctx context.Context, request mcp.GetPromptRequest) (*mcp.GetPromptResult, error) {
		return mcp.NewGetPromptResult(
			"{{ description }}",
			[]mcp.PromptMessage{
				mcp.NewPromptMessage(mcp.RoleUser, mcp.NewTextContent(request.Params.Arguments["content"])),
			},
		), nil
	},
)

"#;

pub struct GoSupport;

impl LanguageSupport for GoSupport {
    fn language(&self) -> Language {
        Language::Go
    }

    fn manifest_file(&self) -> &'static str {
        "go.mod"
    }

    fn files(&self) -> &'static [FileTemplate] {
        FILES
    }

    fn run_command(&self, _names: &NameForms, _transport: Transport) -> String {
        "go run .".to_string()
    }

    fn install_command(&self) -> &'static str {
        "go mod tidy"
    }

    fn entry_points(&self, names: &NameForms) -> Vec<PathBuf> {
        vec![
            PathBuf::from("main.go"),
            PathBuf::from("cmd").join(names.kebab()).join("main.go"),
            PathBuf::from("cmd/server/main.go"),
        ]
    }

    fn capability_sources(&self, names: &NameForms) -> Vec<PathBuf> {
        vec![
            PathBuf::from("server.go"),
            PathBuf::from("main.go"),
            PathBuf::from("internal/server/server.go"),
            PathBuf::from("cmd").join(names.kebab()).join("main.go"),
        ]
    }

    fn project_name(&self, manifest: &str) -> Option<String> {
        let module = module_path(manifest)?;
        module.rsplit('/').next().map(str::to_string)
    }

    fn check_manifest(&self, manifest: &str) -> Vec<String> {
        let mut errors = Vec::new();
        if module_path(manifest).is_none() {
            errors.push("go.mod has no module directive".to_string());
        }
        if !SDK_MODULES.iter().any(|sdk| requires(manifest, sdk)) {
            errors.push(format!("go.mod does not require '{}'", SDK_MODULES[0]));
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
}

fn module_path(manifest: &str) -> Option<&str> {
    manifest.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let path = rest.trim().trim_matches('"');
        (!path.is_empty()).then_some(path)
    })
}

/// Whether `module` appears in a `require` line or block
fn requires(manifest: &str, module: &str) -> bool {
    manifest.lines().any(|line| {
        let line = line.trim();
        let line = line.strip_prefix("require").map(str::trim).unwrap_or(line);
        line.strip_prefix(module)
            .is_some_and(|rest| rest.starts_with(char::is_whitespace))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_mcp_go_declarations() {
        let source = r#"
	s.AddTool(
		mcp.NewTool("hello",
			mcp.WithDescription("Say hello"),
		),
		helloHandler,
	)
	s.AddResource(mcp.NewResource("config://settings", "settings"), settingsHandler)
	s.AddPrompt(mcp.NewPrompt( "code_review"), reviewHandler)
"#;
        let found = GoSupport.extractor().extract(source);
        let ids: Vec<(CapabilityKind, &str)> = found
            .iter()
            .map(|c| (c.kind, c.identifier.as_str()))
            .collect();
        assert_eq!(
            ids,
            vec![
                (CapabilityKind::Tool, "hello"),
                (CapabilityKind::Resource, "config://settings"),
                (CapabilityKind::Prompt, "code_review"),
            ]
        );
    }

    #[test]
    fn test_project_name_is_last_module_segment() {
        let manifest = "module github.com/acme/weather-mcp\n\ngo 1.23\n";
        assert_eq!(GoSupport.project_name(manifest), Some("weather-mcp".to_string()));
        assert_eq!(GoSupport.project_name("go 1.23\n"), None);
    }

    #[test]
    fn test_check_manifest_single_require() {
        let manifest = "module demo\n\nrequire github.com/mark3labs/mcp-go v0.32.0\n";
        assert!(GoSupport.check_manifest(manifest).is_empty());
    }

    #[test]
    fn test_check_manifest_require_block() {
        let manifest = "module demo\n\nrequire (\n\tgithub.com/google/uuid v1.6.0\n\tgithub.com/modelcontextprotocol/go-sdk v0.2.0\n)\n";
        assert!(GoSupport.check_manifest(manifest).is_empty());
    }

    #[test]
    fn test_check_manifest_missing_everything() {
        let errors = GoSupport.check_manifest("go 1.23\nrequire github.com/mark3labs/mcp-go-extra v1.0.0\n");
        assert_eq!(errors.len(), 2);
        assert!(errors[1].contains("mark3labs/mcp-go"));
    }
}
