//! TypeScript servers built on `@modelcontextprotocol/sdk`

use once_cell::sync::Lazy;
use std::path::PathBuf;

use crate::analysis::{CapabilityExtractor, CapabilityKind, PatternExtractor};
use crate::core::{Language, NameForms, Transport};
use crate::languages::{FileTemplate, LanguageSupport, README_TEMPLATE};

const SDK_PACKAGE: &str = "@modelcontextprotocol/sdk";

static EXTRACTOR: Lazy<PatternExtractor> = Lazy::new(|| {
    PatternExtractor::new(&[
        (
            CapabilityKind::Tool,
            r#"\.(?:tool|registerTool)\(\s*["'\x60]([^"'\x60]+)"#,
        ),
        (
            CapabilityKind::Resource,
            r#"\.(?:resource|registerResource)\(\s*["'\x60][^"'\x60]*["'\x60]\s*,\s*["'\x60]([^"'\x60]+)"#,
        ),
        (
            CapabilityKind::Prompt,
            r#"\.(?:prompt|registerPrompt)\(\s*["'\x60]([^"'\x60]+)"#,
        ),
    ])
});

const PACKAGE_JSON: &str = r#"{
  "name": "{{ projectNameKebab }}",
  "version": "0.1.0",
  "description": "{{ projectNamePascal }} MCP server",
  "type": "module",
  "main": "build/index.js",
  "bin": {
    "{{ projectNameKebab }}": "build/index.js"
  },
  "scripts": {
    "build": "tsc",
    "start": "node build/index.js",
    "dev": "tsc --watch"
  },
  "dependencies": {
    "@modelcontextprotocol/sdk": "^1.12.0",
{%- if transport != "stdio" %}
    "express": "^4.21.0",
{%- endif %}
    "zod": "^3.23.8"
  },
  "devDependencies": {
{%- if transport != "stdio" %}
    "@types/express": "^4.17.21",
{%- endif %}
    "@types/node": "^22.0.0",
    "typescript": "^5.6.0"
  }
}
"#;

const TSCONFIG: &str = r#"{
  "compilerOptions": {
    "target": "ES2022",
    "module": "Node16",
    "moduleResolution": "Node16",
    "outDir": "./build",
    "rootDir": "./src",
    "strict": true,
    "esModuleInterop": true,
    "skipLibCheck": true,
    "forceConsistentCasingInFileNames": true
  },
  "include": ["src/**/*"]
}
"#;

const SERVER: &str = r#"import { McpServer } from "@modelcontextprotocol/sdk/server/mcp.js";
import { z } from "zod";
{%- if lifecycle %}

const startedAt = Date.now();
{%- endif %}

export function createServer(): McpServer {
  const server = new McpServer({
    name: "{{ projectName }}",
    version: "0.1.0",
  });
{%- for tool in tools %}

  server.tool(
    "{{ tool.name }}",
    "{{ tool.description }}",
{%- if tool.shape == "greeting" %}
    { name: z.string().default("World").describe("Who to greet") },
    async ({ name }) => ({
      content: [{ type: "text", text: `Hello, ${name}!` }],
    }),
{%- elif tool.shape == "addition" %}
    { a: z.number().describe("First number"), b: z.number().describe("Second number") },
    async ({ a, b }) => ({
      content: [{ type: "text", text: String(a + b) }],
    }),
{%- elif tool.shape == "health" %}
    {},
    async () => ({
      content: [
        {
          type: "text",
          text: JSON.stringify({
            status: "ok",
            uptimeSeconds: (Date.now() - startedAt) / 1000,
            authEnabled: process.env.MCP_AUTH_ENABLED === "true",
          }),
        },
      ],
    }),
{%- endif %}
  );
{%- endfor %}

  // mcp-scaffold:tools
{%- for resource in resources %}

  server.resource(
    "{{ resource.name }}",
    "{{ resource.uri }}",
    { description: "{{ resource.description }}", mimeType: "application/json" },
    async (uri) => ({
      contents: [
        {
          uri: uri.href,
          mimeType: "application/json",
          text: JSON.stringify({
            name: "{{ projectName }}",
            transport: "{{ transport }}",
            pattern: "{{ pattern }}",
          }),
        },
      ],
    }),
  );
{%- endfor %}

  // mcp-scaffold:resources
{%- for prompt in prompts %}

  server.prompt(
    "{{ prompt.name }}",
    "{{ prompt.description }}",
    { content: z.string().describe("Content to work on") },
    ({ content }) => ({
      messages: [
        {
          role: "user",
          content: { type: "text", text: `{{ prompt.instruction }}:\n\n${content}` },
        },
      ],
    }),
  );
{%- endfor %}

  // mcp-scaffold:prompts

  return server;
}
"#;

const INDEX: &str = r#"#!/usr/bin/env node
import { createServer } from "./server.js";
{%- if transport == "stdio" %}
import { StdioServerTransport } from "@modelcontextprotocol/sdk/server/stdio.js";
{%- elif transport == "sse" %}
import express from "express";
import { SSEServerTransport } from "@modelcontextprotocol/sdk/server/sse.js";
{%- else %}
import express from "express";
import { StreamableHTTPServerTransport } from "@modelcontextprotocol/sdk/server/streamableHttp.js";
{%- endif %}
{%- if transport != "stdio" %}

const PORT = Number(process.env.PORT ?? 3000);
{%- endif %}
{%- if auth and transport != "stdio" %}

function requireAuth(req: express.Request, res: express.Response, next: express.NextFunction): void {
  if (process.env.MCP_AUTH_ENABLED !== "true") {
    next();
    return;
  }
  const expected = `Bearer ${process.env.MCP_AUTH_TOKEN ?? ""}`;
  if (req.headers.authorization !== expected) {
    res.status(401).json({ error: "unauthorized" });
    return;
  }
  next();
}
{%- endif %}

async function main(): Promise<void> {
{%- if lifecycle %}
  console.error("Starting {{ projectName }}");
  const shutdown = (signal: string) => {
    console.error(`Received ${signal}, shutting down {{ projectName }}`);
    process.exit(0);
  };
  process.on("SIGINT", () => shutdown("SIGINT"));
  process.on("SIGTERM", () => shutdown("SIGTERM"));
{%- endif %}
{%- if transport == "stdio" %}
  const server = createServer();
  await server.connect(new StdioServerTransport());
{%- elif transport == "sse" %}
  const app = express();
{%- if auth %}
  app.use(requireAuth);
{%- endif %}
  const transports: Record<string, SSEServerTransport> = {};

  app.get("/sse", async (_req, res) => {
    const transport = new SSEServerTransport("/messages", res);
    transports[transport.sessionId] = transport;
    res.on("close", () => {
      delete transports[transport.sessionId];
    });
    await createServer().connect(transport);
  });

  app.post("/messages", async (req, res) => {
    const transport = transports[String(req.query.sessionId)];
    if (!transport) {
      res.status(400).send("Unknown session");
      return;
    }
    await transport.handlePostMessage(req, res);
  });

  app.listen(PORT, () => console.error(`{{ projectName }} listening on http://localhost:${PORT}/sse`));
{%- else %}
  const app = express();
  app.use(express.json());
{%- if auth %}
  app.use(requireAuth);
{%- endif %}

  app.post("/mcp", async (req, res) => {
    const server = createServer();
    const transport = new StreamableHTTPServerTransport({ sessionIdGenerator: undefined });
    res.on("close", () => {
      transport.close();
      server.close();
    });
    await server.connect(transport);
    await transport.handleRequest(req, res, req.body);
  });

  app.listen(PORT, () => console.error(`{{ projectName }} listening on http://localhost:${PORT}/mcp`));
{%- endif %}
}

main().catch((error) => {
  console.error(error);
  process.exit(1);
});
"#;

const GITIGNORE: &str = r#"node_modules/
build/
*.log
.env
"#;

const FILES: &[FileTemplate] = &[
    FileTemplate {
        path: "package.json",
        body: PACKAGE_JSON,
    },
    FileTemplate {
        path: "tsconfig.json",
        body: TSCONFIG,
    },
    FileTemplate {
        path: "src/index.ts",
        body: INDEX,
    },
    FileTemplate {
        path: "src/server.ts",
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

const TOOL_SNIPPET: &str = r#"server.tool(
  "{{ name }}",
  "{{ description }}",
  { input: z.string() },
  async ({ input }) => ({
    content: [{ type: "text", text: input }],
  }),
);

"#;

const RESOURCE_SNIPPET: &str = r#"server.resource(
  "{{ name }}",
  "{{ uri }}",
  async (uri) => ({
    contents: [{ uri: uri.href, text: "" }],
  }),
);

"#;

const PROMPT_SNIPPET: &str = r#"server.prompt(
  "{{ name }}",
  "{{ description }}",
  { content: z.string() },
  ({ content }) => ({
    messages: [{ role: "user", content: { type: "text", text: content } }],
  }),
);

"#;

pub struct TypeScriptSupport;

impl LanguageSupport for TypeScriptSupport {
    fn language(&self) -> Language {
        Language::TypeScript
    }

    fn manifest_file(&self) -> &'static str {
        "package.json"
    }

    fn files(&self) -> &'static [FileTemplate] {
        FILES
    }

    fn run_command(&self, _names: &NameForms, _transport: Transport) -> String {
        "npm run build && npm start".to_string()
    }

    fn install_command(&self) -> &'static str {
        "npm install"
    }

    fn entry_points(&self, _names: &NameForms) -> Vec<PathBuf> {
        vec![
            PathBuf::from("src/index.ts"),
            PathBuf::from("index.ts"),
            PathBuf::from("src/index.js"),
        ]
    }

    fn capability_sources(&self, _names: &NameForms) -> Vec<PathBuf> {
        vec![
            PathBuf::from("src/server.ts"),
            PathBuf::from("src/index.ts"),
            PathBuf::from("index.ts"),
        ]
    }

    fn project_name(&self, manifest: &str) -> Option<String> {
        let value: serde_json::Value = serde_json::from_str(manifest).ok()?;
        value.get("name")?.as_str().map(str::to_string)
    }

    fn check_manifest(&self, manifest: &str) -> Vec<String> {
        let value: serde_json::Value = match serde_json::from_str(manifest) {
            Ok(value) => value,
            Err(e) => return vec![format!("package.json is not valid JSON: {e}")],
        };

        let mut errors = Vec::new();
        if value.get("name").and_then(|n| n.as_str()).is_none() {
            errors.push("package.json is missing \"name\"".to_string());
        }

        let has_sdk = ["dependencies", "devDependencies"]
            .iter()
            .filter_map(|section| value.get(section))
            .any(|deps| deps.get(SDK_PACKAGE).is_some());
        if !has_sdk {
            errors.push(format!("package.json does not declare '{SDK_PACKAGE}'"));
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_sdk_registrations() {
        let source = r#"
  server.tool(
    "hello",
    "Say hello",
    async () => ({ content: [] }),
  );
  server.registerTool('search', { title: "Search" }, async () => ({ content: [] }));
  server.resource("settings", "config://settings", async (uri) => ({ contents: [] }));
  server.prompt(`code_review`, "Review code", () => ({ messages: [] }));
"#;
        let found = TypeScriptSupport.extractor().extract(source);
        let ids: Vec<(CapabilityKind, &str)> = found
            .iter()
            .map(|c| (c.kind, c.identifier.as_str()))
            .collect();
        assert_eq!(
            ids,
            vec![
                (CapabilityKind::Tool, "hello"),
                (CapabilityKind::Tool, "search"),
                (CapabilityKind::Resource, "config://settings"),
                (CapabilityKind::Prompt, "code_review"),
            ]
        );
    }

    #[test]
    fn test_check_manifest() {
        let good = r#"{"name": "x", "dependencies": {"@modelcontextprotocol/sdk": "^1.12.0"}}"#;
        assert!(TypeScriptSupport.check_manifest(good).is_empty());
        assert_eq!(TypeScriptSupport.project_name(good), Some("x".to_string()));

        let dev_only = r#"{"name": "x", "devDependencies": {"@modelcontextprotocol/sdk": "1"}}"#;
        assert!(TypeScriptSupport.check_manifest(dev_only).is_empty());

        let errors = TypeScriptSupport.check_manifest(r#"{"dependencies": {}}"#);
        assert_eq!(errors.len(), 2);

        let errors = TypeScriptSupport.check_manifest("{ not json");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("not valid JSON"));
    }
}
