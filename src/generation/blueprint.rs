//! What each pattern puts into a generated server
//!
//! This table is the single place deciding which example capabilities and
//! scaffolding a pattern gets. Language templates only decide how a tool of
//! a given [`ToolShape`] looks in their SDK.

use serde::Serialize;

use crate::core::Pattern;

/// Behaviour of an example tool, rendered differently per language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolShape {
    /// Optional string argument with a default, returns a greeting
    Greeting,
    /// Two numbers in, their sum out
    Addition,
    /// No arguments, reports status and uptime
    Health,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExampleTool {
    pub name: &'static str,
    pub description: &'static str,
    pub shape: ToolShape,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExampleResource {
    pub uri: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExamplePrompt {
    pub name: &'static str,
    pub description: &'static str,
    pub instruction: &'static str,
}

const HELLO: ExampleTool = ExampleTool {
    name: "hello",
    description: "Say hello to someone",
    shape: ToolShape::Greeting,
};

const ADD: ExampleTool = ExampleTool {
    name: "add",
    description: "Add two numbers",
    shape: ToolShape::Addition,
};

const HEALTH_CHECK: ExampleTool = ExampleTool {
    name: "health_check",
    description: "Report server health and uptime",
    shape: ToolShape::Health,
};

const SETTINGS: ExampleResource = ExampleResource {
    uri: "config://settings",
    name: "settings",
    description: "Server settings as JSON",
};

const CODE_REVIEW: ExamplePrompt = ExamplePrompt {
    name: "code_review",
    description: "Ask the model to review a piece of code",
    instruction: "Review the following code. Point out bugs, risky patterns and missing tests",
};

/// Capabilities and scaffolding for one pattern
#[derive(Debug, Clone, Serialize)]
pub struct Blueprint {
    pub pattern: Pattern,
    pub tools: Vec<ExampleTool>,
    pub resources: Vec<ExampleResource>,
    pub prompts: Vec<ExamplePrompt>,
    /// Startup/shutdown hooks around the server
    pub lifecycle: bool,
    /// Bearer-token check switched on by `MCP_AUTH_ENABLED`
    pub auth: bool,
}

impl Blueprint {
    /// The blueprint for `pattern`, or `None` when the built-in generators
    /// have no shape for it.
    pub fn for_pattern(pattern: Pattern) -> Option<Self> {
        match pattern {
            Pattern::Basic => Some(Self {
                pattern,
                tools: vec![HELLO, ADD],
                resources: vec![SETTINGS],
                prompts: Vec::new(),
                lifecycle: false,
                auth: false,
            }),
            Pattern::Enterprise => Some(Self {
                pattern,
                tools: vec![HELLO, ADD, HEALTH_CHECK],
                resources: vec![SETTINGS],
                prompts: vec![CODE_REVIEW],
                lifecycle: true,
                auth: true,
            }),
            Pattern::Microservices => None,
        }
    }

    pub fn tool_names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.name).collect()
    }

    pub fn resource_uris(&self) -> Vec<&'static str> {
        self.resources.iter().map(|r| r.uri).collect()
    }

    pub fn prompt_names(&self) -> Vec<&'static str> {
        self.prompts.iter().map(|p| p.name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_blueprint() {
        let blueprint = Blueprint::for_pattern(Pattern::Basic).unwrap();
        assert_eq!(blueprint.tool_names(), vec!["hello", "add"]);
        assert_eq!(blueprint.resource_uris(), vec!["config://settings"]);
        assert!(blueprint.prompt_names().is_empty());
        assert!(!blueprint.lifecycle);
        assert!(!blueprint.auth);
    }

    #[test]
    fn test_enterprise_extends_basic() {
        let basic = Blueprint::for_pattern(Pattern::Basic).unwrap();
        let enterprise = Blueprint::for_pattern(Pattern::Enterprise).unwrap();

        for tool in basic.tool_names() {
            assert!(enterprise.tool_names().contains(&tool));
        }
        assert!(enterprise.tool_names().contains(&"health_check"));
        assert_eq!(enterprise.prompt_names(), vec!["code_review"]);
        assert!(enterprise.lifecycle);
        assert!(enterprise.auth);
    }

    #[test]
    fn test_microservices_has_no_builtin_shape() {
        assert!(Blueprint::for_pattern(Pattern::Microservices).is_none());
    }

    #[test]
    fn test_shape_serializes_snake_case() {
        let json = serde_json::to_value(ToolShape::Greeting).unwrap();
        assert_eq!(json, "greeting");
    }
}
