//! Template trees on disk: resolution, materialization and analysis of the result

mod common;

use common::NoCommands;
use mcp_scaffold::analysis::{CapabilityKind, analyze_project, validate_project};
use mcp_scaffold::core::{Language, NameForms, Pattern, ProjectSpec, Transport};
use mcp_scaffold::generation::{GenerationSource, ScaffoldOptions, create_project};
use mcp_scaffold::templates::{TemplateContext, TemplateResolver, materialize};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SERVER_PY: &str = r#"from mcp.server.fastmcp import FastMCP

mcp = FastMCP("{{ projectName }}")


@mcp.tool()
def ping() -> str:
    return "pong from {{ projectNamePascal }}"


@mcp.resource("{{ projectNameSnake }}://status")
def status() -> str:
    return "{{ transport }}"


# mcp-scaffold:tools
"#;

const PYPROJECT: &str = r#"[project]
name = "{{ projectNameKebab }}"
dependencies = ["mcp[cli]>=1.9.0"]
"#;

fn write(path: &Path, content: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn python_microservices_tree(root: &Path) {
    let tree = root.join("python").join("microservices");
    write(&tree.join("pyproject.toml.tera"), PYPROJECT.as_bytes());
    write(
        &tree.join("__projectNameSnake__/server.py.hbs"),
        SERVER_PY.as_bytes(),
    );
    write(&tree.join("__projectNameSnake__/__init__.py"), b"");
    write(&tree.join("__projectNameSnake__/__main__.py"), b"");
    write(&tree.join("README.md"), b"# Orders\n");
    write(&tree.join(".gitignore"), b"__pycache__/\n");
    write(&tree.join("assets/logo.bin"), &[0xff, 0x00, 0x7b, 0x7b]);
}

#[tokio::test]
async fn test_materialize_substitutes_names_and_contents() {
    let templates = TempDir::new().unwrap();
    python_microservices_tree(templates.path());
    let tree = templates.path().join("python/microservices");

    let out = TempDir::new().unwrap();
    let target = out.path().join("order-service");
    let context = TemplateContext::for_project(
        &NameForms::new("order-service"),
        Transport::Sse,
        Pattern::Microservices,
    );
    let written = materialize(&tree, &target, &context).await.unwrap();

    assert_eq!(written, 7);
    let server = fs::read_to_string(target.join("order_service/server.py")).unwrap();
    assert!(server.contains("FastMCP(\"order-service\")"));
    assert!(server.contains("pong from OrderService"));
    assert!(server.contains("@mcp.resource(\"order_service://status\")"));
    assert!(!target.join("order_service/server.py.hbs").exists());
    assert_eq!(
        fs::read(target.join("assets/logo.bin")).unwrap(),
        vec![0xff, 0x00, 0x7b, 0x7b]
    );
}

#[tokio::test]
async fn test_microservices_template_round_trip() {
    let templates = TempDir::new().unwrap();
    python_microservices_tree(templates.path());

    let out = TempDir::new().unwrap();
    let target = out.path().join("order-service");
    let spec = ProjectSpec::new(
        "order-service",
        Language::Python,
        Pattern::Microservices,
        Transport::Http,
    )
    .unwrap();
    let summary = create_project(
        &spec,
        &target,
        &TemplateResolver::with_templates_dir(templates.path()),
        ScaffoldOptions::files_only(),
        &NoCommands,
    )
    .await
    .unwrap();
    assert!(matches!(summary.source, GenerationSource::Template(_)));

    let analysis = analyze_project(&target).await.unwrap();
    assert_eq!(analysis.project_name, "order-service");
    assert_eq!(analysis.identifiers(CapabilityKind::Tool), vec!["ping"]);
    assert_eq!(
        analysis.identifiers(CapabilityKind::Resource),
        vec!["order_service://status"]
    );

    let report = validate_project(&target).await.unwrap();
    assert!(report.valid(), "{report:?}");
}

#[tokio::test]
async fn test_missing_tree_falls_back_to_builtin() {
    let templates = TempDir::new().unwrap();
    python_microservices_tree(templates.path());

    let out = TempDir::new().unwrap();
    let target = out.path().join("plain");
    let spec = ProjectSpec::new("plain", Language::Python, Pattern::Basic, Transport::Stdio)
        .unwrap();
    let summary = create_project(
        &spec,
        &target,
        &TemplateResolver::with_templates_dir(templates.path()),
        ScaffoldOptions::files_only(),
        &NoCommands,
    )
    .await
    .unwrap();

    assert_eq!(summary.source, GenerationSource::Builtin);
    assert!(target.join("plain/server.py").is_file());
}
