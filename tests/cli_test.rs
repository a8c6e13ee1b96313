//! Integration tests for the mcp-scaffold binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn mcp_scaffold() -> Command {
    let mut cmd = Command::cargo_bin("mcp-scaffold").unwrap();
    cmd.env_remove("MCP_SCAFFOLD_TEMPLATE_DIR")
        .env_remove("MCP_SCAFFOLD_OUTPUT_DIR")
        .env_remove("RUST_LOG");
    cmd
}

/// Generate `name` below `dir` without git or dependency installation
fn new_project(dir: &Path, templates: &Path, name: &str, language: &str, pattern: &str) {
    mcp_scaffold()
        .args(["new", name, "--language", language, "--pattern", pattern])
        .arg("--output-dir")
        .arg(dir)
        .arg("--template-dir")
        .arg(templates)
        .args(["--no-git", "--no-install"])
        .assert()
        .success();
}

#[test]
fn test_new_python_project() {
    let out = TempDir::new().unwrap();
    let templates = TempDir::new().unwrap();

    mcp_scaffold()
        .args(["new", "hello-mcp", "--language", "python"])
        .arg("--output-dir")
        .arg(out.path())
        .arg("--template-dir")
        .arg(templates.path())
        .args(["--no-git", "--no-install"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created hello-mcp (Python basic, stdio)"))
        .stdout(predicate::str::contains("built-in generator"))
        .stdout(predicate::str::contains("pip install -e ."))
        .stdout(predicate::str::contains("python -m hello_mcp"));

    assert!(out.path().join("hello-mcp/pyproject.toml").is_file());
    assert!(out.path().join("hello-mcp/hello_mcp/server.py").is_file());
}

#[test]
fn test_new_rejects_unknown_language() {
    let out = TempDir::new().unwrap();

    mcp_scaffold()
        .args(["new", "demo", "--language", "cobol", "--no-git", "--no-install"])
        .arg("--output-dir")
        .arg(out.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown language: 'cobol'"))
        .stderr(predicate::str::contains("python, typescript, go, rust"));

    assert!(!out.path().join("demo").exists());
}

#[test]
fn test_new_rejects_existing_directory() {
    let out = TempDir::new().unwrap();
    fs::create_dir(out.path().join("taken")).unwrap();

    mcp_scaffold()
        .args(["new", "taken", "--language", "go", "--no-git", "--no-install"])
        .arg("--output-dir")
        .arg(out.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_new_microservices_without_template_fails() {
    let out = TempDir::new().unwrap();
    let templates = TempDir::new().unwrap();

    mcp_scaffold()
        .args(["new", "svc", "--language", "rust", "--pattern", "microservices"])
        .arg("--output-dir")
        .arg(out.path())
        .arg("--template-dir")
        .arg(templates.path())
        .args(["--no-git", "--no-install"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("microservices"));

    assert!(!out.path().join("svc").exists());
}

#[test]
fn test_analyze_json() {
    let out = TempDir::new().unwrap();
    let templates = TempDir::new().unwrap();
    new_project(out.path(), templates.path(), "ts-tools", "typescript", "enterprise");

    let output = mcp_scaffold()
        .args(["analyze", "--json"])
        .arg(out.path().join("ts-tools"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["projectName"], "ts-tools");
    assert_eq!(json["language"], "typescript");
    assert_eq!(json["tools"].as_array().unwrap().len(), 3);
    assert_eq!(json["prompts"][0]["identifier"], "code_review");
}

#[test]
fn test_diagram_to_stdout_and_file() {
    let out = TempDir::new().unwrap();
    let templates = TempDir::new().unwrap();
    new_project(out.path(), templates.path(), "go-srv", "go", "basic");
    let project = out.path().join("go-srv");

    mcp_scaffold()
        .arg("diagram")
        .arg(&project)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("graph TD"))
        .stdout(predicate::str::contains("go-srv<br/>(Go)"))
        .stdout(predicate::str::contains("tool_1[\"add\"]"));

    let file = out.path().join("diagram.md");
    mcp_scaffold()
        .arg("diagram")
        .arg(&project)
        .args(["--format", "markdown", "--output"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Diagram written to"));
    assert!(fs::read_to_string(&file).unwrap().starts_with("```mermaid\n"));
}

#[test]
fn test_diagram_rejects_image_formats() {
    mcp_scaffold()
        .args(["diagram", ".", "--format", "png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not supported"));
}

#[test]
fn test_diagram_refuses_image_output_file() {
    let out = TempDir::new().unwrap();
    let templates = TempDir::new().unwrap();
    new_project(out.path(), templates.path(), "img-srv", "python", "basic");
    let file = out.path().join("graph.png");

    mcp_scaffold()
        .arg("diagram")
        .arg(out.path().join("img-srv"))
        .arg("--output")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Image output '.png' is not supported"));
    assert!(!file.exists());
}

#[test]
fn test_validate_reports_and_exit_status() {
    let out = TempDir::new().unwrap();
    let templates = TempDir::new().unwrap();
    new_project(out.path(), templates.path(), "rs-srv", "rust", "basic");
    let project = out.path().join("rs-srv");

    mcp_scaffold()
        .arg("validate")
        .arg(&project)
        .assert()
        .success()
        .stdout(predicate::str::contains("is a valid MCP server project"));

    fs::remove_file(project.join("src/main.rs")).unwrap();
    mcp_scaffold()
        .args(["validate", "--json"])
        .arg(&project)
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"valid\": false"))
        .stdout(predicate::str::contains("Missing entry point"));
}

#[test]
fn test_validate_missing_path() {
    let out = TempDir::new().unwrap();

    mcp_scaffold()
        .arg("validate")
        .arg(out.path().join("nowhere"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Path not found"));
}

#[test]
fn test_add_tool() {
    let out = TempDir::new().unwrap();
    let templates = TempDir::new().unwrap();
    new_project(out.path(), templates.path(), "py-srv", "python", "basic");
    let project = out.path().join("py-srv");

    mcp_scaffold()
        .args(["add", "tool", "fetch-weather", "--path"])
        .arg(&project)
        .assert()
        .success()
        .stdout(predicate::str::contains("Added tool 'fetch_weather'"));

    mcp_scaffold()
        .arg("analyze")
        .arg(&project)
        .assert()
        .success()
        .stdout(predicate::str::contains("Tools (3):"))
        .stdout(predicate::str::contains("  - fetch_weather"));

    mcp_scaffold()
        .args(["add", "tool", "fetch_weather", "--path"])
        .arg(&project)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_list() {
    mcp_scaffold()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("python, typescript, go, rust"))
        .stdout(predicate::str::contains("basic, enterprise, microservices"))
        .stdout(predicate::str::contains("stdio, sse, http"))
        .stdout(predicate::str::contains("mermaid, markdown"));
}
