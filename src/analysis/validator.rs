//! Structural validation of MCP server projects
//!
//! Checks run in a fixed order and only ever append findings. Errors make a
//! project invalid; warnings are advisory.

use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

use crate::analysis::analyzer::{ensure_exists, first_existing, read_project_name};
use crate::analysis::analyze;
use crate::core::{Error, Language, NameForms, Result};
use crate::languages::{LanguageSupport, detect_language, registry};

/// Findings of one validation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// True exactly when no errors were recorded
    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Serialize for ValidationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationResult", 3)?;
        state.serialize_field("valid", &self.valid())?;
        state.serialize_field("errors", &self.errors)?;
        state.serialize_field("warnings", &self.warnings)?;
        state.end()
    }
}

/// Detect the project's language, then validate it
pub async fn validate_project(path: &Path) -> Result<ValidationResult> {
    ensure_exists(path).await?;
    let language = detect_language(path)
        .await
        .ok_or_else(|| Error::LanguageNotDetected(path.to_path_buf()))?;
    validate(path, language).await
}

/// Validate the project at `path` as a `language` project
pub async fn validate(path: &Path, language: Language) -> Result<ValidationResult> {
    ensure_exists(path).await?;
    let support = registry().get(language)?;

    let mut result = ValidationResult::new();
    check_common_files(path, &mut result).await?;
    check_language(path, language, support.as_ref(), &mut result).await?;

    info!(
        path = %path.display(),
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        "Validation finished"
    );
    Ok(result)
}

async fn check_common_files(path: &Path, result: &mut ValidationResult) -> Result<()> {
    if !has_readme(path).await? {
        result.warning("Missing README file");
    }
    if !fs::try_exists(path.join(".gitignore")).await? {
        result.warning("Missing .gitignore file");
    }
    if fs::try_exists(path.join(".env")).await? {
        result.warning(".env file present; make sure it is not committed");
    }
    Ok(())
}

async fn has_readme(path: &Path) -> Result<bool> {
    let mut entries = fs::read_dir(path).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().to_uppercase();
        if name == "README" || name.starts_with("README.") {
            return Ok(true);
        }
    }
    Ok(false)
}

async fn check_language(
    path: &Path,
    language: Language,
    support: &dyn LanguageSupport,
    result: &mut ValidationResult,
) -> Result<()> {
    let manifest_path = path.join(support.manifest_file());
    let manifest = match fs::read_to_string(&manifest_path).await {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            result.error(format!("Missing manifest: {}", support.manifest_file()));
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    for problem in support.check_manifest(&manifest) {
        result.error(problem);
    }

    let names = NameForms::new(&read_project_name(path, support).await);
    let entry_points = support.entry_points(&names);
    let expected = entry_points
        .iter()
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .collect::<Vec<_>>()
        .join(", ");
    match first_existing(path, entry_points).await {
        Some(entry) => debug!(entry = %entry.display(), "Entry point found"),
        None => result.error(format!("Missing entry point: expected one of {expected}")),
    }

    let analysis = analyze(path, language).await?;
    if analysis.tools.is_empty() {
        result.warning("No tools defined");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use tempfile::TempDir;

    const PYPROJECT: &str = "[project]\nname = \"demo\"\ndependencies = [\"mcp[cli]>=1.9.0\"]\n";

    #[test]
    fn test_valid_is_derived_from_errors() {
        let mut result = ValidationResult::new();
        assert!(result.valid());
        result.warning("advisory");
        assert!(result.valid());
        result.error("broken");
        assert!(!result.valid());
    }

    #[test]
    fn test_serializes_valid_flag() {
        let mut result = ValidationResult::new();
        result.error("broken");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["valid"], false);
        assert_eq!(json["errors"][0], "broken");
        assert_eq!(json["warnings"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_manifest_without_entry_point_is_one_error() {
        let temp = TempDir::new().unwrap();
        std_fs::write(temp.path().join("pyproject.toml"), PYPROJECT).unwrap();

        let result = validate(temp.path(), Language::Python).await.unwrap();
        assert!(!result.valid());
        assert_eq!(result.errors().len(), 1);
        assert!(result.errors()[0].contains("entry point"));
        assert!(result.warnings().iter().any(|w| w == "No tools defined"));
    }

    #[tokio::test]
    async fn test_missing_manifest_short_circuits() {
        let temp = TempDir::new().unwrap();
        std_fs::write(temp.path().join("README.md"), "# x").unwrap();
        std_fs::write(temp.path().join(".gitignore"), "").unwrap();

        let result = validate(temp.path(), Language::Rust).await.unwrap();
        assert_eq!(result.errors(), ["Missing manifest: Cargo.toml"]);
        assert!(result.warnings().is_empty());
    }

    #[tokio::test]
    async fn test_common_file_warnings() {
        let temp = TempDir::new().unwrap();
        std_fs::write(temp.path().join(".env"), "MCP_AUTH_TOKEN=secret").unwrap();
        std_fs::write(temp.path().join("go.mod"), "module demo\n").unwrap();

        let result = validate(temp.path(), Language::Go).await.unwrap();
        let warnings = result.warnings();
        assert!(warnings.contains(&"Missing README file".to_string()));
        assert!(warnings.contains(&"Missing .gitignore file".to_string()));
        assert!(warnings.iter().any(|w| w.starts_with(".env file present")));
    }

    #[tokio::test]
    async fn test_missing_dependency_is_an_error() {
        let temp = TempDir::new().unwrap();
        std_fs::write(temp.path().join("package.json"), r#"{"name": "demo"}"#).unwrap();
        std_fs::create_dir(temp.path().join("src")).unwrap();
        std_fs::write(
            temp.path().join("src/index.ts"),
            "server.tool(\"ping\", async () => ({ content: [] }));\n",
        )
        .unwrap();

        let result = validate(temp.path(), Language::TypeScript).await.unwrap();
        assert_eq!(result.errors().len(), 1);
        assert!(result.errors()[0].contains("@modelcontextprotocol/sdk"));
        assert!(!result.warnings().iter().any(|w| w == "No tools defined"));
    }

    #[tokio::test]
    async fn test_validate_project_detects_language() {
        let temp = TempDir::new().unwrap();
        std_fs::write(temp.path().join("pyproject.toml"), PYPROJECT).unwrap();
        std_fs::create_dir(temp.path().join("demo")).unwrap();
        std_fs::write(
            temp.path().join("demo/server.py"),
            "@mcp.tool()\ndef ping() -> str:\n    return \"pong\"\n",
        )
        .unwrap();
        std_fs::write(temp.path().join("README.md"), "# demo").unwrap();
        std_fs::write(temp.path().join(".gitignore"), ".env\n").unwrap();

        let result = validate_project(temp.path()).await.unwrap();
        assert!(result.valid(), "{result:?}");
        assert!(result.warnings().is_empty(), "{result:?}");
    }
}
