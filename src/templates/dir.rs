//! Template directory resolution
//!
//! Template trees live under `templates/<language>/<pattern>`. The
//! `templates/` directory is looked up once, in this order:
//! 1. an explicit directory (the `--template-dir` flag)
//! 2. the `MCP_SCAFFOLD_TEMPLATE_DIR` environment variable
//! 3. the package root, found by walking up from the executable, the build
//!    manifest directory and the working directory until a `Cargo.toml`
//!    naming this package is found
//! 4. `<config dir>/mcp-scaffold/templates`
//!
//! A missing tree for a language/pattern pair is not an error: callers fall
//! back to the built-in generators.

use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::{Language, Pattern};

/// Package name written in the marker `Cargo.toml`
const PACKAGE_NAME: &str = env!("CARGO_PKG_NAME");

/// Trait for reading template configuration, allowing dependency injection for testing
pub trait TemplateConfigReader {
    fn get_template_dir(&self) -> Option<String>;
    fn get_output_dir(&self) -> Option<String>;
}

/// Production implementation that reads from environment variables
pub struct EnvTemplateConfigReader;

impl TemplateConfigReader for EnvTemplateConfigReader {
    fn get_template_dir(&self) -> Option<String> {
        std::env::var("MCP_SCAFFOLD_TEMPLATE_DIR").ok()
    }

    fn get_output_dir(&self) -> Option<String> {
        std::env::var("MCP_SCAFFOLD_OUTPUT_DIR").ok()
    }
}

/// Fixed values for tests
#[cfg(test)]
pub struct MockTemplateConfigReader {
    pub template_dir: Option<String>,
    pub output_dir: Option<String>,
}

#[cfg(test)]
impl TemplateConfigReader for MockTemplateConfigReader {
    fn get_template_dir(&self) -> Option<String> {
        self.template_dir.clone()
    }

    fn get_output_dir(&self) -> Option<String> {
        self.output_dir.clone()
    }
}

/// Locates template trees for language/pattern pairs
#[derive(Debug, Clone, Default)]
pub struct TemplateResolver {
    templates_dir: Option<PathBuf>,
}

impl TemplateResolver {
    /// Use `templates_dir` as the directory holding `<language>/<pattern>` trees
    pub fn with_templates_dir(templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: Some(templates_dir.into()),
        }
    }

    /// A resolver that never finds a template tree
    pub fn none() -> Self {
        Self::default()
    }

    /// Discover the templates directory from the standard locations
    pub fn discover(custom_dir: Option<&Path>) -> Self {
        Self::discover_with_config(custom_dir, &EnvTemplateConfigReader)
    }

    pub fn discover_with_config(
        custom_dir: Option<&Path>,
        config_reader: &dyn TemplateConfigReader,
    ) -> Self {
        if let Some(dir) = custom_dir {
            debug!(dir = %dir.display(), "Using custom template directory");
            return Self::with_templates_dir(dir);
        }

        if let Some(dir) = config_reader.get_template_dir() {
            let path = PathBuf::from(dir);
            if path.is_dir() {
                debug!(dir = %path.display(), "Using template directory from environment");
                return Self::with_templates_dir(path);
            }
            debug!(dir = %path.display(), "Template directory from environment does not exist");
        }

        let from_package_root = search_starts()
            .iter()
            .find_map(|start| find_package_root(start))
            .map(|root| root.join("templates"))
            .filter(|dir| dir.is_dir());
        if let Some(dir) = from_package_root {
            debug!(dir = %dir.display(), "Using package template directory");
            return Self::with_templates_dir(dir);
        }

        let from_config = dirs::config_dir()
            .map(|config| config.join(PACKAGE_NAME).join("templates"))
            .filter(|dir| dir.is_dir());
        match from_config {
            Some(dir) => {
                debug!(dir = %dir.display(), "Using user config template directory");
                Self::with_templates_dir(dir)
            }
            None => {
                debug!("No template directory found, built-in generators only");
                Self::none()
            }
        }
    }

    pub fn templates_dir(&self) -> Option<&Path> {
        self.templates_dir.as_deref()
    }

    /// Path of the template tree for a language/pattern pair, if one exists
    pub fn resolve(&self, language: Language, pattern: Pattern) -> Option<PathBuf> {
        let candidate = self
            .templates_dir
            .as_ref()?
            .join(language.as_str())
            .join(pattern.as_str());
        let found = candidate.is_dir();
        debug!(
            path = %candidate.display(),
            found,
            "Resolved template tree"
        );
        found.then_some(candidate)
    }
}

fn search_starts() -> Vec<PathBuf> {
    let mut starts = Vec::new();

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            starts.push(exe_dir.canonicalize().unwrap_or_else(|_| exe_dir.to_path_buf()));
        }
    }

    // Development checkouts and `cargo install --path` both keep this around
    if let Some(manifest_dir) = option_env!("CARGO_MANIFEST_DIR") {
        starts.push(PathBuf::from(manifest_dir));
    }

    if let Ok(current_dir) = std::env::current_dir() {
        starts.push(current_dir);
    }

    starts
}

/// Walk `start` and its ancestors looking for this package's `Cargo.toml`
pub fn find_package_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| is_package_manifest(&dir.join("Cargo.toml")))
        .map(Path::to_path_buf)
}

fn is_package_manifest(path: &Path) -> bool {
    let Ok(content) = std::fs::read_to_string(path) else {
        return false;
    };
    toml::from_str::<toml::Value>(&content)
        .ok()
        .and_then(|manifest| {
            manifest
                .get("package")?
                .get("name")?
                .as_str()
                .map(|name| name == PACKAGE_NAME)
        })
        .unwrap_or(false)
}

/// Resolve the directory a new project is written to
///
/// Resolution order:
/// 1. custom_output_dir parameter (CLI --output-dir flag) - used as parent directory
/// 2. MCP_SCAFFOLD_OUTPUT_DIR environment variable - used as parent directory
/// 3. Default: current_dir/project_name
pub fn resolve_output_dir(
    project_name: &str,
    custom_output_dir: Option<&Path>,
    config_reader: &dyn TemplateConfigReader,
) -> io::Result<PathBuf> {
    let output_path = if let Some(custom_dir) = custom_output_dir {
        debug!("Using custom output directory: {}", custom_dir.display());
        custom_dir.join(project_name)
    } else if let Some(env_dir) = config_reader.get_output_dir() {
        let env_path = PathBuf::from(env_dir);
        debug!("Using MCP_SCAFFOLD_OUTPUT_DIR: {}", env_path.display());
        env_path.join(project_name)
    } else {
        PathBuf::from(project_name)
    };

    let absolute_path = if output_path.is_absolute() {
        output_path
    } else {
        std::env::current_dir()
            .map_err(|e| io::Error::other(format!("Failed to get current directory: {e}")))?
            .join(output_path)
    };

    debug!("Resolved output path: {}", absolute_path.display());
    Ok(absolute_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use tracing_test::traced_test;

    #[test]
    fn test_resolve_existing_tree() {
        let temp = TempDir::new().unwrap();
        let tree = temp.path().join("python").join("basic");
        fs::create_dir_all(&tree).unwrap();

        let resolver = TemplateResolver::with_templates_dir(temp.path());
        assert_eq!(resolver.resolve(Language::Python, Pattern::Basic), Some(tree));
    }

    #[test]
    fn test_resolve_missing_tree_is_absent() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("python").join("basic")).unwrap();

        let resolver = TemplateResolver::with_templates_dir(temp.path());
        assert_eq!(resolver.resolve(Language::Python, Pattern::Enterprise), None);
        assert_eq!(resolver.resolve(Language::Go, Pattern::Basic), None);
        assert_eq!(TemplateResolver::none().resolve(Language::Go, Pattern::Basic), None);
    }

    #[test]
    fn test_custom_dir_wins_over_environment() {
        let custom = TempDir::new().unwrap();
        let env = TempDir::new().unwrap();
        let reader = MockTemplateConfigReader {
            template_dir: Some(env.path().to_string_lossy().to_string()),
            output_dir: None,
        };

        let resolver = TemplateResolver::discover_with_config(Some(custom.path()), &reader);
        assert_eq!(resolver.templates_dir(), Some(custom.path()));

        let resolver = TemplateResolver::discover_with_config(None, &reader);
        assert_eq!(resolver.templates_dir(), Some(env.path()));
    }

    #[test]
    #[traced_test]
    fn test_missing_env_dir_is_logged_and_skipped() {
        let reader = MockTemplateConfigReader {
            template_dir: Some("/definitely/not/here/templates".to_string()),
            output_dir: None,
        };
        let resolver = TemplateResolver::discover_with_config(None, &reader);
        assert_ne!(
            resolver.templates_dir(),
            Some(Path::new("/definitely/not/here/templates"))
        );
        assert!(logs_contain("does not exist"));
    }

    #[test]
    fn test_find_package_root_walks_ancestors() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("Cargo.toml"),
            format!("[package]\nname = \"{PACKAGE_NAME}\"\nversion = \"0.1.0\"\n"),
        )
        .unwrap();
        let nested = temp.path().join("target").join("debug");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_package_root(&nested), Some(temp.path().to_path_buf()));
    }

    #[test]
    fn test_find_package_root_ignores_other_packages() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("Cargo.toml"),
            "[package]\nname = \"someone-else\"\n",
        )
        .unwrap();

        // The temp dir's ancestors never contain this package's manifest
        assert_eq!(find_package_root(temp.path()), None);
    }

    #[test]
    fn test_resolve_output_dir_order() {
        let reader = MockTemplateConfigReader {
            template_dir: None,
            output_dir: Some("/srv/projects".to_string()),
        };

        let custom = resolve_output_dir("demo", Some(Path::new("/tmp/out")), &reader).unwrap();
        assert_eq!(custom, PathBuf::from("/tmp/out/demo"));

        let from_env = resolve_output_dir("demo", None, &reader).unwrap();
        assert_eq!(from_env, PathBuf::from("/srv/projects/demo"));

        let reader = MockTemplateConfigReader {
            template_dir: None,
            output_dir: None,
        };
        let default = resolve_output_dir("demo", None, &reader).unwrap();
        assert_eq!(default, std::env::current_dir().unwrap().join("demo"));
    }
}
