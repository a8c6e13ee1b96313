//! Creating a new project on disk
//!
//! Generation happens in a staging directory next to the target and is
//! renamed into place only once every file is written, so a failure never
//! leaves a half-populated project behind.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::core::{Error, Language, Pattern, ProjectSpec, Result, Transport};
use crate::generation::{Blueprint, render_project, write_artifacts};
use crate::infrastructure::{CommandExecutor, run_checked};
use crate::languages::{LanguageSupport, registry};
use crate::templates::{TemplateContext, TemplateResolver, materialize};

/// Post-generation steps to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaffoldOptions {
    pub init_git: bool,
    pub install_dependencies: bool,
}

impl Default for ScaffoldOptions {
    fn default() -> Self {
        Self {
            init_git: true,
            install_dependencies: true,
        }
    }
}

impl ScaffoldOptions {
    /// Write files only
    pub fn files_only() -> Self {
        Self {
            init_git: false,
            install_dependencies: false,
        }
    }
}

/// Where the generated files came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "path")]
pub enum GenerationSource {
    /// Materialized from an on-disk template tree
    Template(PathBuf),
    /// Rendered by the built-in generator
    Builtin,
}

/// What `create_project` did
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaffoldSummary {
    pub path: PathBuf,
    pub language: Language,
    pub pattern: Pattern,
    pub transport: Transport,
    pub source: GenerationSource,
    pub files: usize,
    pub commands: Vec<String>,
}

enum Plan {
    Template(PathBuf),
    Builtin(Blueprint),
}

/// Generate the project described by `spec` at `target`.
///
/// `target` must not exist. Template trees found by `resolver` take
/// precedence over the built-in generator.
pub async fn create_project(
    spec: &ProjectSpec,
    target: &Path,
    resolver: &TemplateResolver,
    options: ScaffoldOptions,
    executor: &dyn CommandExecutor,
) -> Result<ScaffoldSummary> {
    if fs::try_exists(target).await? {
        return Err(Error::AlreadyExists(target.to_path_buf()));
    }

    let support = registry().get(spec.language)?;
    let plan = match resolver.resolve(spec.language, spec.pattern) {
        Some(tree) => Plan::Template(tree),
        None => Plan::Builtin(Blueprint::for_pattern(spec.pattern).ok_or(
            Error::UnsupportedPattern {
                language: spec.language,
                pattern: spec.pattern,
            },
        )?),
    };

    let dir_name = target
        .file_name()
        .ok_or_else(|| Error::invalid_input(format!("Invalid target path: {}", target.display())))?;
    let parent = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).await?;

    let staging = tempfile::Builder::new()
        .prefix(".mcp-scaffold-")
        .tempdir_in(&parent)?;
    let staged = staging.path().join(dir_name);
    debug!(staging = %staged.display(), "Staging project");

    let (source, files) = match plan {
        Plan::Template(tree) => {
            let context = TemplateContext::for_project(spec.names(), spec.transport, spec.pattern);
            let files = materialize(&tree, &staged, &context).await?;
            (GenerationSource::Template(tree), files)
        }
        Plan::Builtin(blueprint) => {
            let artifacts = render_project(spec, &blueprint, support.as_ref())?;
            fs::create_dir_all(&staged).await?;
            write_artifacts(&staged, &artifacts).await?;
            (GenerationSource::Builtin, artifacts.len())
        }
    };

    if fs::try_exists(target).await? {
        return Err(Error::AlreadyExists(target.to_path_buf()));
    }
    fs::rename(&staged, target).await?;
    if let Err(e) = staging.close() {
        warn!(error = %e, "Failed to remove staging directory");
    }
    info!(
        project = spec.name(),
        path = %target.display(),
        files,
        "Project generated"
    );

    let commands = run_post_steps(support.as_ref(), target, options, executor).await?;

    Ok(ScaffoldSummary {
        path: target.to_path_buf(),
        language: spec.language,
        pattern: spec.pattern,
        transport: spec.transport,
        source,
        files,
        commands,
    })
}

async fn run_post_steps(
    support: &dyn LanguageSupport,
    target: &Path,
    options: ScaffoldOptions,
    executor: &dyn CommandExecutor,
) -> Result<Vec<String>> {
    let mut commands = Vec::new();
    if options.init_git {
        commands.push("git init".to_string());
    }
    if options.install_dependencies {
        commands.push(support.install_command().to_string());
    }

    for command in &commands {
        info!(command = %command, "Running post-generation step");
        run_checked(executor, command, target).await?;
    }
    Ok(commands)
}
