//! Renders a language's file set from a blueprint
//!
//! Every language goes through the same path: one tera context built from the
//! project names and the [`Blueprint`], one render per path and per body.

use std::path::{Path, PathBuf};
use tera::Tera;
use tokio::fs;
use tracing::debug;

use crate::core::{ProjectSpec, Result};
use crate::generation::Blueprint;
use crate::languages::LanguageSupport;
use crate::templates::TemplateContext;

/// A rendered file, relative to the project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub content: String,
}

/// The shared render context for one project
pub fn render_context(
    spec: &ProjectSpec,
    blueprint: &Blueprint,
    support: &dyn LanguageSupport,
) -> tera::Context {
    let names = spec.names();
    let mut context =
        TemplateContext::for_project(names, spec.transport, spec.pattern).to_tera_context();
    context.insert("language_name", spec.language.display_name());
    context.insert("tools", &blueprint.tools);
    context.insert("resources", &blueprint.resources);
    context.insert("prompts", &blueprint.prompts);
    context.insert("lifecycle", &blueprint.lifecycle);
    context.insert("auth", &blueprint.auth);
    context.insert("install_command", support.install_command());
    context.insert("run_command", &support.run_command(names, spec.transport));
    context
}

/// Render every file the language emits for `spec`
pub fn render_project(
    spec: &ProjectSpec,
    blueprint: &Blueprint,
    support: &dyn LanguageSupport,
) -> Result<Vec<Artifact>> {
    let context = render_context(spec, blueprint, support);

    let mut tera = Tera::default();
    for file in support.files() {
        tera.add_raw_template(file.path, file.body)?;
    }

    let mut artifacts = Vec::with_capacity(support.files().len());
    for file in support.files() {
        let path = Tera::one_off(file.path, &context, false)?;
        let content = tera.render(file.path, &context)?;
        debug!(file = %path, bytes = content.len(), "Rendered file");
        artifacts.push(Artifact {
            path: PathBuf::from(path),
            content,
        });
    }
    Ok(artifacts)
}

/// Write artifacts below `root`, creating parent directories as needed
pub async fn write_artifacts(root: &Path, artifacts: &[Artifact]) -> Result<()> {
    for artifact in artifacts {
        let path = root.join(&artifact.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, &artifact.content).await?;
        debug!(file = %path.display(), "Wrote file");
    }
    Ok(())
}
