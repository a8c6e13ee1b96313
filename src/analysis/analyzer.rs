//! Capability discovery for a project directory

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use crate::analysis::AnalysisResult;
use crate::core::{Error, Language, NameForms, Result};
use crate::languages::{LanguageSupport, detect_language, registry};

/// Detect the project's language, then analyze it
pub async fn analyze_project(path: &Path) -> Result<AnalysisResult> {
    ensure_exists(path).await?;
    let language = detect_language(path)
        .await
        .ok_or_else(|| Error::LanguageNotDetected(path.to_path_buf()))?;
    analyze(path, language).await
}

/// Scan the project's capability source for declared tools, resources and
/// prompts.
///
/// A project without any recognised source file yields an empty result.
pub async fn analyze(path: &Path, language: Language) -> Result<AnalysisResult> {
    ensure_exists(path).await?;
    let support = registry().get(language)?;
    let project_name = read_project_name(path, support.as_ref()).await;
    let names = NameForms::new(&project_name);

    let Some(source) = locate_capability_source(path, support.as_ref(), &names).await else {
        debug!(path = %path.display(), %language, "No capability source found");
        return Ok(AnalysisResult::empty(project_name, language));
    };

    let text = fs::read_to_string(&source).await?;
    let capabilities = support.extractor().extract(&text);
    let result = AnalysisResult::from_capabilities(project_name, language, capabilities);
    info!(
        source = %source.display(),
        tools = result.tools.len(),
        resources = result.resources.len(),
        prompts = result.prompts.len(),
        "Analyzed project"
    );
    Ok(result)
}

/// First existing capability source below `root`, in the language's lookup order
pub async fn locate_capability_source(
    root: &Path,
    support: &dyn LanguageSupport,
    names: &NameForms,
) -> Option<PathBuf> {
    first_existing(root, support.capability_sources(names)).await
}

/// First of `candidates` (relative to `root`) that is a file
pub(crate) async fn first_existing(root: &Path, candidates: Vec<PathBuf>) -> Option<PathBuf> {
    for candidate in candidates {
        let path = root.join(&candidate);
        if fs::metadata(&path).await.is_ok_and(|m| m.is_file()) {
            debug!(file = %path.display(), "Found candidate");
            return Some(path);
        }
    }
    None
}

/// Project name from the manifest, falling back to the directory name
pub async fn read_project_name(root: &Path, support: &dyn LanguageSupport) -> String {
    let manifest = root.join(support.manifest_file());
    if let Ok(text) = fs::read_to_string(&manifest).await {
        if let Some(name) = support.project_name(&text) {
            return name;
        }
    }

    let dir = fs::canonicalize(root)
        .await
        .unwrap_or_else(|_| root.to_path_buf());
    dir.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "project".to_string())
}

pub(crate) async fn ensure_exists(path: &Path) -> Result<()> {
    if fs::try_exists(path).await? {
        Ok(())
    } else {
        Err(Error::NotFound(path.to_path_buf()))
    }
}
