//! Registry of language support implementations

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::core::{Error, Language, Result};
use crate::languages::{LanguageSupport, go::GoSupport, python::PythonSupport};
use crate::languages::{rust::RustSupport, typescript::TypeScriptSupport};

static REGISTRY: Lazy<LanguageRegistry> = Lazy::new(LanguageRegistry::new);

/// The registry holding the built-in languages
pub fn registry() -> &'static LanguageRegistry {
    &REGISTRY
}

/// Detect the language of the project at `path` using the built-in registry
pub async fn detect_language(path: &Path) -> Option<Language> {
    registry().detect(path).await
}

/// Registry that maps each language to its support implementation
pub struct LanguageRegistry {
    supports: HashMap<Language, Arc<dyn LanguageSupport>>,
}

impl LanguageRegistry {
    /// Create a new registry with the built-in languages
    pub fn new() -> Self {
        let mut registry = Self {
            supports: HashMap::new(),
        };
        registry.register(Arc::new(PythonSupport));
        registry.register(Arc::new(TypeScriptSupport));
        registry.register(Arc::new(GoSupport));
        registry.register(Arc::new(RustSupport));
        registry
    }

    /// Register (or replace) the support for its language
    pub fn register(&mut self, support: Arc<dyn LanguageSupport>) {
        self.supports.insert(support.language(), support);
    }

    pub fn get(&self, language: Language) -> Result<Arc<dyn LanguageSupport>> {
        self.supports
            .get(&language)
            .cloned()
            .ok_or(Error::UnsupportedLanguage(language))
    }

    pub fn supported_languages(&self) -> Vec<Language> {
        Language::all()
            .iter()
            .copied()
            .filter(|language| self.supports.contains_key(language))
            .collect()
    }

    /// Classify a project directory by its manifest file.
    ///
    /// Languages are checked in [`Language::all`] order and the first
    /// manifest found wins.
    pub async fn detect(&self, path: &Path) -> Option<Language> {
        for language in self.supported_languages() {
            let support = self.supports.get(&language)?;
            let manifest = path.join(support.manifest_file());
            if tokio::fs::try_exists(&manifest).await.unwrap_or(false) {
                debug!(language = %language, manifest = %manifest.display(), "Detected language");
                return Some(language);
            }
        }
        debug!(path = %path.display(), "No known manifest found");
        None
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_detect_each_language() {
        let cases = [
            ("pyproject.toml", Language::Python),
            ("package.json", Language::TypeScript),
            ("go.mod", Language::Go),
            ("Cargo.toml", Language::Rust),
        ];
        for (manifest, expected) in cases {
            let temp = TempDir::new().unwrap();
            fs::write(temp.path().join(manifest), "").unwrap();
            assert_eq!(detect_language(temp.path()).await, Some(expected));
        }
    }

    #[tokio::test]
    async fn test_detect_priority_order() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("Cargo.toml"), "").unwrap();
        fs::write(temp.path().join("package.json"), "{}").unwrap();
        assert_eq!(detect_language(temp.path()).await, Some(Language::TypeScript));

        fs::write(temp.path().join("pyproject.toml"), "").unwrap();
        assert_eq!(detect_language(temp.path()).await, Some(Language::Python));
    }

    #[tokio::test]
    async fn test_detect_nothing() {
        let temp = TempDir::new().unwrap();
        assert_eq!(detect_language(temp.path()).await, None);
        assert_eq!(detect_language(&temp.path().join("missing")).await, None);
    }

    #[test]
    fn test_registry_has_all_languages() {
        let registry = LanguageRegistry::new();
        assert_eq!(registry.supported_languages(), Language::all().to_vec());
        for language in Language::all() {
            assert_eq!(registry.get(*language).unwrap().language(), *language);
        }
    }
}
