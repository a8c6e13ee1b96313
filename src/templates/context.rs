//! Substitution context shared by template trees

use std::collections::BTreeMap;

use crate::core::{NameForms, Pattern, Transport};

pub const PROJECT_NAME: &str = "projectName";
pub const PROJECT_NAME_SNAKE: &str = "projectNameSnake";
pub const PROJECT_NAME_PASCAL: &str = "projectNamePascal";
pub const PROJECT_NAME_KEBAB: &str = "projectNameKebab";
pub const TRANSPORT: &str = "transport";
pub const PATTERN: &str = "pattern";

/// Placeholder key to substitution value.
///
/// Keys appear as `__key__` in file and directory names and as
/// `{{ key }}` inside template file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateContext {
    values: BTreeMap<String, String>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the standard context for a project
    pub fn for_project(names: &NameForms, transport: Transport, pattern: Pattern) -> Self {
        let mut context = Self::new();
        context.insert(PROJECT_NAME, names.raw());
        context.insert(PROJECT_NAME_SNAKE, names.snake());
        context.insert(PROJECT_NAME_PASCAL, names.pascal());
        context.insert(PROJECT_NAME_KEBAB, names.kebab());
        context.insert(TRANSPORT, transport.as_str());
        context.insert(PATTERN, pattern.as_str());
        context
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Replace every `__key__` marker in a file or directory name.
    /// Markers for keys not in the context are left untouched.
    pub fn substitute_name(&self, name: &str) -> String {
        self.values
            .iter()
            .fold(name.to_string(), |acc, (key, value)| {
                acc.replace(&format!("__{key}__"), value)
            })
    }

    pub fn to_tera_context(&self) -> tera::Context {
        let mut context = tera::Context::new();
        for (key, value) in &self.values {
            context.insert(key.as_str(), value);
        }
        context
    }
}
