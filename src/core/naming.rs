//! Project name case conversions
//!
//! Every generator and template receives the project name in three shapes.
//! An uppercase letter always starts a new word, and `-`/`_` are
//! interchangeable separators.

use serde::Serialize;

/// Converts a project name to snake_case.
///
/// # Examples
/// ```
/// use mcp_scaffold::core::naming::to_snake;
///
/// assert_eq!(to_snake("MyProject"), "my_project");
/// assert_eq!(to_snake("hello-mcp"), "hello_mcp");
/// ```
pub fn to_snake(name: &str) -> String {
    split_words(name, '_')
}

/// Converts a project name to kebab-case.
///
/// # Examples
/// ```
/// use mcp_scaffold::core::naming::to_kebab;
///
/// assert_eq!(to_kebab("MyProject"), "my-project");
/// assert_eq!(to_kebab("hello_mcp"), "hello-mcp");
/// ```
pub fn to_kebab(name: &str) -> String {
    split_words(name, '-')
}

/// Converts a project name to PascalCase.
///
/// Segments are delimited by `-` or `_`; each segment keeps only its first
/// letter uppercase.
///
/// # Examples
/// ```
/// use mcp_scaffold::core::naming::to_pascal;
///
/// assert_eq!(to_pascal("my-project"), "MyProject");
/// assert_eq!(to_pascal("my_project"), "MyProject");
/// ```
pub fn to_pascal(name: &str) -> String {
    name.split(['-', '_'])
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
            }
        })
        .collect()
}

fn split_words(name: &str, separator: char) -> String {
    let mut result = String::with_capacity(name.len() + 4);

    for (i, ch) in name.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                result.push(separator);
            }
            result.extend(ch.to_lowercase());
        } else if ch == '-' || ch == '_' {
            result.push(separator);
        } else {
            result.push(ch);
        }
    }

    match result.strip_prefix(separator) {
        Some(stripped) => stripped.to_string(),
        None => result,
    }
}

/// The three case variants of a project name, computed once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameForms {
    raw: String,
    snake: String,
    pascal: String,
    kebab: String,
}

impl NameForms {
    pub fn new(name: &str) -> Self {
        Self {
            raw: name.to_string(),
            snake: to_snake(name),
            pascal: to_pascal(name),
            kebab: to_kebab(name),
        }
    }

    /// The name exactly as the user typed it
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn snake(&self) -> &str {
        &self.snake
    }

    pub fn pascal(&self) -> &str {
        &self.pascal
    }

    pub fn kebab(&self) -> &str {
        &self.kebab
    }
}
