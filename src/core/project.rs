//! Project selection types: target language, architectural pattern, transport
//!
//! All three are parsed from user input before any generation happens. Parse
//! failures list the accepted values so the CLI can print them as-is.

use serde::Serialize;
use std::fmt::{self, Display};
use std::str::FromStr;

use crate::core::error::{Error, Result};
use crate::core::naming::NameForms;

/// Target languages a project can be generated in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    TypeScript,
    Go,
    Rust,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::TypeScript => "typescript",
            Language::Go => "go",
            Language::Rust => "rust",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Language::Python => "Python",
            Language::TypeScript => "TypeScript",
            Language::Go => "Go",
            Language::Rust => "Rust",
        }
    }

    /// All languages in detection priority order
    pub fn all() -> &'static [Language] {
        &[
            Language::Python,
            Language::TypeScript,
            Language::Go,
            Language::Rust,
        ]
    }
}

/// Architectural variant of a generated project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Pattern {
    #[default]
    Basic,
    Enterprise,
    /// Only available through a template tree
    Microservices,
}

impl Pattern {
    pub fn as_str(self) -> &'static str {
        match self {
            Pattern::Basic => "basic",
            Pattern::Enterprise => "enterprise",
            Pattern::Microservices => "microservices",
        }
    }

    pub fn all() -> &'static [Pattern] {
        &[Pattern::Basic, Pattern::Enterprise, Pattern::Microservices]
    }
}

/// Channel the generated server listens on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    #[default]
    Stdio,
    Sse,
    Http,
}

impl Transport {
    pub fn as_str(self) -> &'static str {
        match self {
            Transport::Stdio => "stdio",
            Transport::Sse => "sse",
            Transport::Http => "http",
        }
    }

    pub fn all() -> &'static [Transport] {
        &[Transport::Stdio, Transport::Sse, Transport::Http]
    }

    /// Whether the server binds a network port
    pub fn is_network(self) -> bool {
        !matches!(self, Transport::Stdio)
    }
}

macro_rules! impl_display_from_str {
    ($ty:ty, $what:literal, { $($($text:literal)|+ => $variant:expr),+ $(,)? }) => {
        impl Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ParseError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($($text)|+ => Ok($variant),)+
                    _ => Err(ParseError {
                        what: $what,
                        value: s.to_string(),
                        accepted: <$ty>::all().iter().map(|v| v.as_str()).collect(),
                    }),
                }
            }
        }
    };
}

impl_display_from_str!(Language, "language", {
    "python" | "py" => Language::Python,
    "typescript" | "ts" => Language::TypeScript,
    "go" | "golang" => Language::Go,
    "rust" | "rs" => Language::Rust,
});

impl_display_from_str!(Pattern, "pattern", {
    "basic" => Pattern::Basic,
    "enterprise" => Pattern::Enterprise,
    "microservices" => Pattern::Microservices,
});

impl_display_from_str!(Transport, "transport", {
    "stdio" => Transport::Stdio,
    "sse" => Transport::Sse,
    "http" => Transport::Http,
});

/// Error returned when a language, pattern or transport string is unknown
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    what: &'static str,
    value: String,
    accepted: Vec<&'static str>,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown {}: '{}'. Available: {}",
            self.what,
            self.value,
            self.accepted.join(", ")
        )
    }
}

impl std::error::Error for ParseError {}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::InvalidInput(e.to_string())
    }
}

/// A validated request to create a project
#[derive(Debug, Clone)]
pub struct ProjectSpec {
    names: NameForms,
    pub language: Language,
    pub pattern: Pattern,
    pub transport: Transport,
}

impl ProjectSpec {
    /// Validate the name and build the spec
    pub fn new(
        name: &str,
        language: Language,
        pattern: Pattern,
        transport: Transport,
    ) -> Result<Self> {
        validate_project_name(name)?;
        Ok(Self {
            names: NameForms::new(name),
            language,
            pattern,
            transport,
        })
    }

    pub fn name(&self) -> &str {
        self.names.raw()
    }

    pub fn names(&self) -> &NameForms {
        &self.names
    }
}

/// Validates project name format
pub fn validate_project_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::invalid_input("Project name cannot be empty"));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(Error::invalid_input(
            "Project name must contain only letters, digits, dashes, and underscores",
        ));
    }

    if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Err(Error::invalid_input("Project name must start with a letter"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_str() {
        assert_eq!("python".parse::<Language>().unwrap(), Language::Python);
        assert_eq!("TS".parse::<Language>().unwrap(), Language::TypeScript);
        assert_eq!("golang".parse::<Language>().unwrap(), Language::Go);
        assert_eq!("Rust".parse::<Language>().unwrap(), Language::Rust);
        assert!("java".parse::<Language>().is_err());
    }

    #[test]
    fn test_parse_error_lists_accepted_values() {
        let err = "grpc".parse::<Transport>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown transport: 'grpc'. Available: stdio, sse, http"
        );
    }

    #[test]
    fn test_pattern_round_trips_through_display() {
        for pattern in Pattern::all() {
            assert_eq!(pattern.to_string().parse::<Pattern>().unwrap(), *pattern);
        }
    }

    #[test]
    fn test_transport_is_network() {
        assert!(!Transport::Stdio.is_network());
        assert!(Transport::Sse.is_network());
        assert!(Transport::Http.is_network());
    }

    #[test]
    fn test_validate_project_name() {
        assert!(validate_project_name("hello-mcp").is_ok());
        assert!(validate_project_name("hello_mcp2").is_ok());
        assert!(validate_project_name("MyServer").is_ok());

        assert!(validate_project_name("").is_err());
        assert!(validate_project_name("-server").is_err());
        assert!(validate_project_name("2fast").is_err());
        assert!(validate_project_name("my server").is_err());
        assert!(validate_project_name("../escape").is_err());
    }

    #[test]
    fn test_project_spec_derives_names() {
        let spec = ProjectSpec::new(
            "weather-api",
            Language::Go,
            Pattern::Enterprise,
            Transport::Http,
        )
        .unwrap();
        assert_eq!(spec.name(), "weather-api");
        assert_eq!(spec.names().snake(), "weather_api");
        assert_eq!(spec.names().pascal(), "WeatherApi");
    }

    #[test]
    fn test_parse_error_converts_to_invalid_input() {
        let err: Error = "cobol".parse::<Language>().unwrap_err().into();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
