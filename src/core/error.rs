//! Error handling for the mcp-scaffold library.
//!
//! This module defines the main error type `Error` used throughout the library,
//! along with a convenient `Result` type alias. Validation findings are not
//! errors; they are reported through `ValidationResult`.
//!
//! # Examples
//!
//! ```
//! use mcp_scaffold::core::error::{Error, Result};
//!
//! fn might_fail() -> Result<()> {
//!     Err(Error::invalid_input("project name cannot be empty"))
//! }
//!
//! assert!(might_fail().is_err());
//! ```

use std::path::PathBuf;
use thiserror::Error;

use crate::core::project::{Language, Pattern};

/// Result type for mcp-scaffold operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for mcp-scaffold operations
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Template engine error
    #[error("Template engine error: {0}")]
    Template(#[from] tera::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Rejected user input (bad name, bad enum value)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Target directory for a new project already exists
    #[error("Directory already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    /// Project path passed to diagram/validate/add does not exist
    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),

    /// No language support is registered for this language
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(Language),

    /// No generator branch exists for this language/pattern pair
    #[error("Pattern '{pattern}' has no generator for {language}; provide a template tree for it")]
    UnsupportedPattern { language: Language, pattern: Pattern },

    /// No characteristic manifest found in the project directory
    #[error("Could not detect project language in {}", .0.display())]
    LanguageNotDetected(PathBuf),

    /// Capability source file has no insertion marker for the requested kind
    #[error("No '{marker}' marker found in {}", .path.display())]
    MissingMarker { marker: String, path: PathBuf },

    /// The capability is already declared in the project
    #[error("{kind} '{identifier}' already exists")]
    DuplicateCapability { kind: String, identifier: String },

    /// An external process (git, package manager) failed
    #[error("Command '{command}' failed: {message}")]
    External { command: String, message: String },
}

impl Error {
    /// Create a new invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new external command error
    pub fn external<C: Into<String>, M: Into<String>>(command: C, message: M) -> Self {
        Self::External {
            command: command.into(),
            message: message.into(),
        }
    }
}
