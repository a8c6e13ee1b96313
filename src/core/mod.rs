//! Core domain types shared by generation and analysis
//!
//! Name normalisation, the project selection enums and the crate-wide error
//! type live here. Nothing in this module touches the filesystem.

pub mod error;
pub mod naming;
pub mod project;

pub use error::{Error, Result};
pub use naming::NameForms;
pub use project::{Language, Pattern, ProjectSpec, Transport};
