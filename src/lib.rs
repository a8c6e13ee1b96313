//! mcp-scaffold: create, extend, analyze and validate MCP servers
//!
//! Projects are generated either from an on-disk template tree
//! ([`templates`]) or by the built-in generator ([`generation`]) for Python,
//! TypeScript, Go and Rust. Existing projects are inspected with the
//! surface-level analyzer and validator in [`analysis`].
#![deny(unsafe_code)]

pub mod analysis;
pub mod core;
pub mod generation;
pub mod infrastructure;
pub mod languages;
pub mod templates;

pub use crate::core::{Error, Language, Pattern, ProjectSpec, Result, Transport};
