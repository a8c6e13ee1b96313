//! Generation domain module - creates and extends MCP server projects
//!
//! New projects come either from an on-disk template tree or from the
//! built-in generator, which renders each language's file set against the
//! pattern's [`Blueprint`]. Existing projects grow through [`add_capability`].

pub mod add;
pub mod blueprint;
pub mod renderer;
pub mod scaffold;

pub use add::{AddedCapability, add_capability};
pub use blueprint::{Blueprint, ExamplePrompt, ExampleResource, ExampleTool, ToolShape};
pub use renderer::{Artifact, render_context, render_project, write_artifacts};
pub use scaffold::{GenerationSource, ScaffoldOptions, ScaffoldSummary, create_project};
