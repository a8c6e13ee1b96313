//! On-disk template trees
//!
//! A template tree mirrors the layout of a generated project. The resolver
//! finds the tree for a language/pattern pair and the materializer copies it
//! into place, substituting the [`TemplateContext`] into names and contents.

pub mod context;
pub mod dir;
pub mod materialize;

pub use context::TemplateContext;
pub use dir::{
    EnvTemplateConfigReader, TemplateConfigReader, TemplateResolver, resolve_output_dir,
};
pub use materialize::materialize;
