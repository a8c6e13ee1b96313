//! Capability extraction from source text

use regex::Regex;

use crate::analysis::{Capability, CapabilityKind};

/// Finds declared capabilities in the text of one source file.
///
/// Implementations return capabilities in the order they appear.
pub trait CapabilityExtractor: Send + Sync {
    fn extract(&self, source: &str) -> Vec<Capability>;
}

/// Regex-based extractor: one expression per capability kind, whose first
/// capture group is the identifier.
#[derive(Debug)]
pub struct PatternExtractor {
    patterns: Vec<(CapabilityKind, Regex)>,
}

impl PatternExtractor {
    /// Build from `(kind, expression)` pairs. The expressions are compiled
    /// from literals owned by each language, so a bad one is a programming
    /// error.
    pub fn new(patterns: &[(CapabilityKind, &str)]) -> Self {
        Self {
            patterns: patterns
                .iter()
                .map(|(kind, pattern)| {
                    (
                        *kind,
                        Regex::new(pattern).expect("capability pattern must compile"),
                    )
                })
                .collect(),
        }
    }
}

impl CapabilityExtractor for PatternExtractor {
    fn extract(&self, source: &str) -> Vec<Capability> {
        let mut found: Vec<(usize, Capability)> = Vec::new();

        for (kind, regex) in &self.patterns {
            for captures in regex.captures_iter(source) {
                if let Some(identifier) = captures.get(1) {
                    found.push((
                        identifier.start(),
                        Capability::new(*kind, identifier.as_str()),
                    ));
                }
            }
        }

        found.sort_by_key(|(offset, _)| *offset);
        let mut capabilities: Vec<Capability> = Vec::with_capacity(found.len());
        for (_, capability) in found {
            if !capabilities.contains(&capability) {
                capabilities.push(capability);
            }
        }
        capabilities
    }
}
