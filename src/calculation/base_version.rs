use crate::domain::{Commit, SemanticVersion};
use std::fmt;

/// A candidate version proposed by a strategy
#[derive(Debug, Clone, PartialEq)]
pub struct BaseVersion {
    /// Human-readable origin, e.g. `Git tag 'v1.2.0'`
    pub source: String,
    pub should_increment: bool,
    pub semantic_version: SemanticVersion,
    /// Commit the version was read from, when there is one
    pub base_version_source: Option<Commit>,
    pub branch_name_override: Option<String>,
}

impl BaseVersion {
    pub fn new(
        source: impl Into<String>,
        should_increment: bool,
        semantic_version: SemanticVersion,
        base_version_source: Option<Commit>,
        branch_name_override: Option<String>,
    ) -> Self {
        BaseVersion {
            source: source.into(),
            should_increment,
            semantic_version,
            base_version_source,
            branch_name_override,
        }
    }
}

impl fmt::Display for BaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let commit = self
            .base_version_source
            .as_ref()
            .map(|c| c.short_sha())
            .unwrap_or_else(|| "external source".to_string());
        write!(
            f,
            "{}: version {} with commit source '{}'",
            self.source, self.semantic_version, commit
        )
    }
}
