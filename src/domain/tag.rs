use crate::domain::{Commit, SemanticVersion, SemanticVersionFormat};

/// A git tag and the commit it points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub commit: Commit,
}

impl Tag {
    /// Create a new tag
    pub fn new(name: impl Into<String>, commit: Commit) -> Self {
        Tag {
            name: name.into(),
            commit,
        }
    }

    /// Tag name with any `refs/tags/` prefix removed
    pub fn friendly_name(&self) -> &str {
        self.name.strip_prefix("refs/tags/").unwrap_or(&self.name)
    }

    /// Read the tag as a version, if it is one
    pub fn semantic_version(
        &self,
        tag_prefix: &str,
        format: SemanticVersionFormat,
    ) -> Option<SemanticVersion> {
        SemanticVersion::try_parse(self.friendly_name(), Some(tag_prefix), format)
    }
}

/// A tag that parsed as a semantic version
#[derive(Debug, Clone)]
pub struct TaggedVersion {
    pub tag: Tag,
    pub version: SemanticVersion,
}

impl TaggedVersion {
    /// Identity used to report each tag once: name plus version
    pub fn key(&self) -> (String, SemanticVersion) {
        (self.tag.name.clone(), self.version.clone())
    }
}
