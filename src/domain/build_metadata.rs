use chrono::{DateTime, Utc};

use crate::domain::branch::escape_branch_name;

/// Build metadata attached to a semantic version
///
/// Only `commits_since_tag` is part of the rendered `+` suffix of a full
/// semantic version; the remaining fields feed the output variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildMetadata {
    pub commits_since_tag: Option<u64>,
    pub commits_since_version_source: Option<u64>,
    pub sha: String,
    pub short_sha: String,
    pub branch: String,
    pub version_source_sha: String,
    pub commit_date: Option<DateTime<Utc>>,
    pub other_metadata: Option<String>,
}

impl BuildMetadata {
    /// Parse the text after the `+` of a version (e.g. "5.Branch.develop")
    ///
    /// A leading number becomes `commits_since_tag`, the rest is kept verbatim.
    pub fn parse(text: &str) -> Self {
        let (head, rest) = match text.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (text, None),
        };

        match head.parse::<u64>() {
            Ok(commits) => BuildMetadata {
                commits_since_tag: Some(commits),
                other_metadata: rest.filter(|r| !r.is_empty()).map(str::to_string),
                ..BuildMetadata::default()
            },
            Err(_) => BuildMetadata {
                other_metadata: Some(text.to_string()).filter(|t| !t.is_empty()),
                ..BuildMetadata::default()
            },
        }
    }

    /// Short form rendered after `+` in the full semantic version
    pub fn short(&self) -> String {
        self.commits_since_tag
            .map(|c| c.to_string())
            .unwrap_or_default()
    }

    /// Long form: `{commits}.Branch.{branch}.Sha.{sha}.{other}`, skipping empty parts
    pub fn full(&self) -> String {
        let mut parts = Vec::new();
        if let Some(commits) = self.commits_since_tag {
            parts.push(commits.to_string());
        }
        if !self.branch.is_empty() {
            parts.push(format!("Branch.{}", escape_branch_name(&self.branch)));
        }
        if !self.sha.is_empty() {
            parts.push(format!("Sha.{}", self.sha));
        }
        if let Some(other) = self.other_metadata.as_deref().filter(|o| !o.is_empty()) {
            parts.push(other.to_string());
        }
        parts.join(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_leading_commit_count() {
        let meta = BuildMetadata::parse("5.Branch.develop");
        assert_eq!(meta.commits_since_tag, Some(5));
        assert_eq!(meta.other_metadata.as_deref(), Some("Branch.develop"));
    }

    #[test]
    fn test_parse_without_commit_count() {
        let meta = BuildMetadata::parse("Branch.develop");
        assert_eq!(meta.commits_since_tag, None);
        assert_eq!(meta.other_metadata.as_deref(), Some("Branch.develop"));
    }

    #[test]
    fn test_full_skips_empty_parts() {
        let meta = BuildMetadata {
            commits_since_tag: Some(5),
            branch: "feature/123".to_string(),
            sha: "commitSha".to_string(),
            ..BuildMetadata::default()
        };
        assert_eq!(meta.full(), "5.Branch.feature-123.Sha.commitSha");
        assert_eq!(meta.short(), "5");
        assert_eq!(BuildMetadata::default().full(), "");
    }
}
