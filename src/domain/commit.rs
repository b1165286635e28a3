use chrono::{DateTime, Utc};
use git2::Oid;
use regex::Regex;
use std::sync::OnceLock;

/// Commit facts the version engine reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub id: Oid,
    pub when: DateTime<Utc>,
    pub message: String,
    pub parents: Vec<Oid>,
}

impl Commit {
    /// Create a new commit record
    pub fn new(id: Oid, when: DateTime<Utc>, message: impl Into<String>, parents: Vec<Oid>) -> Self {
        Commit {
            id,
            when,
            message: message.into(),
            parents,
        }
    }

    /// Full hex sha
    pub fn sha(&self) -> String {
        self.id.to_string()
    }

    /// Abbreviated sha (first 7 characters)
    pub fn short_sha(&self) -> String {
        let sha = self.sha();
        sha[..7.min(sha.len())].to_string()
    }

    /// Whether this commit has more than one parent
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    /// First line of the commit message, trimmed
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("").trim()
    }

    /// Name of the branch merged by this commit, when the message says so
    ///
    /// Supports formats:
    /// - Merge branch 'name' [into target]
    /// - Merge remote-tracking branch 'origin/name'
    /// - Merge pull request #N from owner/name
    /// - Merge pull request #N in owner/repo from name to target
    pub fn merged_branch_name(&self) -> Option<String> {
        static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
        let patterns = PATTERNS.get_or_init(|| {
            [
                r"^Merge (?:remote-tracking )?branch '(?P<source>[^']+)'",
                r"^Merge pull request #\d+ in \S+ from (?P<source>\S+) to \S+",
                r"^Merge pull request #\d+ from [^/\s]+/(?P<source>\S+)",
            ]
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect()
        });

        let summary = self.summary();
        patterns.iter().find_map(|re| {
            re.captures(summary)
                .and_then(|c| c.name("source"))
                .map(|m| m.as_str().to_string())
        })
    }
}
