//! Pre-release tag handling for semantic versions
//!
//! A pre-release tag is a label (`alpha`, `beta`, `PullRequest2`, ...) with an
//! optional iteration number, rendered as `label.number`.
//! According to semver.org: https://semver.org/#spec-item-9

use std::cmp::Ordering;
use std::fmt;

/// Pre-release tag with optional iteration number
///
/// # Examples
/// - "alpha" -> PreReleaseTag { name: "alpha", number: None }
/// - "beta.1" -> PreReleaseTag { name: "beta", number: Some(1) }
/// - "4" -> PreReleaseTag { name: "", number: Some(4) }
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PreReleaseTag {
    /// The pre-release label
    pub name: String,
    /// Optional iteration number
    pub number: Option<u64>,
    /// Set when `number` was derived from a commit count rather than a tag
    pub promoted_from_commits: bool,
}

impl PreReleaseTag {
    /// Create a new pre-release tag
    pub fn new(name: impl Into<String>, number: Option<u64>, promoted_from_commits: bool) -> Self {
        PreReleaseTag {
            name: name.into(),
            number,
            promoted_from_commits,
        }
    }

    /// Parse a pre-release tag from the text after the `-` of a version
    ///
    /// The text is split at its last dot when the suffix is numeric, so
    /// `rc.2` becomes `("rc", 2)` and `build.meta` stays a single name.
    pub fn parse(text: &str) -> Self {
        if let Ok(number) = text.parse::<u64>() {
            return PreReleaseTag::new("", Some(number), false);
        }

        match text.rsplit_once('.') {
            Some((name, suffix)) => match suffix.parse::<u64>() {
                Ok(number) => PreReleaseTag::new(name, Some(number), false),
                Err(_) => PreReleaseTag::new(text, None, false),
            },
            None => PreReleaseTag::new(text, None, false),
        }
    }

    /// Whether this tag makes the version a pre-release
    ///
    /// A number promoted from the commit count does not count on its own.
    pub fn has_tag(&self) -> bool {
        !self.name.is_empty() || (self.number.is_some() && !self.promoted_from_commits)
    }

    /// Next iteration of this tag
    ///
    /// If number is None, returns Some(1). Otherwise increments by 1.
    pub fn increment_number(&self) -> Self {
        PreReleaseTag {
            name: self.name.clone(),
            number: Some(self.number.map_or(1, |n| n.saturating_add(1))),
            promoted_from_commits: self.promoted_from_commits,
        }
    }

    /// Precedence comparison between two present tags: name, then number
    pub(crate) fn cmp_precedence(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.number.cmp(&other.number))
    }
}

impl fmt::Display for PreReleaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name.is_empty(), self.number) {
            (false, Some(number)) => write!(f, "{}.{}", self.name, number),
            (false, None) => write!(f, "{}", self.name),
            (true, Some(number)) => write!(f, "{}", number),
            (true, None) => Ok(()),
        }
    }
}
