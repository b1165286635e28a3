use crate::config::{CommitMessageIncrementMode, EffectiveConfiguration};
use crate::domain::{Commit, VersionField};
use regex::Regex;
use tracing::warn;

/// Reads `+semver:` style increment directives from commit messages
pub struct IncrementAnalyzer {
    mode: CommitMessageIncrementMode,
    major: Option<Regex>,
    minor: Option<Regex>,
    patch: Option<Regex>,
    no_bump: Option<Regex>,
}

fn compile(pattern: &str) -> Option<Regex> {
    if pattern.is_empty() {
        return None;
    }
    match Regex::new(&format!("(?i){}", pattern)) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!(pattern, error = %e, "ignoring invalid bump message regex");
            None
        }
    }
}

impl IncrementAnalyzer {
    /// Create an analyzer from the bump message regexes of a configuration
    pub fn new(configuration: &EffectiveConfiguration) -> Self {
        IncrementAnalyzer {
            mode: configuration.commit_message_incrementing,
            major: compile(&configuration.major_version_bump_message),
            minor: compile(&configuration.minor_version_bump_message),
            patch: compile(&configuration.patch_version_bump_message),
            no_bump: compile(&configuration.no_bump_message),
        }
    }

    /// Directive in a single message
    ///
    /// `Some(VersionField::None)` is an explicit "do not bump".
    pub fn directive(&self, message: &str) -> Option<VersionField> {
        let matches = |re: &Option<Regex>| re.as_ref().is_some_and(|re| re.is_match(message));

        if matches(&self.major) {
            Some(VersionField::Major)
        } else if matches(&self.minor) {
            Some(VersionField::Minor)
        } else if matches(&self.patch) {
            Some(VersionField::Patch)
        } else if matches(&self.no_bump) {
            Some(VersionField::None)
        } else {
            None
        }
    }

    /// Strongest directive across `commits`, honoring the incrementing mode
    pub fn analyze_commits(&self, commits: &[Commit]) -> Option<VersionField> {
        let eligible = |commit: &&Commit| match self.mode {
            CommitMessageIncrementMode::Disabled => false,
            CommitMessageIncrementMode::Enabled => true,
            CommitMessageIncrementMode::MergeMessageOnly => commit.is_merge(),
        };

        commits
            .iter()
            .filter(eligible)
            .filter_map(|commit| self.directive(&commit.message))
            .max()
    }

    /// Field to increment given the branch's own increment
    ///
    /// A stronger directive wins over the branch increment; a lone "no bump"
    /// directive suppresses the increment.
    pub fn increment_field(&self, branch_field: VersionField, commits: &[Commit]) -> VersionField {
        match self.analyze_commits(commits) {
            None => branch_field,
            Some(VersionField::None) => VersionField::None,
            Some(field) => field.max(branch_field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;
    use crate::git::mock::mock_oid;
    use chrono::{DateTime, Utc};

    fn analyzer(mode: CommitMessageIncrementMode) -> IncrementAnalyzer {
        let config = Configuration::default();
        let mut effective = EffectiveConfiguration::new(&config, &config.branch_configuration("main"));
        effective.commit_message_incrementing = mode;
        IncrementAnalyzer::new(&effective)
    }

    fn commit(message: &str, parents: usize) -> Commit {
        let parents = (0..parents).map(|n| mock_oid(n as u8)).collect();
        Commit::new(mock_oid(99), DateTime::<Utc>::UNIX_EPOCH, message, parents)
    }

    #[test]
    fn test_directives() {
        let a = analyzer(CommitMessageIncrementMode::Enabled);
        assert_eq!(a.directive("rework api +semver: breaking"), Some(VersionField::Major));
        assert_eq!(a.directive("+semver:major"), Some(VersionField::Major));
        assert_eq!(a.directive("add thing +semver: feature"), Some(VersionField::Minor));
        assert_eq!(a.directive("+SEMVER: Fix"), Some(VersionField::Patch));
        assert_eq!(a.directive("docs +semver: skip"), Some(VersionField::None));
        assert_eq!(a.directive("plain message"), None);
    }

    #[test]
    fn test_strongest_directive_wins() {
        let a = analyzer(CommitMessageIncrementMode::Enabled);
        let commits = vec![commit("+semver: patch", 1), commit("+semver: minor", 1), commit("x", 1)];
        assert_eq!(a.analyze_commits(&commits), Some(VersionField::Minor));
    }

    #[test]
    fn test_disabled_mode_ignores_messages() {
        let a = analyzer(CommitMessageIncrementMode::Disabled);
        assert_eq!(a.analyze_commits(&[commit("+semver: major", 1)]), None);
    }

    #[test]
    fn test_merge_message_only_mode() {
        let a = analyzer(CommitMessageIncrementMode::MergeMessageOnly);
        assert_eq!(a.analyze_commits(&[commit("+semver: major", 1)]), None);
        assert_eq!(
            a.analyze_commits(&[commit("Merge branch 'x' +semver: major", 2)]),
            Some(VersionField::Major)
        );
    }

    #[test]
    fn test_increment_field() {
        let a = analyzer(CommitMessageIncrementMode::Enabled);
        assert_eq!(a.increment_field(VersionField::Minor, &[commit("x", 1)]), VersionField::Minor);
        assert_eq!(a.increment_field(VersionField::Minor, &[commit("+semver: patch", 1)]), VersionField::Minor);
        assert_eq!(a.increment_field(VersionField::Patch, &[commit("+semver: major", 1)]), VersionField::Major);
        assert_eq!(a.increment_field(VersionField::Patch, &[commit("+semver: none", 1)]), VersionField::None);
    }
}
