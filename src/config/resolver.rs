//! Branch name to branch rule resolution

use crate::config::{
    BranchConfiguration, Configuration, IncrementStrategy, BRANCH_NAME_PLACEHOLDER,
    UNKNOWN_BRANCH_KEY,
};
use crate::diagnostics::Diagnostic;
use crate::domain::strip_origin;
use regex::Regex;
use tracing::warn;

impl Configuration {
    /// Find the raw rule for `branch_name`
    ///
    /// The first rule whose regex matches wins, with the `unknown` rule tried
    /// last regardless of where it was declared. A name matching nothing gets
    /// a synthesized rule with an empty regex, the branch name label and an
    /// `Inherit` increment.
    pub fn branch_configuration(&self, branch_name: &str) -> BranchConfiguration {
        self.matching_rule(branch_name)
            .map(|(_, rule)| rule.clone())
            .unwrap_or_else(|| BranchConfiguration {
                regex: Some(String::new()),
                label: Some(BRANCH_NAME_PLACEHOLDER.to_string()),
                increment: IncrementStrategy::Inherit,
                ..BranchConfiguration::default()
            })
    }

    /// Key of the rule `branch_name` resolves to, if any rule matches
    pub fn branch_rule_key(&self, branch_name: &str) -> Option<&str> {
        self.matching_rule(branch_name).map(|(key, _)| key)
    }

    /// Whether `branch_name` resolves to a release branch rule
    pub fn is_release_branch(&self, branch_name: &str) -> bool {
        self.branch_configuration(branch_name)
            .is_release_branch
            .unwrap_or(self.is_release_branch)
    }

    /// Whether `branch_name` resolves to a mainline rule
    pub fn is_mainline_branch(&self, branch_name: &str) -> bool {
        self.branch_configuration(branch_name)
            .is_mainline
            .unwrap_or(self.is_mainline)
    }

    /// Regexes a candidate source branch of `branch_name` must match
    ///
    /// A rule without a source set accepts every branch. Keys naming no rule
    /// (or a rule without regex) are skipped.
    pub fn source_branch_regexes(&self, branch_name: &str) -> Vec<Regex> {
        let rule = self.branch_configuration(branch_name);
        let patterns: Vec<String> = match &rule.source_branches {
            None => vec![".*".to_string()],
            Some(keys) => keys
                .iter()
                .filter_map(|key| match self.branches.get(key) {
                    Some(source) => source.regex.clone(),
                    None => {
                        Diagnostic::UnknownSourceBranch {
                            branch: branch_name.to_string(),
                            key: key.clone(),
                        }
                        .log();
                        None
                    }
                })
                .collect(),
        };

        patterns
            .iter()
            .filter_map(|pattern| match Regex::new(pattern) {
                Ok(re) => Some(re),
                Err(e) => {
                    warn!(pattern = %pattern, error = %e, "skipping invalid source branch regex");
                    None
                }
            })
            .collect()
    }

    fn matching_rule(&self, branch_name: &str) -> Option<(&str, &BranchConfiguration)> {
        let name = strip_origin(branch_name);
        let mut unknown = None;
        for (key, rule) in self.branches.iter() {
            if !rule.is_match(name) {
                continue;
            }
            if key == UNKNOWN_BRANCH_KEY {
                unknown = Some((key, rule));
            } else {
                return Some((key, rule));
            }
        }
        unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigurationBuilder;

    #[test]
    fn test_first_declared_match_wins() {
        let config = Configuration::default();
        assert_eq!(config.branch_rule_key("develop"), Some("develop"));
        assert_eq!(config.branch_rule_key("feature/login"), Some("feature"));
        assert_eq!(config.branch_rule_key("origin/release/1.2.0"), Some("release"));
        assert_eq!(config.branch_rule_key("refs/heads/main"), Some("main"));
    }

    #[test]
    fn test_unknown_rule_is_deprioritized() {
        let config = ConfigurationBuilder::new()
            .with_branch("unknown", BranchConfiguration::default().with_regex(".*").with_label("u"))
            .with_branch("topic", BranchConfiguration::default().with_regex("^topic/").with_label("t"))
            .build();
        assert_eq!(config.branch_rule_key("topic/x"), Some("topic"));
        assert_eq!(config.branch_rule_key("other"), Some("unknown"));
    }

    #[test]
    fn test_no_match_synthesizes_configuration() {
        let config = ConfigurationBuilder::new()
            .with_branch("main", BranchConfiguration::default().with_regex("^main$"))
            .build();
        let rule = config.branch_configuration("something-else");
        assert_eq!(rule.increment, IncrementStrategy::Inherit);
        assert_eq!(rule.label.as_deref(), Some(BRANCH_NAME_PLACEHOLDER));
        assert_eq!(rule.regex.as_deref(), Some(""));
    }

    #[test]
    fn test_release_and_mainline_flags() {
        let config = Configuration::default();
        assert!(config.is_release_branch("release/1.0.0"));
        assert!(config.is_release_branch("hotfix/1.0.1"));
        assert!(!config.is_release_branch("develop"));
        assert!(config.is_mainline_branch("main"));
        assert!(config.is_mainline_branch("support/1.x"));
        assert!(!config.is_mainline_branch("feature/a"));
    }

    #[test]
    fn test_source_branch_regexes() {
        let config = Configuration::default();
        let regexes = config.source_branch_regexes("release/1.0.0");
        assert_eq!(regexes.len(), 2);
        assert!(regexes.iter().any(|r| r.is_match("main")));
        assert!(config.source_branch_regexes("main").is_empty());
        let all = config.source_branch_regexes("wip");
        assert_eq!(all.len(), 1);
        assert!(all[0].is_match("anything"));
    }

    #[test]
    fn test_source_branch_regexes_skip_missing_keys() {
        let config = ConfigurationBuilder::new()
            .with_branch(
                "topic",
                BranchConfiguration::default()
                    .with_regex("^topic/")
                    .with_source_branches(["nowhere"]),
            )
            .build();
        assert!(config.source_branch_regexes("topic/a").is_empty());
    }
}
