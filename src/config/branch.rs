//! Raw per-branch configuration and its inheritance merge

use crate::config::{CommitMessageIncrementMode, IncrementStrategy, VersioningMode};
use regex::Regex;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use tracing::warn;

/// Configuration of one branch rule as written by the user
///
/// Every field is optional; unset fields are filled from the parent by
/// [`BranchConfiguration::inherit`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BranchConfiguration {
    pub mode: Option<VersioningMode>,
    pub label: Option<String>,
    #[serde(default)]
    pub increment: IncrementStrategy,
    pub regex: Option<String>,
    pub source_branches: Option<Vec<String>>,
    pub is_source_branch_for: Option<Vec<String>>,
    pub track_merge_target: Option<bool>,
    pub track_merge_message: Option<bool>,
    pub tracks_release_branches: Option<bool>,
    pub is_release_branch: Option<bool>,
    pub is_mainline: Option<bool>,
    pub prevent_increment_of_merged_branch_version: Option<bool>,
    pub label_number_pattern: Option<String>,
    pub pre_release_weight: Option<u64>,
    pub commit_message_incrementing: Option<CommitMessageIncrementMode>,
}

impl BranchConfiguration {
    /// Merge with a parent: values set on `self` win, the rest come from `parent`
    ///
    /// An `Inherit` increment takes the parent's increment. Neither input is
    /// modified.
    pub fn inherit(&self, parent: &BranchConfiguration) -> BranchConfiguration {
        BranchConfiguration {
            mode: self.mode.or(parent.mode),
            label: self.label.clone().or_else(|| parent.label.clone()),
            increment: match self.increment {
                IncrementStrategy::Inherit => parent.increment,
                increment => increment,
            },
            regex: self.regex.clone().or_else(|| parent.regex.clone()),
            source_branches: self
                .source_branches
                .clone()
                .or_else(|| parent.source_branches.clone()),
            is_source_branch_for: self
                .is_source_branch_for
                .clone()
                .or_else(|| parent.is_source_branch_for.clone()),
            track_merge_target: self.track_merge_target.or(parent.track_merge_target),
            track_merge_message: self.track_merge_message.or(parent.track_merge_message),
            tracks_release_branches: self
                .tracks_release_branches
                .or(parent.tracks_release_branches),
            is_release_branch: self.is_release_branch.or(parent.is_release_branch),
            is_mainline: self.is_mainline.or(parent.is_mainline),
            prevent_increment_of_merged_branch_version: self
                .prevent_increment_of_merged_branch_version
                .or(parent.prevent_increment_of_merged_branch_version),
            label_number_pattern: self
                .label_number_pattern
                .clone()
                .or_else(|| parent.label_number_pattern.clone()),
            pre_release_weight: self.pre_release_weight.or(parent.pre_release_weight),
            commit_message_incrementing: self
                .commit_message_incrementing
                .or(parent.commit_message_incrementing),
        }
    }

    /// Whether `branch_name` matches this rule's regex
    ///
    /// A rule without regex matches nothing; an invalid regex is reported and
    /// treated as not matching.
    pub fn is_match(&self, branch_name: &str) -> bool {
        let Some(pattern) = self.regex.as_deref() else {
            return false;
        };
        match Regex::new(pattern) {
            Ok(re) => re.is_match(branch_name),
            Err(e) => {
                warn!(pattern, error = %e, "ignoring branch rule with invalid regex");
                false
            }
        }
    }

    pub fn with_regex(mut self, regex: impl Into<String>) -> Self {
        self.regex = Some(regex.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_increment(mut self, increment: IncrementStrategy) -> Self {
        self.increment = increment;
        self
    }

    pub fn with_mode(mut self, mode: VersioningMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_source_branches<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_branches = Some(keys.into_iter().map(Into::into).collect());
        self
    }
}

/// Branch rules keyed by name, in declaration order
///
/// Order matters: the first matching rule wins, so this is a list rather
/// than a hash map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BranchRules(Vec<(String, BranchConfiguration)>);

impl BranchRules {
    /// Insert a rule, replacing a rule with the same key in place
    pub fn insert(&mut self, key: impl Into<String>, configuration: BranchConfiguration) {
        let key = key.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = configuration,
            None => self.0.push((key, configuration)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&BranchConfiguration> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, c)| c)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut BranchConfiguration> {
        self.0.iter_mut().find(|(k, _)| k == key).map(|(_, c)| c)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BranchConfiguration)> {
        self.0.iter().map(|(k, c)| (k.as_str(), c))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for BranchRules {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, c)| (k, c)))
    }
}

impl<'de> Deserialize<'de> for BranchRules {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct RulesVisitor;

        impl<'de> Visitor<'de> for RulesVisitor {
            type Value = BranchRules;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a table of branch rules")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<BranchRules, A::Error> {
                let mut rules = BranchRules::default();
                while let Some((key, configuration)) =
                    map.next_entry::<String, BranchConfiguration>()?
                {
                    rules.insert(key, configuration);
                }
                Ok(rules)
            }
        }

        deserializer.deserialize_map(RulesVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> BranchConfiguration {
        BranchConfiguration {
            mode: Some(VersioningMode::ContinuousDelivery),
            label: Some("root".to_string()),
            increment: IncrementStrategy::Major,
            regex: Some("^root$".to_string()),
            track_merge_target: Some(true),
            pre_release_weight: Some(10),
            ..BranchConfiguration::default()
        }
    }

    #[test]
    fn test_child_values_win() {
        let child = BranchConfiguration::default()
            .with_label("child")
            .with_increment(IncrementStrategy::Patch);
        let merged = child.inherit(&root());
        assert_eq!(merged.label.as_deref(), Some("child"));
        assert_eq!(merged.increment, IncrementStrategy::Patch);
        assert_eq!(merged.track_merge_target, Some(true));
        assert_eq!(merged.pre_release_weight, Some(10));
    }

    #[test]
    fn test_inherit_increment_takes_parent_value() {
        let child = BranchConfiguration::default();
        assert_eq!(child.increment, IncrementStrategy::Inherit);
        assert_eq!(child.inherit(&root()).increment, IncrementStrategy::Major);
    }

    #[test]
    fn test_inherit_does_not_mutate_inputs() {
        let child = BranchConfiguration::default().with_label("child");
        let parent = root();
        let _ = child.inherit(&parent);
        assert_eq!(child.increment, IncrementStrategy::Inherit);
        assert_eq!(parent.label.as_deref(), Some("root"));
    }

    #[test]
    fn test_three_level_chain_is_associative() {
        let leaf = BranchConfiguration::default();
        let mid = BranchConfiguration {
            label: Some("mid".to_string()),
            is_mainline: Some(false),
            ..BranchConfiguration::default()
        };
        let stepwise = leaf.inherit(&mid).inherit(&root());
        let folded = leaf.inherit(&mid.inherit(&root()));
        assert_eq!(stepwise, folded);
        assert_eq!(folded.label.as_deref(), Some("mid"));
        assert_eq!(folded.increment, IncrementStrategy::Major);
    }

    #[test]
    fn test_is_match() {
        let rule = BranchConfiguration::default().with_regex("^features?[/-]");
        assert!(rule.is_match("feature/123"));
        assert!(!rule.is_match("develop"));
        assert!(!BranchConfiguration::default().is_match("develop"));
        assert!(!BranchConfiguration::default().with_regex("(").is_match("("));
    }

    #[test]
    fn test_rules_keep_declaration_order() {
        let rules: BranchRules = toml::from_str(
            r#"
[zeta]
regex = "^z"
[alpha]
regex = "^a"
[mid]
regex = "^m"
"#,
        )
        .unwrap();
        assert_eq!(rules.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_rules_insert_replaces_in_place() {
        let mut rules = BranchRules::default();
        rules.insert("a", BranchConfiguration::default());
        rules.insert("b", BranchConfiguration::default());
        rules.insert("a", BranchConfiguration::default().with_label("x"));
        assert_eq!(rules.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(rules.get("a").unwrap().label.as_deref(), Some("x"));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn increment() -> impl Strategy<Value = IncrementStrategy> {
        prop_oneof![
            Just(IncrementStrategy::Inherit),
            Just(IncrementStrategy::None),
            Just(IncrementStrategy::Patch),
            Just(IncrementStrategy::Minor),
            Just(IncrementStrategy::Major),
        ]
    }

    fn branch_configuration() -> impl Strategy<Value = BranchConfiguration> {
        (
            proptest::option::of("[a-z]{1,5}"),
            increment(),
            proptest::option::of(any::<bool>()),
            proptest::option::of(any::<bool>()),
            proptest::option::of(0u64..1000),
            proptest::option::of("[a-z]{1,5}"),
        )
            .prop_map(
                |(label, increment, is_mainline, track_merge_target, weight, regex)| {
                    BranchConfiguration {
                        label,
                        increment,
                        is_mainline,
                        track_merge_target,
                        pre_release_weight: weight,
                        regex,
                        ..BranchConfiguration::default()
                    }
                },
            )
    }

    proptest! {
        #[test]
        fn inherit_is_associative(
            leaf in branch_configuration(),
            mid in branch_configuration(),
            root in branch_configuration(),
        ) {
            prop_assert_eq!(leaf.inherit(&mid).inherit(&root), leaf.inherit(&mid.inherit(&root)));
        }
    }
}
