//! Layered configuration: global defaults, ordered branch rules and the
//! effective configuration a branch resolves to.

pub mod branch;
pub mod effective;
pub mod loader;
pub mod resolver;

pub use branch::{BranchConfiguration, BranchRules};
pub use effective::EffectiveConfiguration;
pub use loader::{load_config, CONFIG_FILE_NAME};

use crate::domain::{SemanticVersionFormat, VersionField};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Placeholder replaced by the branch name in labels
pub const BRANCH_NAME_PLACEHOLDER: &str = "{BranchName}";

/// Label sentinel meaning "use the branch name"
pub const USE_BRANCH_NAME: &str = "useBranchName";

/// Key of the catch-all rule, always tried after every other rule
pub const UNKNOWN_BRANCH_KEY: &str = "unknown";

/// How pre-release numbers and build metadata are rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersioningMode {
    #[default]
    ContinuousDelivery,
    ContinuousDeployment,
    Mainline,
}

/// Which component a branch increments, or `Inherit` to defer to its source branch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncrementStrategy {
    #[default]
    Inherit,
    None,
    Patch,
    Minor,
    Major,
}

impl IncrementStrategy {
    pub fn to_version_field(self) -> VersionField {
        match self {
            IncrementStrategy::Inherit | IncrementStrategy::None => VersionField::None,
            IncrementStrategy::Patch => VersionField::Patch,
            IncrementStrategy::Minor => VersionField::Minor,
            IncrementStrategy::Major => VersionField::Major,
        }
    }
}

/// Whether `+semver:` directives in commit messages are honored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommitMessageIncrementMode {
    #[default]
    Enabled,
    Disabled,
    MergeMessageOnly,
}

/// Shape of `AssemblySemVer` / `AssemblySemFileVer` when no format template is set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssemblyVersioningScheme {
    MajorMinorPatchTag,
    #[default]
    MajorMinorPatch,
    MajorMinor,
    Major,
    None,
}

/// Candidates excluded from base version selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct IgnoreConfiguration {
    /// Commit shas whose candidates are dropped
    pub sha: Vec<String>,
    /// Candidates sourced from commits older than this are dropped
    pub commits_before: Option<DateTime<Utc>>,
    /// Regexes matched against a candidate's source description
    pub sources: Vec<String>,
}

impl IgnoreConfiguration {
    pub fn is_empty(&self) -> bool {
        self.sha.is_empty() && self.commits_before.is_none() && self.sources.is_empty()
    }
}

/// Global configuration
///
/// The branch-level fields act as the fallback every branch rule inherits
/// from; the rest only exists globally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Configuration {
    pub mode: VersioningMode,
    pub label: String,
    pub increment: IncrementStrategy,
    pub prevent_increment_of_merged_branch_version: bool,
    pub label_number_pattern: Option<String>,
    pub track_merge_target: bool,
    pub track_merge_message: bool,
    pub tracks_release_branches: bool,
    pub is_release_branch: bool,
    pub is_mainline: bool,
    pub pre_release_weight: u64,
    pub commit_message_incrementing: CommitMessageIncrementMode,

    pub tag_prefix: String,
    pub next_version: Option<String>,
    pub major_version_bump_message: String,
    pub minor_version_bump_message: String,
    pub patch_version_bump_message: String,
    pub no_bump_message: String,
    pub tag_pre_release_weight: u64,
    pub commit_date_format: String,
    pub semantic_version_format: SemanticVersionFormat,
    pub assembly_versioning_scheme: AssemblyVersioningScheme,
    pub assembly_file_versioning_scheme: AssemblyVersioningScheme,
    pub assembly_versioning_format: Option<String>,
    pub assembly_file_versioning_format: Option<String>,
    pub assembly_informational_format: Option<String>,
    pub ignore: IgnoreConfiguration,
    pub branches: BranchRules,
}

impl Default for Configuration {
    fn default() -> Self {
        ConfigurationBuilder::git_flow().build()
    }
}

impl Configuration {
    /// Global branch-level settings as a rule every branch ultimately inherits from
    pub fn fallback_branch_configuration(&self) -> BranchConfiguration {
        BranchConfiguration {
            mode: Some(self.mode),
            label: Some(self.label.clone()),
            increment: self.increment,
            regex: None,
            source_branches: None,
            is_source_branch_for: None,
            track_merge_target: Some(self.track_merge_target),
            track_merge_message: Some(self.track_merge_message),
            tracks_release_branches: Some(self.tracks_release_branches),
            is_release_branch: Some(self.is_release_branch),
            is_mainline: Some(self.is_mainline),
            prevent_increment_of_merged_branch_version: Some(
                self.prevent_increment_of_merged_branch_version,
            ),
            label_number_pattern: self.label_number_pattern.clone(),
            pre_release_weight: Some(self.pre_release_weight),
            commit_message_incrementing: Some(self.commit_message_incrementing),
        }
    }

    /// Overlay a rule: an existing rule with the same key becomes its parent,
    /// a new key is appended.
    pub(crate) fn overlay_branch(&mut self, key: &str, rule: BranchConfiguration) {
        let merged = match self.branches.get(key) {
            Some(existing) => rule.inherit(existing),
            None => rule,
        };
        self.branches.insert(key, merged);
    }

    /// Add every `is-source-branch-for` back-reference to the target's source set
    pub(crate) fn link_source_branches(&mut self) {
        let links: Vec<(String, String)> = self
            .branches
            .iter()
            .flat_map(|(key, rule)| {
                rule.is_source_branch_for
                    .iter()
                    .flatten()
                    .map(move |target| (key.to_string(), target.clone()))
            })
            .collect();

        for (source, target) in links {
            match self.branches.get_mut(&target) {
                Some(rule) => {
                    // a rule without a source set already accepts every branch
                    if let Some(sources) = rule.source_branches.as_mut() {
                        if !sources.contains(&source) {
                            sources.push(source);
                        }
                    }
                }
                None => warn!(
                    source = %source,
                    target = %target,
                    "is-source-branch-for names an undefined branch rule"
                ),
            }
        }
    }
}

/// Assembles a [`Configuration`] and links source-branch back-references
#[derive(Debug, Clone)]
pub struct ConfigurationBuilder {
    configuration: Configuration,
}

impl Default for ConfigurationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationBuilder {
    /// Global defaults with no branch rules
    pub fn new() -> Self {
        ConfigurationBuilder {
            configuration: Configuration {
                mode: VersioningMode::ContinuousDelivery,
                label: BRANCH_NAME_PLACEHOLDER.to_string(),
                increment: IncrementStrategy::Inherit,
                prevent_increment_of_merged_branch_version: false,
                label_number_pattern: None,
                track_merge_target: false,
                track_merge_message: true,
                tracks_release_branches: false,
                is_release_branch: false,
                is_mainline: false,
                pre_release_weight: 0,
                commit_message_incrementing: CommitMessageIncrementMode::Enabled,
                tag_prefix: "[vV]?".to_string(),
                next_version: None,
                major_version_bump_message: r"\+semver:\s?(breaking|major)".to_string(),
                minor_version_bump_message: r"\+semver:\s?(feature|minor)".to_string(),
                patch_version_bump_message: r"\+semver:\s?(fix|patch)".to_string(),
                no_bump_message: r"\+semver:\s?(none|skip)".to_string(),
                tag_pre_release_weight: 60000,
                commit_date_format: "%Y-%m-%d".to_string(),
                semantic_version_format: SemanticVersionFormat::Strict,
                assembly_versioning_scheme: AssemblyVersioningScheme::MajorMinorPatch,
                assembly_file_versioning_scheme: AssemblyVersioningScheme::MajorMinorPatch,
                assembly_versioning_format: None,
                assembly_file_versioning_format: None,
                assembly_informational_format: None,
                ignore: IgnoreConfiguration::default(),
                branches: BranchRules::default(),
            },
        }
    }

    /// Global defaults plus the GitFlow branch rules
    pub fn git_flow() -> Self {
        let mut builder = Self::new();
        for (key, rule) in git_flow_branches() {
            builder.configuration.branches.insert(key, rule);
        }
        builder
    }

    /// Wrap an already deserialized configuration
    pub(crate) fn from_configuration(configuration: Configuration) -> Self {
        ConfigurationBuilder { configuration }
    }

    /// Add a rule, inheriting from an existing rule with the same key
    pub fn with_branch(mut self, key: &str, rule: BranchConfiguration) -> Self {
        self.configuration.overlay_branch(key, rule);
        self
    }

    pub fn with_mode(mut self, mode: VersioningMode) -> Self {
        self.configuration.mode = mode;
        self
    }

    pub fn with_increment(mut self, increment: IncrementStrategy) -> Self {
        self.configuration.increment = increment;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.configuration.label = label.into();
        self
    }

    pub fn with_tag_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.configuration.tag_prefix = prefix.into();
        self
    }

    pub fn with_next_version(mut self, next_version: impl Into<String>) -> Self {
        self.configuration.next_version = Some(next_version.into());
        self
    }

    pub fn with_ignore(mut self, ignore: IgnoreConfiguration) -> Self {
        self.configuration.ignore = ignore;
        self
    }

    pub fn with_assembly_informational_format(mut self, format: impl Into<String>) -> Self {
        self.configuration.assembly_informational_format = Some(format.into());
        self
    }

    pub fn build(mut self) -> Configuration {
        self.configuration.link_source_branches();
        self.configuration
    }
}

fn rule(regex: &str, label: &str, increment: IncrementStrategy) -> BranchConfiguration {
    BranchConfiguration::default()
        .with_regex(regex)
        .with_label(label)
        .with_increment(increment)
}

const FEATURE_SOURCES: [&str; 5] = ["develop", "main", "release", "support", "hotfix"];

fn git_flow_branches() -> Vec<(&'static str, BranchConfiguration)> {
    vec![
        (
            "develop",
            BranchConfiguration {
                mode: Some(VersioningMode::ContinuousDeployment),
                track_merge_target: Some(true),
                tracks_release_branches: Some(true),
                is_mainline: Some(false),
                is_release_branch: Some(false),
                pre_release_weight: Some(0),
                source_branches: Some(Vec::new()),
                ..rule("^dev(elop)?(ment)?$", "alpha", IncrementStrategy::Minor)
            },
        ),
        (
            "main",
            BranchConfiguration {
                prevent_increment_of_merged_branch_version: Some(true),
                track_merge_target: Some(false),
                tracks_release_branches: Some(false),
                is_mainline: Some(true),
                is_release_branch: Some(false),
                pre_release_weight: Some(55000),
                source_branches: Some(Vec::new()),
                ..rule("^master$|^main$", "", IncrementStrategy::Patch)
            },
        ),
        (
            "release",
            BranchConfiguration {
                prevent_increment_of_merged_branch_version: Some(true),
                track_merge_target: Some(false),
                tracks_release_branches: Some(false),
                is_mainline: Some(false),
                is_release_branch: Some(true),
                pre_release_weight: Some(30000),
                ..rule("^releases?[/-]", "beta", IncrementStrategy::None)
                    .with_source_branches(["main", "support"])
            },
        ),
        (
            "feature",
            BranchConfiguration {
                pre_release_weight: Some(30000),
                ..rule("^features?[/-]", BRANCH_NAME_PLACEHOLDER, IncrementStrategy::Inherit)
                    .with_source_branches(FEATURE_SOURCES)
            },
        ),
        (
            "pull-request",
            BranchConfiguration {
                mode: Some(VersioningMode::ContinuousDelivery),
                label_number_pattern: Some(r"[/-](?P<number>\d+)".to_string()),
                pre_release_weight: Some(30000),
                ..rule(
                    r"^(pull|pull\-requests|pr)[/-]",
                    "PullRequest",
                    IncrementStrategy::Inherit,
                )
                .with_source_branches(FEATURE_SOURCES.iter().copied().chain(["feature"]))
            },
        ),
        (
            "hotfix",
            BranchConfiguration {
                is_release_branch: Some(true),
                pre_release_weight: Some(30000),
                ..rule("^hotfix(es)?[/-]", "beta", IncrementStrategy::Inherit)
                    .with_source_branches(["release", "main", "support", "hotfix"])
            },
        ),
        (
            "support",
            BranchConfiguration {
                prevent_increment_of_merged_branch_version: Some(true),
                is_mainline: Some(true),
                pre_release_weight: Some(55000),
                ..rule("^support[/-]", "", IncrementStrategy::Patch).with_source_branches(["main"])
            },
        ),
        (
            UNKNOWN_BRANCH_KEY,
            BranchConfiguration {
                source_branches: None,
                ..rule(".*", BRANCH_NAME_PLACEHOLDER, IncrementStrategy::Inherit)
            },
        ),
    ]
}
