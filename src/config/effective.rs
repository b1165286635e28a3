use crate::config::{
    AssemblyVersioningScheme, BranchConfiguration, CommitMessageIncrementMode, Configuration,
    IgnoreConfiguration, IncrementStrategy, VersioningMode, BRANCH_NAME_PLACEHOLDER,
    USE_BRANCH_NAME,
};
use crate::domain::{strip_origin, SemanticVersionFormat};
use regex::{Regex, RegexBuilder};
use std::sync::OnceLock;
use tracing::warn;

/// Fully resolved settings for one branch
///
/// Built from the global configuration and a (possibly inherited) branch
/// rule. No field is left unset; an `Inherit` increment that survives
/// inheritance collapses to `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveConfiguration {
    pub versioning_mode: VersioningMode,
    pub label: String,
    pub increment: IncrementStrategy,
    pub tag_prefix: String,
    pub branch_prefix_to_trim: Option<String>,
    pub next_version: Option<String>,
    pub prevent_increment_of_merged_branch_version: bool,
    pub label_number_pattern: Option<String>,
    pub track_merge_target: bool,
    pub track_merge_message: bool,
    pub commit_message_incrementing: CommitMessageIncrementMode,
    pub major_version_bump_message: String,
    pub minor_version_bump_message: String,
    pub patch_version_bump_message: String,
    pub no_bump_message: String,
    pub tracks_release_branches: bool,
    pub is_release_branch: bool,
    pub is_mainline: bool,
    pub pre_release_weight: u64,
    pub tag_pre_release_weight: u64,
    pub commit_date_format: String,
    pub semantic_version_format: SemanticVersionFormat,
    pub assembly_versioning_scheme: AssemblyVersioningScheme,
    pub assembly_file_versioning_scheme: AssemblyVersioningScheme,
    pub assembly_versioning_format: Option<String>,
    pub assembly_file_versioning_format: Option<String>,
    pub assembly_informational_format: Option<String>,
    pub ignore: IgnoreConfiguration,
}

impl EffectiveConfiguration {
    pub fn new(configuration: &Configuration, branch: &BranchConfiguration) -> Self {
        let resolved = branch.inherit(&configuration.fallback_branch_configuration());
        let increment = match resolved.increment {
            IncrementStrategy::Inherit => IncrementStrategy::None,
            increment => increment,
        };

        EffectiveConfiguration {
            versioning_mode: resolved.mode.unwrap_or(configuration.mode),
            label: resolved.label.unwrap_or_else(|| configuration.label.clone()),
            increment,
            tag_prefix: configuration.tag_prefix.clone(),
            branch_prefix_to_trim: branch.regex.clone().filter(|r| !r.is_empty()),
            next_version: configuration.next_version.clone(),
            prevent_increment_of_merged_branch_version: resolved
                .prevent_increment_of_merged_branch_version
                .unwrap_or(false),
            label_number_pattern: resolved.label_number_pattern,
            track_merge_target: resolved.track_merge_target.unwrap_or(false),
            track_merge_message: resolved.track_merge_message.unwrap_or(true),
            commit_message_incrementing: resolved
                .commit_message_incrementing
                .unwrap_or(configuration.commit_message_incrementing),
            major_version_bump_message: configuration.major_version_bump_message.clone(),
            minor_version_bump_message: configuration.minor_version_bump_message.clone(),
            patch_version_bump_message: configuration.patch_version_bump_message.clone(),
            no_bump_message: configuration.no_bump_message.clone(),
            tracks_release_branches: resolved.tracks_release_branches.unwrap_or(false),
            is_release_branch: resolved.is_release_branch.unwrap_or(false),
            is_mainline: resolved.is_mainline.unwrap_or(false),
            pre_release_weight: resolved.pre_release_weight.unwrap_or(0),
            tag_pre_release_weight: configuration.tag_pre_release_weight,
            commit_date_format: configuration.commit_date_format.clone(),
            semantic_version_format: configuration.semantic_version_format,
            assembly_versioning_scheme: configuration.assembly_versioning_scheme,
            assembly_file_versioning_scheme: configuration.assembly_file_versioning_scheme,
            assembly_versioning_format: configuration.assembly_versioning_format.clone(),
            assembly_file_versioning_format: configuration.assembly_file_versioning_format.clone(),
            assembly_informational_format: configuration.assembly_informational_format.clone(),
            ignore: configuration.ignore.clone(),
        }
    }

    /// Resolve the configured label for a branch
    ///
    /// `useBranchName` stands for the `{BranchName}` placeholder. When the
    /// placeholder is present the branch name (or `branch_name_override`) has
    /// the branch prefix trimmed, case-insensitively, unless that would leave
    /// nothing, and every character outside `[a-zA-Z0-9-]` becomes `-`. When a
    /// label number pattern is set, its `number` group is appended as text.
    pub fn branch_specific_label(
        &self,
        branch_name: &str,
        branch_name_override: Option<&str>,
    ) -> String {
        static INVALID: OnceLock<Option<Regex>> = OnceLock::new();

        let mut label = if self.label == USE_BRANCH_NAME {
            BRANCH_NAME_PLACEHOLDER.to_string()
        } else {
            self.label.clone()
        };
        let mut value = branch_name_override
            .unwrap_or_else(|| strip_origin(branch_name))
            .to_string();

        if label.contains(BRANCH_NAME_PLACEHOLDER) {
            if let Some(prefix) = self
                .branch_prefix_to_trim
                .as_deref()
                .filter(|p| !p.trim().is_empty())
            {
                match RegexBuilder::new(prefix).case_insensitive(true).build() {
                    Ok(re) => {
                        let trimmed = re.replace_all(&value, "");
                        if !trimmed.is_empty() {
                            value = trimmed.into_owned();
                        }
                    }
                    Err(e) => warn!(prefix, error = %e, "invalid branch prefix regex"),
                }
            }

            if let Some(re) = INVALID
                .get_or_init(|| Regex::new("[^a-zA-Z0-9-]").ok())
                .as_ref()
            {
                value = re.replace_all(&value, "-").into_owned();
            }
            label = label.replace(BRANCH_NAME_PLACEHOLDER, &value);
        }

        if let Some(pattern) = self.label_number_pattern.as_deref().filter(|p| !p.is_empty()) {
            if !value.is_empty() {
                match Regex::new(pattern) {
                    Ok(re) => {
                        if let Some(number) = re.captures(&value).and_then(|c| c.name("number")) {
                            label.push_str(number.as_str());
                        }
                    }
                    Err(e) => warn!(pattern, error = %e, "invalid label number pattern"),
                }
            }
        }

        label
    }
}
