use crate::calculation::strategies::{BaseVersions, VersionStrategy};
use crate::calculation::{BaseVersion, EffectiveBranchConfiguration, GitVersionContext};
use crate::config::CommitMessageIncrementMode;
use crate::domain::{strip_origin, Commit, SemanticVersion, SemanticVersionFormat};
use crate::error::Result;
use crate::git::RepositoryStore;
use regex::RegexBuilder;
use tracing::debug;

/// Versions named by release branches merged into the current branch
///
/// `Merge branch 'release/2.0.0'` on the current branch proposes `2.0.0`,
/// sourced at the merge commit.
pub struct MergeMessageVersionStrategy<'a> {
    store: RepositoryStore<'a>,
    context: &'a GitVersionContext,
}

impl<'a> MergeMessageVersionStrategy<'a> {
    pub fn new(store: RepositoryStore<'a>, context: &'a GitVersionContext) -> Self {
        MergeMessageVersionStrategy { store, context }
    }

    /// Version carried by the release branch a merge commit brought in
    fn merged_release_version(&self, commit: &Commit) -> Option<SemanticVersion> {
        let configuration = &self.context.configuration;
        let merged = commit.merged_branch_name()?;
        let merged = strip_origin(&merged);
        if !configuration.is_release_branch(merged) {
            return None;
        }

        let mut version_text = merged.to_string();
        if let Some(prefix) = configuration
            .branch_configuration(merged)
            .regex
            .filter(|r| !r.is_empty())
        {
            if let Ok(re) = RegexBuilder::new(&prefix).case_insensitive(true).build() {
                version_text = re.replace(&version_text, "").into_owned();
            }
        }

        let version = SemanticVersion::try_parse(
            &version_text,
            Some(&configuration.tag_prefix),
            SemanticVersionFormat::Loose,
        );
        if version.is_none() {
            debug!(branch = merged, "merged release branch does not name a version");
        }
        version
    }
}

impl VersionStrategy for MergeMessageVersionStrategy<'_> {
    fn name(&self) -> &'static str {
        "merge-message"
    }

    fn base_versions(&self, configuration: &EffectiveBranchConfiguration) -> Result<BaseVersions<'_>> {
        let effective = &configuration.value;
        if !effective.track_merge_message
            || effective.commit_message_incrementing == CommitMessageIncrementMode::Disabled
        {
            return Ok(Box::new(std::iter::empty()));
        }

        let current = &self.context.current_commit;
        let should_increment = !effective.prevent_increment_of_merged_branch_version;
        let mut versions = Vec::new();
        for commit in self.store.repository().commits(&self.context.current_branch)? {
            if !commit.is_merge() || commit.when > current.when {
                continue;
            }
            if let Some(version) = self.merged_release_version(&commit) {
                versions.push(BaseVersion::new(
                    format!("Merge message '{}'", commit.summary()),
                    should_increment,
                    version,
                    Some(commit),
                    None,
                ));
            }
        }

        Ok(Box::new(versions.into_iter()))
    }
}
