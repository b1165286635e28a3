use crate::calculation::increment::IncrementAnalyzer;
use crate::calculation::strategies::{BaseVersions, VersionStrategy};
use crate::calculation::{BaseVersion, EffectiveBranchConfiguration, GitVersionContext};
use crate::config::VersioningMode;
use crate::domain::{Commit, SemanticVersion, VersionField};
use crate::error::Result;
use crate::git::RepositoryStore;
use std::iter;
use tracing::debug;

/// Mainline mode: every commit since the last release bumps the version once
///
/// The walk starts at the newest release tag on the branch, or at the root
/// commit with `0.0.0` when nothing was released yet. Each later commit
/// applies its own `+semver:` directive; merge commits default to the
/// branch increment and plain commits to a patch bump.
pub struct MainlineVersionStrategy<'a> {
    store: RepositoryStore<'a>,
    context: &'a GitVersionContext,
}

impl<'a> MainlineVersionStrategy<'a> {
    pub fn new(store: RepositoryStore<'a>, context: &'a GitVersionContext) -> Self {
        MainlineVersionStrategy { store, context }
    }

    /// Newest released version on the branch and the commit carrying it
    fn last_release(&self, history: &[Commit]) -> Result<Option<(String, SemanticVersion, Commit)>> {
        let global = &self.context.configuration;
        let by_commit = self
            .store
            .tagged_versions_by_commit(&global.tag_prefix, global.semantic_version_format)?;

        Ok(history.iter().find_map(|commit| {
            by_commit
                .get(&commit.id)?
                .iter()
                .filter(|tagged| !tagged.version.is_pre_release())
                .max_by(|a, b| a.version.cmp(&b.version))
                .map(|tagged| {
                    (
                        tagged.tag.friendly_name().to_string(),
                        tagged.version.clone(),
                        commit.clone(),
                    )
                })
        }))
    }
}

impl VersionStrategy for MainlineVersionStrategy<'_> {
    fn name(&self) -> &'static str {
        "mainline"
    }

    fn base_versions(&self, configuration: &EffectiveBranchConfiguration) -> Result<BaseVersions<'_>> {
        let effective = &configuration.value;
        if effective.versioning_mode != VersioningMode::Mainline {
            return Ok(Box::new(iter::empty()));
        }

        let branch = &self.context.current_branch;
        let history = self.store.repository().commits(branch)?;
        let (origin, mut version, source) = match self.last_release(&history)? {
            Some(release) => release,
            None => match self.store.root_commit(branch)? {
                Some(root) => (root.short_sha(), SemanticVersion::default(), root),
                None => return Ok(Box::new(iter::empty())),
            },
        };

        let mut since = self.store.commits_since(branch, Some(source.id))?;
        if since.is_empty() {
            return Ok(Box::new(iter::empty()));
        }
        since.reverse();

        let analyzer = IncrementAnalyzer::new(effective);
        let merge_field = match effective.increment.to_version_field() {
            VersionField::None => VersionField::Patch,
            field => field,
        };
        for commit in &since {
            let field = match analyzer.analyze_commits(std::slice::from_ref(commit)) {
                Some(field) => field,
                None if commit.is_merge() => merge_field,
                None => VersionField::Patch,
            };
            version = version.increment(field, None);
        }

        debug!(
            from = %origin,
            commits = since.len(),
            version = %version,
            "mainline iteration"
        );
        Ok(Box::new(iter::once(BaseVersion::new(
            format!("Mainline iteration from '{}'", origin),
            false,
            version,
            Some(source),
            None,
        ))))
    }
}
