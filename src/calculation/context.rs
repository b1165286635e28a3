use crate::config::Configuration;
use crate::domain::{Branch, Commit, SemanticVersion};
use crate::error::{GitStampError, Result};
use crate::git::{Repository, RepositoryStore};
use tracing::debug;

/// Read-only facts for one version calculation
#[derive(Debug, Clone)]
pub struct GitVersionContext {
    pub current_branch: Branch,
    pub current_commit: Commit,
    pub configuration: Configuration,
    /// Highest version tag on the current commit, if any
    pub current_commit_tagged_version: Option<SemanticVersion>,
}

impl GitVersionContext {
    /// Build the context for `target_branch`, or for HEAD when none is given
    ///
    /// # Returns
    /// * `Ok(GitVersionContext)` - Context for the branch tip
    /// * `Err(InvalidArgument)` - If the target branch is empty or unknown
    /// * `Err` - If the repository cannot be read
    pub fn new(
        repo: &dyn Repository,
        configuration: Configuration,
        target_branch: Option<&str>,
    ) -> Result<Self> {
        let current_branch = match target_branch {
            Some(name) if name.trim().is_empty() => {
                return Err(GitStampError::invalid_argument("target branch name is empty"))
            }
            Some(name) => repo.find_branch(name)?.ok_or_else(|| {
                GitStampError::invalid_argument(format!("branch '{}' does not exist", name))
            })?,
            None => repo.head_branch()?,
        };

        let tip = current_branch.tip.ok_or_else(|| {
            GitStampError::repository(format!("branch '{}' has no commits", current_branch))
        })?;
        let current_commit = repo.find_commit(tip)?;

        let current_commit_tagged_version = RepositoryStore::new(repo)
            .tagged_versions_by_commit(
                &configuration.tag_prefix,
                configuration.semantic_version_format,
            )?
            .remove(&current_commit.id)
            .and_then(|tagged| tagged.into_iter().map(|t| t.version).max());

        debug!(
            branch = %current_branch,
            commit = %current_commit.short_sha(),
            tagged = ?current_commit_tagged_version.as_ref().map(ToString::to_string),
            "version context"
        );

        Ok(GitVersionContext {
            current_branch,
            current_commit,
            configuration,
            current_commit_tagged_version,
        })
    }

    pub fn is_current_commit_tagged(&self) -> bool {
        self.current_commit_tagged_version.is_some()
    }
}
