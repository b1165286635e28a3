use crate::config::Configuration;
use crate::diagnostics::Diagnostic;
use crate::domain::{Branch, Commit, SemanticVersionFormat, TaggedVersion};
use crate::error::Result;
use crate::git::Repository;
use git2::Oid;
use std::collections::{HashMap, HashSet};

/// Higher-level repository facts derived from the raw [Repository] interface
#[derive(Clone, Copy)]
pub struct RepositoryStore<'a> {
    repo: &'a dyn Repository,
}

impl<'a> RepositoryStore<'a> {
    pub fn new(repo: &'a dyn Repository) -> Self {
        RepositoryStore { repo }
    }

    pub fn repository(&self) -> &'a dyn Repository {
        self.repo
    }

    /// Every tag that parses as a version, in the repository's tag order
    ///
    /// Tags that are not versions are skipped.
    pub fn tagged_versions(
        &self,
        tag_prefix: &str,
        format: SemanticVersionFormat,
    ) -> Result<Vec<TaggedVersion>> {
        let mut versions = Vec::new();
        for tag in self.repo.tags()? {
            match tag.semantic_version(tag_prefix, format) {
                Some(version) => versions.push(TaggedVersion { tag, version }),
                None => Diagnostic::UnparsableTag { tag: tag.name }.log(),
            }
        }
        Ok(versions)
    }

    /// [`Self::tagged_versions`] indexed by the commit each tag points at
    pub fn tagged_versions_by_commit(
        &self,
        tag_prefix: &str,
        format: SemanticVersionFormat,
    ) -> Result<HashMap<Oid, Vec<TaggedVersion>>> {
        let mut by_commit: HashMap<Oid, Vec<TaggedVersion>> = HashMap::new();
        for tagged in self.tagged_versions(tag_prefix, format)? {
            by_commit.entry(tagged.tag.commit.id).or_default().push(tagged);
        }
        Ok(by_commit)
    }

    /// Local branches plus remote-tracking branches without a local counterpart
    pub fn distinct_branches(&self) -> Result<Vec<Branch>> {
        let branches = self.repo.branches()?;
        let locals: HashSet<String> = branches
            .iter()
            .filter(|b| !b.is_remote)
            .map(|b| b.name.clone())
            .collect();
        Ok(branches
            .into_iter()
            .filter(|b| !b.is_remote || !locals.contains(b.name_without_origin()))
            .collect())
    }

    /// Branches whose resolved rule is a mainline rule
    pub fn mainline_branches(&self, configuration: &Configuration) -> Result<Vec<Branch>> {
        Ok(self
            .distinct_branches()?
            .into_iter()
            .filter(|b| configuration.is_mainline_branch(b.name_without_origin()))
            .collect())
    }

    /// Candidate source branches of `branch`, leaving out `excluded` names
    ///
    /// A candidate must match one of the regexes of the rule keys listed in
    /// the branch's own `source-branches`; a rule without that list accepts
    /// every other branch. Order follows the repository's branch listing.
    pub fn source_branches(
        &self,
        branch: &Branch,
        configuration: &Configuration,
        excluded: &HashSet<String>,
    ) -> Result<Vec<Branch>> {
        let regexes = configuration.source_branch_regexes(branch.name_without_origin());
        Ok(self
            .distinct_branches()?
            .into_iter()
            .filter(|candidate| !candidate.is_same_branch(branch))
            .filter(|candidate| !excluded.contains(candidate.name_without_origin()))
            .filter(|candidate| {
                let name = candidate.name_without_origin();
                regexes.iter().any(|re| re.is_match(name))
            })
            .collect())
    }

    /// Commits on `branch` that are not reachable from `source`, newest first
    ///
    /// Without a source every commit on the branch counts.
    pub fn commits_since(&self, branch: &Branch, source: Option<Oid>) -> Result<Vec<Commit>> {
        let history = self.repo.commits(branch)?;
        let Some(source) = source else {
            return Ok(history);
        };

        let reachable: HashSet<Oid> = self
            .repo
            .commits(&Branch::new("", Some(source)))?
            .into_iter()
            .map(|c| c.id)
            .collect();
        Ok(history
            .into_iter()
            .filter(|c| !reachable.contains(&c.id))
            .collect())
    }

    /// Oldest parentless commit on `branch`
    pub fn root_commit(&self, branch: &Branch) -> Result<Option<Commit>> {
        Ok(self
            .repo
            .commits(branch)?
            .into_iter()
            .filter(|c| c.parents.is_empty())
            .last())
    }
}
