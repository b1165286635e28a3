use crate::calculation::strategies::{BaseVersions, VersionStrategy};
use crate::calculation::{BaseVersion, EffectiveBranchConfiguration, GitVersionContext};
use crate::domain::{Commit, SemanticVersion, SemanticVersionFormat};
use crate::error::Result;
use crate::git::RepositoryStore;
use git2::Oid;
use regex::RegexBuilder;
use std::collections::HashSet;
use std::iter;

/// Version named by a release branch, e.g. `release/2.1.0`
///
/// The source commit is the point where the branch left its source branches.
pub struct VersionInBranchNameStrategy<'a> {
    store: RepositoryStore<'a>,
    context: &'a GitVersionContext,
}

impl<'a> VersionInBranchNameStrategy<'a> {
    pub fn new(store: RepositoryStore<'a>, context: &'a GitVersionContext) -> Self {
        VersionInBranchNameStrategy { store, context }
    }

    /// Newest commit of the current branch also reachable from a source branch
    fn branch_point(&self) -> Result<Option<Commit>> {
        let repo = self.store.repository();
        let branch = &self.context.current_branch;
        let sources = self
            .store
            .source_branches(branch, &self.context.configuration, &HashSet::new())?;

        let mut reachable: HashSet<Oid> = HashSet::new();
        for source in &sources {
            reachable.extend(repo.commits(source)?.into_iter().map(|c| c.id));
        }
        Ok(repo
            .commits(branch)?
            .into_iter()
            .find(|c| reachable.contains(&c.id)))
    }
}

impl VersionStrategy for VersionInBranchNameStrategy<'_> {
    fn name(&self) -> &'static str {
        "version-in-branch-name"
    }

    fn base_versions(&self, configuration: &EffectiveBranchConfiguration) -> Result<BaseVersions<'_>> {
        let effective = &configuration.value;
        if !effective.is_release_branch {
            return Ok(Box::new(iter::empty()));
        }

        let name = self.context.current_branch.name_without_origin();
        let mut version_text = name.to_string();
        if let Some(prefix) = effective.branch_prefix_to_trim.as_deref() {
            if let Ok(re) = RegexBuilder::new(prefix).case_insensitive(true).build() {
                version_text = re.replace(&version_text, "").into_owned();
            }
        }

        let Some(version) = SemanticVersion::try_parse(
            &version_text,
            Some(&effective.tag_prefix),
            SemanticVersionFormat::Loose,
        ) else {
            return Ok(Box::new(iter::empty()));
        };

        // the branch name without its version, for `{BranchName}` labels
        let name_override = name
            .strip_suffix(version_text.as_str())
            .map(|rest| rest.trim_end_matches(&['/', '-'][..]))
            .filter(|rest| !rest.is_empty())
            .map(str::to_string);

        let source = self.branch_point()?;
        Ok(Box::new(iter::once(BaseVersion::new(
            "Version in branch name",
            false,
            version,
            source,
            name_override,
        ))))
    }
}
