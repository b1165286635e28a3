use crate::calculation::strategies::{BaseVersions, VersionStrategy};
use crate::calculation::{BaseVersion, EffectiveBranchConfiguration, GitVersionContext};
use crate::domain::TaggedVersion;
use crate::error::Result;
use crate::git::RepositoryStore;
use git2::Oid;
use std::collections::{HashMap, HashSet};

/// Versions from tags on the current branch that are not newer than the current commit
///
/// Each tag's commit becomes the base version source; only commits after it
/// increment the version.
pub struct TaggedCommitVersionStrategy<'a> {
    store: RepositoryStore<'a>,
    context: &'a GitVersionContext,
}

impl<'a> TaggedCommitVersionStrategy<'a> {
    pub fn new(store: RepositoryStore<'a>, context: &'a GitVersionContext) -> Self {
        TaggedCommitVersionStrategy { store, context }
    }

    fn tagged_versions(&self, configuration: &EffectiveBranchConfiguration) -> Result<Vec<TaggedVersion>> {
        let global = &self.context.configuration;
        let effective = &configuration.value;
        let older_than = self.context.current_commit.when;
        let label = effective.branch_specific_label(&self.context.current_branch.name, None);
        let matches_label = |tagged: &TaggedVersion| {
            tagged
                .version
                .is_match_for_branch_specific_label(Some(label.as_str()))
        };

        let all_tags = self
            .store
            .tagged_versions(&global.tag_prefix, global.semantic_version_format)?;
        let mut by_commit: HashMap<Oid, Vec<&TaggedVersion>> = HashMap::new();
        for tagged in &all_tags {
            by_commit.entry(tagged.tag.commit.id).or_default().push(tagged);
        }
        let repo = self.store.repository();

        let mut returned = HashSet::new();
        let mut selected = Vec::new();
        let mut keep = |tagged: &TaggedVersion| {
            if returned.insert(tagged.key()) {
                selected.push(tagged.clone());
            }
        };

        let history = repo.commits(&self.context.current_branch)?;
        for commit in &history {
            for tagged in by_commit.get(&commit.id).into_iter().flatten().copied() {
                if commit.when <= older_than && matches_label(tagged) {
                    keep(tagged);
                }
            }
        }

        if effective.track_merge_target && !history.is_empty() {
            let on_branch: HashSet<Oid> = history.iter().map(|c| c.id).collect();
            // in repository tag order
            for tagged in &all_tags {
                let commit = &tagged.tag.commit;
                if commit.when > older_than {
                    continue;
                }
                if commit.parents.iter().any(|p| on_branch.contains(p)) && matches_label(tagged) {
                    keep(tagged);
                }
            }
        }

        if effective.tracks_release_branches {
            for mainline in self.store.mainline_branches(global)? {
                for commit in repo.commits(&mainline)? {
                    for tagged in by_commit.get(&commit.id).into_iter().flatten().copied() {
                        if matches_label(tagged) {
                            keep(tagged);
                        }
                    }
                }
            }
        }

        Ok(selected)
    }
}

impl VersionStrategy for TaggedCommitVersionStrategy<'_> {
    fn name(&self) -> &'static str {
        "tagged-commit"
    }

    fn base_versions(&self, configuration: &EffectiveBranchConfiguration) -> Result<BaseVersions<'_>> {
        let versions = self.tagged_versions(configuration)?;
        Ok(Box::new(versions.into_iter().map(|tagged| {
            BaseVersion::new(
                format!("Git tag '{}'", tagged.tag.friendly_name()),
                true,
                tagged.version,
                Some(tagged.tag.commit),
                None,
            )
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Configuration, EffectiveConfiguration};
    use crate::git::mock::{mock_oid, MockRepository};
    use crate::git::Repository;

    fn collect(repo: &MockRepository, branch: &str) -> Vec<String> {
        let config = Configuration::default();
        let context = GitVersionContext::new(repo, config.clone(), Some(branch)).unwrap();
        let effective = EffectiveBranchConfiguration::new(
            context.current_branch.clone(),
            EffectiveConfiguration::new(&config, &config.branch_configuration(branch)),
        );
        let strategy = TaggedCommitVersionStrategy::new(RepositoryStore::new(repo), &context);
        let sources: Vec<String> = strategy
            .base_versions(&effective)
            .unwrap()
            .map(|v| v.source)
            .collect();
        sources
    }

    #[test]
    fn test_future_tags_are_excluded() {
        let mut repo = MockRepository::new();
        repo.commit(1, 100, "c1", &[]);
        repo.commit(2, 200, "current", &[1]);
        repo.commit(3, 300, "c2", &[2]);
        repo.set_branch_head("main", mock_oid(2));
        repo.set_branch_head("support/2.x", mock_oid(3));
        repo.add_tag("1.0.0", mock_oid(1));
        repo.add_tag("2.0.0", mock_oid(3));

        assert_eq!(collect(&repo, "main"), vec!["Git tag '1.0.0'"]);
    }

    #[test]
    fn test_tags_must_match_branch_label() {
        let mut repo = MockRepository::new();
        repo.commit(1, 100, "c1", &[]);
        repo.commit(2, 200, "c2", &[1]);
        repo.set_branch_head("release/1.1.0", mock_oid(2));
        repo.add_tag("v1.0.0", mock_oid(1));
        repo.add_tag("v1.1.0-beta.1", mock_oid(2));
        repo.add_tag("v1.1.0-alpha.3", mock_oid(2));

        let mut sources = collect(&repo, "release/1.1.0");
        sources.sort();
        assert_eq!(sources, vec!["Git tag 'v1.0.0'", "Git tag 'v1.1.0-beta.1'"]);
    }

    #[test]
    fn test_each_tag_reported_once() {
        let mut repo = MockRepository::new();
        repo.commit(1, 100, "c1", &[]);
        repo.set_branch_head("main", mock_oid(1));
        repo.add_tag("v1.0.0", mock_oid(1));

        assert_eq!(collect(&repo, "main").len(), 1);
    }

    #[test]
    fn test_track_merge_target_picks_up_tag_on_merge_commit() {
        let mut repo = MockRepository::new();
        repo.commit(1, 100, "root", &[]);
        repo.commit(2, 200, "on develop", &[1]);
        repo.commit(3, 300, "release work", &[1]);
        // merge of develop into the release line, tagged there
        repo.commit(4, 400, "Merge branch 'develop'", &[3, 2]);
        repo.commit(5, 500, "more develop", &[2]);
        repo.set_branch_head("develop", mock_oid(5));
        repo.set_branch_head("release/1.0.0", mock_oid(4));
        repo.add_tag("v1.0.0", mock_oid(4));

        let develop = repo.find_branch("develop").unwrap().unwrap();
        assert!(!repo.commits(&develop).unwrap().iter().any(|c| c.id == mock_oid(4)));
        assert_eq!(collect(&repo, "develop"), vec!["Git tag 'v1.0.0'"]);
    }

    #[test]
    fn test_merge_target_tags_follow_repository_tag_order() {
        let mut repo = MockRepository::new();
        repo.commit(1, 100, "root", &[]);
        repo.commit(2, 500, "develop work", &[1]);
        repo.commit(3, 200, "side a", &[1]);
        repo.commit(4, 300, "side b", &[1]);
        repo.commit(5, 400, "side c", &[1]);
        repo.set_branch_head("develop", mock_oid(2));
        repo.add_tag("v1.0.0", mock_oid(4));
        repo.add_tag("1.0.0", mock_oid(5));
        repo.add_tag("V1.0.0", mock_oid(3));

        let expected = vec!["Git tag 'v1.0.0'", "Git tag '1.0.0'", "Git tag 'V1.0.0'"];
        for _ in 0..10 {
            assert_eq!(collect(&repo, "develop"), expected);
        }
    }

    #[test]
    fn test_tracks_release_branches_reads_mainline_tags() {
        let mut repo = MockRepository::new();
        repo.commit(1, 100, "root", &[]);
        repo.commit(2, 200, "hotfix on main", &[1]);
        repo.commit(3, 300, "develop work", &[1]);
        repo.set_branch_head("main", mock_oid(2));
        repo.set_branch_head("develop", mock_oid(3));
        repo.add_tag("v1.0.1", mock_oid(2));

        assert_eq!(collect(&repo, "develop"), vec!["Git tag 'v1.0.1'"]);
    }
}
