use crate::domain::{Branch, Commit, Tag};
use crate::error::{GitStampError, Result};
use chrono::{DateTime, Utc};
use git2::{BranchType, ObjectType, Oid, Repository as Git2Repo, Sort};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Name reported for a detached HEAD
pub const DETACHED_BRANCH_NAME: &str = "(no branch)";

/// Wrapper around git2::Repository with our trait interface
///
/// `git2::Repository` is `Send` but not `Sync`; the mutex makes shared
/// read access across threads sound.
pub struct Git2Repository {
    repo: Mutex<Git2Repo>,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Self::from_git2(repo))
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository {
            repo: Mutex::new(repo),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Git2Repo>> {
        self.repo
            .lock()
            .map_err(|_| GitStampError::repository("repository lock poisoned"))
    }
}

fn to_commit(commit: &git2::Commit<'_>) -> Commit {
    let when = DateTime::<Utc>::from_timestamp(commit.time().seconds(), 0).unwrap_or_default();
    Commit::new(
        commit.id(),
        when,
        commit.message().unwrap_or("(empty message)"),
        commit.parent_ids().collect(),
    )
}

impl super::Repository for Git2Repository {
    fn head_branch(&self) -> Result<Branch> {
        let repo = self.lock()?;
        let head = repo.head()?;
        let tip = head.target();

        if head.is_branch() {
            let name = head
                .shorthand()
                .ok_or_else(|| GitStampError::repository("HEAD branch name is not UTF-8"))?;
            Ok(Branch::new(name, tip))
        } else {
            Ok(Branch::new(DETACHED_BRANCH_NAME, tip))
        }
    }

    fn branches(&self) -> Result<Vec<Branch>> {
        let repo = self.lock()?;
        let mut branches = Vec::new();

        for entry in repo.branches(None)? {
            let (branch, branch_type) = entry?;
            let Some(name) = branch.name()? else {
                continue;
            };
            if name.ends_with("/HEAD") {
                continue;
            }
            let tip = branch.get().target();
            branches.push(match branch_type {
                BranchType::Local => Branch::new(name, tip),
                BranchType::Remote => Branch::remote(name, tip),
            });
        }

        Ok(branches)
    }

    fn commits(&self, branch: &Branch) -> Result<Vec<Commit>> {
        let Some(tip) = branch.tip else {
            return Ok(Vec::new());
        };
        let repo = self.lock()?;
        let mut revwalk = repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(tip)?;

        let mut commits = Vec::new();
        for oid_result in revwalk {
            let commit = repo.find_commit(oid_result?)?;
            commits.push(to_commit(&commit));
        }

        Ok(commits)
    }

    fn find_commit(&self, id: Oid) -> Result<Commit> {
        let repo = self.lock()?;
        let commit = repo
            .find_commit(id)
            .map_err(|e| GitStampError::repository(format!("Cannot find commit {}: {}", id, e)))?;
        Ok(to_commit(&commit))
    }

    fn tags(&self) -> Result<Vec<Tag>> {
        let repo = self.lock()?;
        let names = repo.tag_names(None)?;
        let mut tags = Vec::new();

        for name in names.iter().flatten() {
            let reference = repo.find_reference(&format!("refs/tags/{}", name))?;
            match reference.peel(ObjectType::Commit) {
                Ok(object) => {
                    let commit = object
                        .into_commit()
                        .map_err(|_| GitStampError::repository(format!("Tag '{}' is not a commit", name)))?;
                    tags.push(Tag::new(name, to_commit(&commit)));
                }
                Err(e) => tracing::debug!(tag = name, error = %e, "skipping tag not pointing at a commit"),
            }
        }

        Ok(tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::Repository;
    use tempfile::TempDir;

    fn repo_with_commit() -> (TempDir, Git2Repository, Oid) {
        let dir = TempDir::new().unwrap();
        let repo = Git2Repo::init(dir.path()).unwrap();
        let sig = git2::Signature::new("Test", "test@example.com", &git2::Time::new(1_700_000_000, 0)).unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let oid = {
            let tree = repo.find_tree(tree_id).unwrap();
            repo.commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[]).unwrap()
        };
        (dir, Git2Repository::from_git2(repo), oid)
    }

    #[test]
    fn test_open_missing_repository_fails() {
        let dir = TempDir::new().unwrap();
        assert!(Git2Repository::open(dir.path()).is_err());
    }

    #[test]
    fn test_head_and_commits() {
        let (_dir, repo, oid) = repo_with_commit();
        let head = repo.head_branch().unwrap();
        assert_eq!(head.tip, Some(oid));
        let commits = repo.commits(&head).unwrap();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].message, "initial");
        assert_eq!(commits[0].when.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_tags_are_peeled() {
        let (_dir, repo, oid) = repo_with_commit();
        {
            let raw = repo.lock().unwrap();
            let object = raw.find_object(oid, None).unwrap();
            let sig = git2::Signature::now("Test", "test@example.com").unwrap();
            raw.tag("v1.0.0", &object, &sig, "annotated", false).unwrap();
            raw.tag_lightweight("v1.0.1", &object, false).unwrap();
        }
        let tags = repo.tags().unwrap();
        assert_eq!(tags.len(), 2);
        assert!(tags.iter().all(|t| t.commit.id == oid));
    }
}
