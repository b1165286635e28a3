use crate::domain::{Branch, Commit, Tag};
use crate::error::{GitStampError, Result};
use crate::git::Repository;
use chrono::{DateTime, Utc};
use git2::Oid;
use std::collections::{HashMap, HashSet};

/// Mock repository for testing without actual git operations
///
/// Commits form a DAG through their parent ids; branch histories are
/// computed by walking parents from the branch tip.
pub struct MockRepository {
    commits: HashMap<Oid, Commit>,
    tags: Vec<(String, Oid)>,
    branches: Vec<Branch>,
    head: Option<String>,
}

/// Deterministic commit id built from one byte
pub fn mock_oid(n: u8) -> Oid {
    Oid::from_bytes(&[n; 20]).unwrap_or_else(|_| Oid::zero())
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            commits: HashMap::new(),
            tags: Vec::new(),
            branches: Vec::new(),
            head: None,
        }
    }

    /// Add a commit to the mock repository
    pub fn add_commit(&mut self, commit: Commit) {
        self.commits.insert(commit.id, commit);
    }

    /// Add a commit with id `mock_oid(n)` made `seconds` after the epoch
    pub fn commit(&mut self, n: u8, seconds: i64, message: &str, parents: &[u8]) -> Oid {
        let id = mock_oid(n);
        let when = DateTime::<Utc>::from_timestamp(seconds, 0).unwrap_or_default();
        let parents = parents.iter().map(|p| mock_oid(*p)).collect();
        self.add_commit(Commit::new(id, when, message, parents));
        id
    }

    /// Add a tag pointing to an OID
    pub fn add_tag(&mut self, name: impl Into<String>, oid: Oid) {
        self.tags.push((name.into(), oid));
    }

    /// Set a local branch head, creating the branch if needed
    pub fn set_branch_head(&mut self, branch: impl Into<String>, oid: Oid) {
        self.upsert_branch(Branch::new(branch, Some(oid)));
    }

    /// Set a remote-tracking branch head, e.g. `origin/develop`
    pub fn set_remote_branch_head(&mut self, branch: impl Into<String>, oid: Oid) {
        self.upsert_branch(Branch::remote(branch, Some(oid)));
    }

    /// Point HEAD at a branch
    pub fn checkout(&mut self, branch: impl Into<String>) {
        self.head = Some(branch.into());
    }

    fn upsert_branch(&mut self, branch: Branch) {
        match self.branches.iter_mut().find(|b| b.name == branch.name) {
            Some(existing) => *existing = branch,
            None => self.branches.push(branch),
        }
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn head_branch(&self) -> Result<Branch> {
        let name = self
            .head
            .as_deref()
            .ok_or_else(|| GitStampError::repository("HEAD is not set"))?;
        self.branches
            .iter()
            .find(|b| b.name == name)
            .cloned()
            .ok_or_else(|| GitStampError::repository(format!("Branch not found: {}", name)))
    }

    fn branches(&self) -> Result<Vec<Branch>> {
        Ok(self.branches.clone())
    }

    fn commits(&self, branch: &Branch) -> Result<Vec<Commit>> {
        let Some(tip) = branch.tip else {
            return Ok(Vec::new());
        };

        let mut seen = HashSet::new();
        let mut stack = vec![tip];
        let mut history = Vec::new();
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            let commit = self.find_commit(id)?;
            stack.extend(commit.parents.iter().rev().copied());
            history.push(commit);
        }

        history.sort_by(|a, b| b.when.cmp(&a.when));
        Ok(history)
    }

    fn find_commit(&self, id: Oid) -> Result<Commit> {
        self.commits
            .get(&id)
            .cloned()
            .ok_or_else(|| GitStampError::repository(format!("Commit not found: {}", id)))
    }

    fn tags(&self) -> Result<Vec<Tag>> {
        self.tags
            .iter()
            .map(|(name, id)| Ok(Tag::new(name.clone(), self.find_commit(*id)?)))
            .collect()
    }
}
