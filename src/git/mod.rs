//! Read-only repository access
//!
//! The version engine never talks to git directly. It reads commits,
//! branches and tags through the [Repository] trait:
//!
//! - [repository::Git2Repository]: a real implementation using the `git2` crate
//! - [mock::MockRepository]: an in-memory implementation for tests
//!
//! [store::RepositoryStore] derives the higher-level facts the strategies
//! need (tagged versions by commit, mainline branches, source branches).
//!
//! ```rust
//! # use git_stamp::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> git_stamp::Result<()> {
//! let branch = repo.head_branch()?;
//! for commit in repo.commits(&branch)? {
//!     println!("{} {}", commit.short_sha(), commit.summary());
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;
pub mod store;

pub use mock::MockRepository;
pub use repository::Git2Repository;
pub use store::RepositoryStore;

use crate::domain::{Branch, Commit, Tag};
use crate::error::Result;
use git2::Oid;

/// Repository facts the version engine reads
///
/// ## Thread Safety
///
/// Implementors must be `Send + Sync` so independent resolutions can share
/// one repository across threads.
///
/// ## Error Handling
///
/// Implementations map backend failures (like `git2::Error`) to
/// [crate::error::GitStampError] variants.
pub trait Repository: Send + Sync {
    /// Branch checked out at HEAD
    ///
    /// A detached HEAD is reported as a branch named `(no branch)` whose tip
    /// is the HEAD commit.
    fn head_branch(&self) -> Result<Branch>;

    /// Every local and remote-tracking branch
    fn branches(&self) -> Result<Vec<Branch>>;

    /// Commits reachable from the branch tip, newest first
    ///
    /// # Returns
    /// * `Ok(Vec<Commit>)` - Empty when the branch has no tip
    /// * `Err` - If the history cannot be walked
    fn commits(&self, branch: &Branch) -> Result<Vec<Commit>>;

    /// Look up a single commit
    ///
    /// # Returns
    /// * `Ok(Commit)` - The commit
    /// * `Err` - If the id names no commit
    fn find_commit(&self, id: Oid) -> Result<Commit>;

    /// Every tag with the commit it (peeled) points at
    ///
    /// Tags pointing at something other than a commit are left out.
    fn tags(&self) -> Result<Vec<Tag>>;

    /// Look up a branch by name, accepting `origin/` style prefixes
    ///
    /// Local branches win over remote-tracking ones with the same name.
    fn find_branch(&self, name: &str) -> Result<Option<Branch>> {
        let mut candidates: Vec<Branch> = self
            .branches()?
            .into_iter()
            .filter(|b| b.name == name || b.name_without_origin() == crate::domain::strip_origin(name))
            .collect();
        candidates.sort_by_key(|b| b.is_remote);
        Ok(candidates.into_iter().next())
    }
}
