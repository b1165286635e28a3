//! Version strategies: independent sources of base version candidates
//!
//! The registered set is built once per calculation and iterated in
//! registration order, which is also the tie-break order between equal
//! candidates without a source commit.

pub mod configured_next_version;
pub mod mainline;
pub mod merge_message;
pub mod tagged_commit;
pub mod version_in_branch_name;

pub use configured_next_version::ConfiguredNextVersionStrategy;
pub use mainline::MainlineVersionStrategy;
pub use merge_message::MergeMessageVersionStrategy;
pub use tagged_commit::TaggedCommitVersionStrategy;
pub use version_in_branch_name::VersionInBranchNameStrategy;

use crate::calculation::{BaseVersion, EffectiveBranchConfiguration, GitVersionContext};
use crate::error::Result;
use crate::git::RepositoryStore;

/// Finite, single-pass sequence of candidates
///
/// Calling the strategy again yields a fresh sequence.
pub type BaseVersions<'a> = Box<dyn Iterator<Item = BaseVersion> + 'a>;

/// Proposes base version candidates for one effective branch configuration
pub trait VersionStrategy {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    fn base_versions(&self, configuration: &EffectiveBranchConfiguration) -> Result<BaseVersions<'_>>;
}

/// The built-in strategies in registration order
pub fn registered<'a>(
    store: RepositoryStore<'a>,
    context: &'a GitVersionContext,
) -> Vec<Box<dyn VersionStrategy + 'a>> {
    vec![
        Box::new(ConfiguredNextVersionStrategy::new(context)),
        Box::new(TaggedCommitVersionStrategy::new(store, context)),
        Box::new(MergeMessageVersionStrategy::new(store, context)),
        Box::new(VersionInBranchNameStrategy::new(store, context)),
        Box::new(MainlineVersionStrategy::new(store, context)),
    ]
}
