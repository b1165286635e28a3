//! Domain model - versions, commits, branches and tags independent of git access

pub mod branch;
pub mod build_metadata;
pub mod commit;
pub mod prerelease;
pub mod tag;
pub mod version;

pub use branch::{escape_branch_name, strip_origin, Branch};
pub use build_metadata::BuildMetadata;
pub use commit::Commit;
pub use prerelease::PreReleaseTag;
pub use tag::{Tag, TaggedVersion};
pub use version::{SemanticVersion, SemanticVersionFormat, VersionField};
