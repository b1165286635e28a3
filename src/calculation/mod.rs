//! Version calculation: from repository facts to the version of the current commit
//!
//! The pipeline runs in one direction:
//!
//! 1. [GitVersionContext] captures the current branch, commit and configuration
//! 2. [EffectiveBranchConfigurationFinder] resolves inherited branch settings
//! 3. [strategies] propose [BaseVersion] candidates, [filters] drop some of them
//! 4. [BaseVersionCalculator] picks the winner
//! 5. [NextVersionCalculator] applies increments, labels and build metadata

pub mod base_version;
pub mod calculator;
pub mod context;
pub mod effective_branch;
pub mod filters;
pub mod increment;
pub mod next_version;
pub mod strategies;

pub use base_version::BaseVersion;
pub use calculator::{BaseVersionCalculator, CalculatedBaseVersion, ExcludedCandidate};
pub use context::GitVersionContext;
pub use effective_branch::{EffectiveBranchConfiguration, EffectiveBranchConfigurationFinder};
pub use filters::VersionFilter;
pub use increment::IncrementAnalyzer;
pub use next_version::{NextVersion, NextVersionCalculator};
pub use strategies::VersionStrategy;
