//! Resolution of a branch's effective configuration through its source branches

use crate::config::{BranchConfiguration, Configuration, EffectiveConfiguration, IncrementStrategy};
use crate::diagnostics::Diagnostic;
use crate::domain::Branch;
use crate::error::{GitStampError, Result};
use crate::git::RepositoryStore;
use std::collections::HashSet;
use tracing::debug;

/// A branch paired with the configuration it resolved to
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveBranchConfiguration {
    pub branch: Branch,
    pub value: EffectiveConfiguration,
}

impl EffectiveBranchConfiguration {
    pub fn new(branch: Branch, value: EffectiveConfiguration) -> Self {
        EffectiveBranchConfiguration { branch, value }
    }
}

/// Walks `Inherit` increments up through source branches
///
/// A branch whose rule inherits its increment takes its settings from each of
/// its source branches in turn, so one branch may resolve to several
/// configurations. Every branch is visited at most once per call, which keeps
/// cyclic source relationships finite.
pub struct EffectiveBranchConfigurationFinder<'a> {
    store: RepositoryStore<'a>,
    configuration: &'a Configuration,
}

impl<'a> EffectiveBranchConfigurationFinder<'a> {
    pub fn new(store: RepositoryStore<'a>, configuration: &'a Configuration) -> Self {
        EffectiveBranchConfigurationFinder {
            store,
            configuration,
        }
    }

    /// All effective configurations `branch` resolves to
    ///
    /// Returns an empty list when every path ends in a skipped orphan.
    pub fn configurations(&self, branch: &Branch) -> Result<Vec<EffectiveBranchConfiguration>> {
        if branch.name.trim().is_empty() {
            return Err(GitStampError::invalid_argument("branch name is empty"));
        }

        let mut visited = HashSet::new();
        let mut stack: Vec<(Branch, Option<BranchConfiguration>)> = vec![(branch.clone(), None)];
        let mut resolved = Vec::new();

        while let Some((branch, child)) = stack.pop() {
            if !visited.insert(branch.name_without_origin().to_string()) {
                continue;
            }

            let own = self.configuration.branch_configuration(branch.name_without_origin());
            let raw = match child {
                Some(child) => child.inherit(&own),
                None => own,
            };

            if raw.increment == IncrementStrategy::Inherit {
                let sources = self.store.source_branches(&branch, self.configuration, &visited)?;
                if !sources.is_empty() {
                    debug!(
                        branch = %branch,
                        sources = ?sources.iter().map(|b| b.name.as_str()).collect::<Vec<_>>(),
                        "inheriting from source branches"
                    );
                    // reversed so the first source is expanded first
                    for source in sources.into_iter().rev() {
                        stack.push((source, Some(raw.clone())));
                    }
                    continue;
                }

                let skipped = self.configuration.increment == IncrementStrategy::Inherit;
                Diagnostic::OrphanedBranch {
                    branch: branch.name.clone(),
                    skipped,
                }
                .log();
                if skipped {
                    continue;
                }
            }

            let value = EffectiveConfiguration::new(self.configuration, &raw);
            resolved.push(EffectiveBranchConfiguration::new(branch, value));
        }

        Ok(resolved)
    }
}
