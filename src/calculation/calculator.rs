use crate::calculation::filters::{self, VersionFilter};
use crate::calculation::strategies::{self, VersionStrategy};
use crate::calculation::{
    BaseVersion, EffectiveBranchConfiguration, EffectiveBranchConfigurationFinder, GitVersionContext,
};
use crate::config::EffectiveConfiguration;
use crate::diagnostics::Diagnostic;
use crate::domain::{Branch, SemanticVersion};
use crate::error::Result;
use crate::git::RepositoryStore;
use tracing::debug;

/// Source description of the version used when nothing else applies
pub const FALLBACK_SOURCE: &str = "Fallback base version";

/// A candidate dropped by a filter, kept for reporting
#[derive(Debug, Clone, PartialEq)]
pub struct ExcludedCandidate {
    pub candidate: BaseVersion,
    pub reason: String,
}

/// Outcome of a base version calculation
#[derive(Debug, Clone)]
pub struct CalculatedBaseVersion {
    pub base_version: BaseVersion,
    /// Configuration of the branch path that produced the winner
    pub configuration: EffectiveBranchConfiguration,
    pub excluded: Vec<ExcludedCandidate>,
}

/// Runs every strategy over every effective configuration and keeps the best
///
/// The highest surviving version wins. Among equal versions the first one
/// with a source commit wins; a winner without a source commit borrows the
/// oldest source of any surviving candidate. With no survivors the result is
/// `0.0.0` sourced at the root commit.
pub struct BaseVersionCalculator<'a> {
    store: RepositoryStore<'a>,
    context: &'a GitVersionContext,
    strategies: Vec<Box<dyn VersionStrategy + 'a>>,
    extra_filters: Vec<Box<dyn VersionFilter>>,
}

impl<'a> BaseVersionCalculator<'a> {
    /// Calculator using the built-in strategies
    pub fn new(store: RepositoryStore<'a>, context: &'a GitVersionContext) -> Self {
        BaseVersionCalculator {
            store,
            context,
            strategies: strategies::registered(store, context),
            extra_filters: Vec::new(),
        }
    }

    /// Replace the strategy set
    pub fn with_strategies(mut self, strategies: Vec<Box<dyn VersionStrategy + 'a>>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Add a filter on top of the configured ones
    pub fn with_filter(mut self, filter: Box<dyn VersionFilter>) -> Self {
        self.extra_filters.push(filter);
        self
    }

    /// Select the base version for `branch`
    ///
    /// # Arguments
    /// * `branch` - Branch whose effective configurations drive the strategies
    ///
    /// # Returns
    /// * `Ok(CalculatedBaseVersion)` - Winner plus every excluded candidate
    /// * `Err` - If the branch name is empty or the repository cannot be read
    pub fn calculate(&self, branch: &Branch) -> Result<CalculatedBaseVersion> {
        let finder = EffectiveBranchConfigurationFinder::new(self.store, &self.context.configuration);
        let configurations = finder.configurations(branch)?;

        let mut survivors: Vec<(BaseVersion, &EffectiveBranchConfiguration)> = Vec::new();
        let mut excluded = Vec::new();
        for configuration in &configurations {
            let configured = filters::for_configuration(&configuration.value);
            for strategy in &self.strategies {
                for candidate in strategy.base_versions(configuration)? {
                    let reason = configured
                        .iter()
                        .chain(self.extra_filters.iter())
                        .find_map(|filter| filter.exclude(&candidate));
                    match reason {
                        Some(reason) => {
                            Diagnostic::CandidateExcluded {
                                candidate: candidate.to_string(),
                                reason: reason.clone(),
                            }
                            .log();
                            excluded.push(ExcludedCandidate { candidate, reason });
                        }
                        None => {
                            debug!(strategy = strategy.name(), "{}", candidate);
                            survivors.push((candidate, configuration));
                        }
                    }
                }
            }
        }

        let Some((winner, configuration)) = select(&survivors) else {
            return self.fallback(branch, excluded);
        };

        let mut base_version = winner.clone();
        if base_version.base_version_source.is_none() {
            base_version.base_version_source = survivors
                .iter()
                .filter_map(|(candidate, _)| candidate.base_version_source.as_ref())
                .min_by_key(|commit| commit.when)
                .cloned();
        }
        debug!(base_version = %base_version, "selected base version");

        Ok(CalculatedBaseVersion {
            base_version,
            configuration: configuration.clone(),
            excluded,
        })
    }

    fn fallback(&self, branch: &Branch, excluded: Vec<ExcludedCandidate>) -> Result<CalculatedBaseVersion> {
        Diagnostic::NoCandidates {
            branch: branch.name.clone(),
        }
        .log();

        let configuration = &self.context.configuration;
        let value = EffectiveConfiguration::new(
            configuration,
            &configuration.branch_configuration(branch.name_without_origin()),
        );
        let root = self.store.root_commit(branch)?;

        Ok(CalculatedBaseVersion {
            base_version: BaseVersion::new(FALLBACK_SOURCE, true, SemanticVersion::default(), root, None),
            configuration: EffectiveBranchConfiguration::new(branch.clone(), value),
            excluded,
        })
    }
}

fn select<'c>(
    survivors: &'c [(BaseVersion, &'c EffectiveBranchConfiguration)],
) -> Option<(&'c BaseVersion, &'c EffectiveBranchConfiguration)> {
    let mut best: Option<&(BaseVersion, &EffectiveBranchConfiguration)> = None;
    for entry in survivors {
        let better = match best {
            None => true,
            Some((current, _)) => {
                let candidate = &entry.0;
                candidate.semantic_version > current.semantic_version
                    || (candidate.semantic_version == current.semantic_version
                        && current.base_version_source.is_none()
                        && candidate.base_version_source.is_some())
            }
        };
        if better {
            best = Some(entry);
        }
    }
    best.map(|(candidate, configuration)| (candidate, *configuration))
}
