use crate::calculation::increment::IncrementAnalyzer;
use crate::calculation::{BaseVersionCalculator, CalculatedBaseVersion, GitVersionContext};
use crate::config::EffectiveConfiguration;
use crate::domain::{BuildMetadata, PreReleaseTag, SemanticVersion};
use crate::error::Result;
use crate::git::RepositoryStore;
use tracing::info;

/// The version of the current commit plus how it was reached
#[derive(Debug, Clone)]
pub struct NextVersion {
    pub semantic_version: SemanticVersion,
    /// Tag on the current commit emitted verbatim, if any
    pub tagged: Option<SemanticVersion>,
    pub base: CalculatedBaseVersion,
}

impl NextVersion {
    /// Effective configuration of the branch path that produced the version
    pub fn configuration(&self) -> &EffectiveConfiguration {
        &self.base.configuration.value
    }
}

/// Turns the selected base version into the version of the current commit
pub struct NextVersionCalculator<'a> {
    store: RepositoryStore<'a>,
    context: &'a GitVersionContext,
    base_calculator: BaseVersionCalculator<'a>,
}

impl<'a> NextVersionCalculator<'a> {
    pub fn new(store: RepositoryStore<'a>, context: &'a GitVersionContext) -> Self {
        Self::with_base_calculator(store, context, BaseVersionCalculator::new(store, context))
    }

    pub fn with_base_calculator(
        store: RepositoryStore<'a>,
        context: &'a GitVersionContext,
        base_calculator: BaseVersionCalculator<'a>,
    ) -> Self {
        NextVersionCalculator {
            store,
            context,
            base_calculator,
        }
    }

    /// Calculate the version of the current commit
    ///
    /// # Returns
    /// * `Ok(NextVersion)` - Version with build metadata filled in
    /// * `Err` - If the repository cannot be read
    pub fn calculate(&self) -> Result<NextVersion> {
        let branch = &self.context.current_branch;
        let current = &self.context.current_commit;
        let base = self.base_calculator.calculate(branch)?;
        let effective = &base.configuration.value;
        let base_version = &base.base_version;

        let label = effective.branch_specific_label(
            &branch.name,
            base_version.branch_name_override.as_deref(),
        );
        let source = base_version.base_version_source.as_ref();
        let commits = self.store.commits_since(branch, source.map(|c| c.id))?;

        let tagged = self.context.current_commit_tagged_version.as_ref().filter(|tagged| {
            source.is_some_and(|s| s.id == current.id)
                && **tagged == base_version.semantic_version
                && tagged.is_match_for_branch_specific_label(Some(label.as_str()))
        });

        let mut version = if let Some(tagged) = tagged {
            tagged.clone()
        } else if base_version.should_increment {
            let analyzer = IncrementAnalyzer::new(effective);
            let field = analyzer.increment_field(effective.increment.to_version_field(), &commits);
            base_version.semantic_version.increment(field, Some(label.as_str()))
        } else if !base_version.semantic_version.is_pre_release() && !label.is_empty() {
            base_version
                .semantic_version
                .clone()
                .with_pre_release(PreReleaseTag::new(label.as_str(), Some(1), false))
        } else {
            base_version.semantic_version.clone()
        };

        let commit_count = commits.len() as u64;
        version.build_metadata = BuildMetadata {
            commits_since_tag: if tagged.is_some() { None } else { Some(commit_count) },
            commits_since_version_source: Some(commit_count),
            sha: current.sha(),
            short_sha: current.short_sha(),
            branch: branch.name_without_origin().to_string(),
            version_source_sha: source.map(|c| c.sha()).unwrap_or_default(),
            commit_date: Some(current.when),
            other_metadata: version.build_metadata.other_metadata.take(),
        };

        info!(
            branch = %branch,
            base = %base_version,
            version = %version.full_sem_ver(),
            "calculated version"
        );
        let tagged = tagged.cloned();
        Ok(NextVersion {
            semantic_version: version,
            tagged,
            base,
        })
    }
}
