use crate::calculation::strategies::{BaseVersions, VersionStrategy};
use crate::calculation::{BaseVersion, EffectiveBranchConfiguration, GitVersionContext};
use crate::domain::{SemanticVersion, SemanticVersionFormat};
use crate::error::Result;
use std::iter;
use tracing::warn;

/// Version from `next-version` in the configuration
///
/// Ignored once the current commit is tagged.
pub struct ConfiguredNextVersionStrategy<'a> {
    context: &'a GitVersionContext,
}

impl<'a> ConfiguredNextVersionStrategy<'a> {
    pub fn new(context: &'a GitVersionContext) -> Self {
        ConfiguredNextVersionStrategy { context }
    }
}

impl VersionStrategy for ConfiguredNextVersionStrategy<'_> {
    fn name(&self) -> &'static str {
        "configured-next-version"
    }

    fn base_versions(&self, configuration: &EffectiveBranchConfiguration) -> Result<BaseVersions<'_>> {
        let effective = &configuration.value;
        let Some(next_version) = effective
            .next_version
            .as_deref()
            .filter(|v| !v.trim().is_empty())
        else {
            return Ok(Box::new(iter::empty()));
        };
        if self.context.is_current_commit_tagged() {
            return Ok(Box::new(iter::empty()));
        }

        let parsed = SemanticVersion::try_parse(
            next_version,
            Some(&effective.tag_prefix),
            SemanticVersionFormat::Loose,
        );
        match parsed {
            Some(version) => Ok(Box::new(iter::once(BaseVersion::new(
                "NextVersion in configuration file",
                false,
                version,
                None,
                None,
            )))),
            None => {
                warn!(next_version, "next-version is not a version, ignoring it");
                Ok(Box::new(iter::empty()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigurationBuilder, EffectiveConfiguration};
    use crate::git::mock::{mock_oid, MockRepository};

    fn run(next_version: Option<&str>, tag_head: bool) -> Vec<BaseVersion> {
        let mut repo = MockRepository::new();
        repo.commit(1, 100, "root", &[]);
        repo.set_branch_head("main", mock_oid(1));
        repo.checkout("main");
        if tag_head {
            repo.add_tag("v1.0.0", mock_oid(1));
        }
        let mut builder = ConfigurationBuilder::git_flow();
        if let Some(v) = next_version {
            builder = builder.with_next_version(v);
        }
        let config = builder.build();
        let context = GitVersionContext::new(&repo, config.clone(), None).unwrap();
        let effective = EffectiveBranchConfiguration::new(
            context.current_branch.clone(),
            EffectiveConfiguration::new(&config, &config.branch_configuration("main")),
        );
        let strategy = ConfiguredNextVersionStrategy::new(&context);
        let versions: Vec<BaseVersion> = strategy.base_versions(&effective).unwrap().collect();
        versions
    }

    #[test]
    fn test_yields_configured_version() {
        let versions = run(Some("2.0"), false);
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].semantic_version.to_string(), "2.0.0");
        assert_eq!(versions[0].source, "NextVersion in configuration file");
        assert!(!versions[0].should_increment);
        assert!(versions[0].base_version_source.is_none());
    }

    #[test]
    fn test_nothing_without_configuration_or_when_tagged() {
        assert!(run(None, false).is_empty());
        assert!(run(Some("2.0.0"), true).is_empty());
        assert!(run(Some("banana"), false).is_empty());
    }
}
