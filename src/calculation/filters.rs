//! Predicates that drop base version candidates

use crate::calculation::BaseVersion;
use crate::config::{EffectiveConfiguration, VersioningMode};
use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::warn;

/// Decides whether a candidate is excluded
pub trait VersionFilter: Send + Sync {
    /// `Some(reason)` when the candidate must be dropped
    fn exclude(&self, candidate: &BaseVersion) -> Option<String>;
}

/// Drops candidates whose source description matches a pattern
pub struct SourcePatternFilter {
    patterns: Vec<Regex>,
}

impl SourcePatternFilter {
    pub fn new(patterns: &[String]) -> Self {
        let patterns = patterns
            .iter()
            .filter_map(|p| match Regex::new(p) {
                Ok(re) => Some(re),
                Err(e) => {
                    warn!(pattern = %p, error = %e, "skipping invalid ignore pattern");
                    None
                }
            })
            .collect();
        SourcePatternFilter { patterns }
    }
}

impl VersionFilter for SourcePatternFilter {
    fn exclude(&self, candidate: &BaseVersion) -> Option<String> {
        self.patterns
            .iter()
            .find(|re| re.is_match(&candidate.source))
            .map(|re| format!("source '{}' matches ignore pattern '{}'", candidate.source, re.as_str()))
    }
}

/// Drops candidates whose source commit predates a cutoff
pub struct MinDateFilter {
    cutoff: DateTime<Utc>,
}

impl MinDateFilter {
    pub fn new(cutoff: DateTime<Utc>) -> Self {
        MinDateFilter { cutoff }
    }
}

impl VersionFilter for MinDateFilter {
    fn exclude(&self, candidate: &BaseVersion) -> Option<String> {
        let commit = candidate.base_version_source.as_ref()?;
        (commit.when < self.cutoff).then(|| {
            format!(
                "source commit {} is older than {}",
                commit.short_sha(),
                self.cutoff.to_rfc3339()
            )
        })
    }
}

/// Drops candidates sourced from ignored commits
pub struct ShaFilter {
    shas: Vec<String>,
}

impl ShaFilter {
    pub fn new(shas: &[String]) -> Self {
        ShaFilter {
            shas: shas.iter().map(|s| s.to_lowercase()).collect(),
        }
    }
}

impl VersionFilter for ShaFilter {
    fn exclude(&self, candidate: &BaseVersion) -> Option<String> {
        let commit = candidate.base_version_source.as_ref()?;
        let sha = commit.sha();
        // abbreviated shas in the ignore list match by prefix
        self.shas
            .iter()
            .any(|ignored| !ignored.is_empty() && sha.starts_with(ignored.as_str()))
            .then(|| format!("source commit {} is ignored", commit.short_sha()))
    }
}

/// In mainline mode pre-release candidates never serve as base versions
pub struct MainlinePreReleaseFilter;

impl VersionFilter for MainlinePreReleaseFilter {
    fn exclude(&self, candidate: &BaseVersion) -> Option<String> {
        candidate.semantic_version.is_pre_release().then(|| {
            format!(
                "pre-release version {} is ignored in mainline mode",
                candidate.semantic_version
            )
        })
    }
}

/// Filters implied by an effective configuration
pub fn for_configuration(configuration: &EffectiveConfiguration) -> Vec<Box<dyn VersionFilter>> {
    let mut filters: Vec<Box<dyn VersionFilter>> = Vec::new();
    let ignore = &configuration.ignore;
    if !ignore.sources.is_empty() {
        filters.push(Box::new(SourcePatternFilter::new(&ignore.sources)));
    }
    if let Some(cutoff) = ignore.commits_before {
        filters.push(Box::new(MinDateFilter::new(cutoff)));
    }
    if !ignore.sha.is_empty() {
        filters.push(Box::new(ShaFilter::new(&ignore.sha)));
    }
    if configuration.versioning_mode == VersioningMode::Mainline {
        filters.push(Box::new(MainlinePreReleaseFilter));
    }
    filters
}
