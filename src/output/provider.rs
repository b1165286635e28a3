use crate::config::{AssemblyVersioningScheme, EffectiveConfiguration, VersioningMode};
use crate::domain::{escape_branch_name, PreReleaseTag, SemanticVersion};
use crate::error::{GitStampError, Result};
use crate::output::template;
use crate::output::VersionVariables;
use chrono::format::{Item, StrftimeItems};
use tracing::debug;

/// Renders a calculated version into the output variables
///
/// The versioning mode decides how the pre-release number is presented:
/// continuous deployment turns the commit count into the pre-release number,
/// continuous delivery keeps it in the build metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct VariableProvider;

impl VariableProvider {
    pub fn new() -> Self {
        VariableProvider
    }

    /// Variables for `version` under `configuration`
    ///
    /// # Arguments
    /// * `version` - The calculated version with its build metadata
    /// * `configuration` - Effective configuration of the branch
    /// * `current_commit_tagged_version` - Set when the current commit carries
    ///   a version tag; continuous deployment then renders `version` verbatim
    ///
    /// # Returns
    /// * `Ok(VersionVariables)` - Rendered variables
    /// * `Err(Format)` - If a configured format or the date format is invalid
    pub fn variables_for(
        &self,
        version: &SemanticVersion,
        configuration: &EffectiveConfiguration,
        current_commit_tagged_version: Option<&SemanticVersion>,
    ) -> Result<VersionVariables> {
        let version = match configuration.versioning_mode {
            VersioningMode::ContinuousDeployment if current_commit_tagged_version.is_none() => {
                promote_commit_count(version, Some(configuration))
            }
            VersioningMode::Mainline if version.pre_release_tag.number.is_some() => {
                promote_commit_count(version, None)
            }
            _ => version.clone(),
        };
        debug!(version = %version.full_sem_ver(), mode = ?configuration.versioning_mode, "rendering variables");

        let pre_release = &version.pre_release_tag;
        let metadata = &version.build_metadata;
        let has_tag = version.is_pre_release();
        let pre_release_tag = if has_tag { pre_release.to_string() } else { String::new() };
        let pre_release_label = if has_tag { pre_release.name.clone() } else { String::new() };
        let weighted = if has_tag {
            pre_release.number.unwrap_or(0) + configuration.pre_release_weight
        } else {
            configuration.tag_pre_release_weight
        };

        let mut variables = VersionVariables {
            major: version.major.to_string(),
            minor: version.minor.to_string(),
            patch: version.patch.to_string(),
            pre_release_tag_with_dash: with_dash(&pre_release_tag),
            pre_release_tag,
            pre_release_label_with_dash: with_dash(&pre_release_label),
            pre_release_label,
            pre_release_number: pre_release.number.map(|n| n.to_string()).unwrap_or_default(),
            weighted_pre_release_number: weighted.to_string(),
            build_meta_data: metadata.short(),
            full_build_meta_data: metadata.full(),
            major_minor_patch: version.major_minor_patch(),
            sem_ver: version.sem_ver(),
            full_sem_ver: version.full_sem_ver(),
            branch_name: metadata.branch.clone(),
            escaped_branch_name: escape_branch_name(&metadata.branch),
            sha: metadata.sha.clone(),
            short_sha: metadata.short_sha.clone(),
            version_source_sha: metadata.version_source_sha.clone(),
            commits_since_version_source: metadata
                .commits_since_version_source
                .map(|c| c.to_string())
                .unwrap_or_default(),
            commit_date: match metadata.commit_date {
                Some(date) => format_date(date, &configuration.commit_date_format)?,
                None => String::new(),
            },
            ..VersionVariables::default()
        };

        variables.assembly_sem_ver = assembly_version(
            &version,
            configuration.assembly_versioning_scheme,
            configuration.assembly_versioning_format.as_deref(),
            &variables,
        )?;
        variables.assembly_sem_file_ver = assembly_version(
            &version,
            configuration.assembly_file_versioning_scheme,
            configuration.assembly_file_versioning_format.as_deref(),
            &variables,
        )?;
        variables.informational_version = match configuration.assembly_informational_format.as_deref() {
            Some(format) if !format.is_empty() => template::render(format, &variables)?,
            _ if variables.full_build_meta_data.is_empty() => variables.sem_ver.clone(),
            _ => format!("{}+{}", variables.sem_ver, variables.full_build_meta_data),
        };

        Ok(variables)
    }
}

/// Move the commit count into the pre-release number
///
/// With a configuration, a version without pre-release name takes the
/// branch-specific label.
fn promote_commit_count(version: &SemanticVersion, configuration: Option<&EffectiveConfiguration>) -> SemanticVersion {
    let mut promoted = version.clone();
    let metadata = &version.build_metadata;

    let name = match configuration {
        Some(configuration) if version.pre_release_tag.name.is_empty() => {
            configuration.branch_specific_label(&metadata.branch, None)
        }
        _ => version.pre_release_tag.name.clone(),
    };
    let number = metadata
        .commits_since_version_source
        .or(version.pre_release_tag.number);

    promoted.pre_release_tag = PreReleaseTag::new(name, number, true);
    promoted.build_metadata.commits_since_tag = None;
    promoted
}

fn with_dash(value: &str) -> String {
    if value.is_empty() {
        String::new()
    } else {
        format!("-{}", value)
    }
}

fn assembly_version(
    version: &SemanticVersion,
    scheme: AssemblyVersioningScheme,
    format: Option<&str>,
    variables: &VersionVariables,
) -> Result<String> {
    if let Some(format) = format.filter(|f| !f.is_empty()) {
        return template::render(format, variables);
    }

    Ok(match scheme {
        AssemblyVersioningScheme::MajorMinorPatchTag => format!(
            "{}.{}",
            version.major_minor_patch(),
            version.pre_release_tag.number.unwrap_or(0)
        ),
        AssemblyVersioningScheme::MajorMinorPatch => format!("{}.0", version.major_minor_patch()),
        AssemblyVersioningScheme::MajorMinor => format!("{}.{}.0.0", version.major, version.minor),
        AssemblyVersioningScheme::Major => format!("{}.0.0.0", version.major),
        AssemblyVersioningScheme::None => String::new(),
    })
}

fn format_date(date: chrono::DateTime<chrono::Utc>, format: &str) -> Result<String> {
    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(GitStampError::format(format!("invalid commit date format '{}'", format)));
    }
    Ok(date.format_with_items(items.into_iter()).to_string())
}
