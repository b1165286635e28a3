use serde::Serialize;

/// Rendered version variables, in output order
///
/// Every value is already a string; a missing value is the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VersionVariables {
    pub major: String,
    pub minor: String,
    pub patch: String,
    pub pre_release_tag: String,
    pub pre_release_tag_with_dash: String,
    pub pre_release_label: String,
    pub pre_release_label_with_dash: String,
    pub pre_release_number: String,
    pub weighted_pre_release_number: String,
    pub build_meta_data: String,
    pub full_build_meta_data: String,
    pub major_minor_patch: String,
    pub sem_ver: String,
    pub full_sem_ver: String,
    pub assembly_sem_ver: String,
    pub assembly_sem_file_ver: String,
    pub informational_version: String,
    pub branch_name: String,
    pub escaped_branch_name: String,
    pub sha: String,
    pub short_sha: String,
    pub version_source_sha: String,
    pub commits_since_version_source: String,
    pub commit_date: String,
}

impl VersionVariables {
    /// Variable names and values in output order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("Major", self.major.as_str()),
            ("Minor", self.minor.as_str()),
            ("Patch", self.patch.as_str()),
            ("PreReleaseTag", self.pre_release_tag.as_str()),
            ("PreReleaseTagWithDash", self.pre_release_tag_with_dash.as_str()),
            ("PreReleaseLabel", self.pre_release_label.as_str()),
            ("PreReleaseLabelWithDash", self.pre_release_label_with_dash.as_str()),
            ("PreReleaseNumber", self.pre_release_number.as_str()),
            ("WeightedPreReleaseNumber", self.weighted_pre_release_number.as_str()),
            ("BuildMetaData", self.build_meta_data.as_str()),
            ("FullBuildMetaData", self.full_build_meta_data.as_str()),
            ("MajorMinorPatch", self.major_minor_patch.as_str()),
            ("SemVer", self.sem_ver.as_str()),
            ("FullSemVer", self.full_sem_ver.as_str()),
            ("AssemblySemVer", self.assembly_sem_ver.as_str()),
            ("AssemblySemFileVer", self.assembly_sem_file_ver.as_str()),
            ("InformationalVersion", self.informational_version.as_str()),
            ("BranchName", self.branch_name.as_str()),
            ("EscapedBranchName", self.escaped_branch_name.as_str()),
            ("Sha", self.sha.as_str()),
            ("ShortSha", self.short_sha.as_str()),
            ("VersionSourceSha", self.version_source_sha.as_str()),
            ("CommitsSinceVersionSource", self.commits_since_version_source.as_str()),
            ("CommitDate", self.commit_date.as_str()),
        ]
        .into_iter()
    }

    /// Look up a variable by name, ignoring ASCII case
    pub fn get(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }
}
