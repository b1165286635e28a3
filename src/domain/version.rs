use crate::domain::{BuildMetadata, PreReleaseTag};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

/// Accepted syntax when reading versions out of tags and configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SemanticVersionFormat {
    /// SemVer 2.0 only (`1.2.3`, `1.2.3-beta.1+5`)
    #[default]
    Strict,
    /// Also `1`, `1.2` and a fourth numeric component
    Loose,
}

/// Version component targeted by an increment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VersionField {
    None,
    Patch,
    Minor,
    Major,
}

/// Semantic version with pre-release tag and build metadata
///
/// Equality, ordering and hashing only consider major, minor, patch and the
/// pre-release tag; build metadata never affects precedence.
#[derive(Debug, Clone, Default)]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre_release_tag: PreReleaseTag,
    pub build_metadata: BuildMetadata,
}

impl SemanticVersion {
    /// Create a release version without metadata
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        SemanticVersion {
            major,
            minor,
            patch,
            ..SemanticVersion::default()
        }
    }

    /// Create a version carrying a pre-release tag
    pub fn with_pre_release(mut self, tag: PreReleaseTag) -> Self {
        self.pre_release_tag = tag;
        self
    }

    /// Replace the build metadata
    pub fn with_build_metadata(mut self, metadata: BuildMetadata) -> Self {
        self.build_metadata = metadata;
        self
    }

    /// Parse a version, stripping `tag_prefix` (a regex anchored at the start)
    ///
    /// Returns `None` for anything that is not a version in `format`; a
    /// malformed tag is simply not a candidate.
    pub fn try_parse(
        text: &str,
        tag_prefix: Option<&str>,
        format: SemanticVersionFormat,
    ) -> Option<Self> {
        let text = text.trim();
        let version_text = match tag_prefix.filter(|p| !p.is_empty()) {
            Some(prefix) => {
                let re = Regex::new(&format!("^(?:{})", prefix)).ok()?;
                let m = re.find(text)?;
                &text[m.end()..]
            }
            None => text,
        };

        match format {
            SemanticVersionFormat::Strict => Self::parse_strict(version_text),
            SemanticVersionFormat::Loose => Self::parse_loose(version_text),
        }
    }

    fn parse_strict(text: &str) -> Option<Self> {
        let parsed = semver::Version::parse(text).ok()?;
        let pre_release_tag = if parsed.pre.is_empty() {
            PreReleaseTag::default()
        } else {
            PreReleaseTag::parse(parsed.pre.as_str())
        };
        let build_metadata = if parsed.build.is_empty() {
            BuildMetadata::default()
        } else {
            BuildMetadata::parse(parsed.build.as_str())
        };

        Some(SemanticVersion {
            major: parsed.major,
            minor: parsed.minor,
            patch: parsed.patch,
            pre_release_tag,
            build_metadata,
        })
    }

    fn parse_loose(text: &str) -> Option<Self> {
        static LOOSE: OnceLock<Option<Regex>> = OnceLock::new();
        let re = LOOSE
            .get_or_init(|| {
                Regex::new(
                    r"^(?P<major>\d+)(?:\.(?P<minor>\d+))?(?:\.(?P<patch>\d+))?(?:\.\d+)?(?:-(?P<tag>[^+]*))?(?:\+(?P<build>.*))?$",
                )
                .ok()
            })
            .as_ref()?;

        let captures = re.captures(text)?;
        let number = |name: &str| -> Option<u64> {
            match captures.name(name) {
                Some(m) => m.as_str().parse().ok(),
                None => Some(0),
            }
        };

        Some(SemanticVersion {
            major: number("major")?,
            minor: number("minor")?,
            patch: number("patch")?,
            pre_release_tag: captures
                .name("tag")
                .map(|m| PreReleaseTag::parse(m.as_str()))
                .unwrap_or_default(),
            build_metadata: captures
                .name("build")
                .map(|m| BuildMetadata::parse(m.as_str()))
                .unwrap_or_default(),
        })
    }

    /// Whether this version carries a pre-release tag
    pub fn is_pre_release(&self) -> bool {
        self.pre_release_tag.has_tag()
    }

    /// Whether a tag with this version may serve a branch using `label`
    ///
    /// Release versions match every label; pre-releases need the same name.
    pub fn is_match_for_branch_specific_label(&self, label: Option<&str>) -> bool {
        match label {
            None => true,
            Some(label) => !self.is_pre_release() || self.pre_release_tag.name == label,
        }
    }

    /// Build the next version
    ///
    /// - pre-release with the same label: bump the pre-release number only
    /// - pre-release with another label: keep major.minor.patch, restart at `label.1`
    /// - release: increment `field`, then start `label.1` when a label is given
    pub fn increment(&self, field: VersionField, label: Option<&str>) -> Self {
        let label = label.unwrap_or("");
        let mut next = self.clone();

        if self.is_pre_release() {
            next.pre_release_tag = if self.pre_release_tag.name == label {
                self.pre_release_tag.increment_number()
            } else if label.is_empty() {
                PreReleaseTag::default()
            } else {
                PreReleaseTag::new(label, Some(1), false)
            };
            return next;
        }

        match field {
            VersionField::None => {}
            VersionField::Patch => next.patch = next.patch.saturating_add(1),
            VersionField::Minor => {
                next.minor = next.minor.saturating_add(1);
                next.patch = 0;
            }
            VersionField::Major => {
                next.major = next.major.saturating_add(1);
                next.minor = 0;
                next.patch = 0;
            }
        }

        next.pre_release_tag = if label.is_empty() {
            PreReleaseTag::default()
        } else {
            PreReleaseTag::new(label, Some(1), false)
        };
        next
    }

    /// `major.minor.patch`
    pub fn major_minor_patch(&self) -> String {
        format!("{}.{}.{}", self.major, self.minor, self.patch)
    }

    /// `major.minor.patch[-tag]`
    pub fn sem_ver(&self) -> String {
        if self.is_pre_release() {
            format!("{}-{}", self.major_minor_patch(), self.pre_release_tag)
        } else {
            self.major_minor_patch()
        }
    }

    /// `sem_ver[+commits_since_tag]`
    pub fn full_sem_ver(&self) -> String {
        let metadata = self.build_metadata.short();
        if metadata.is_empty() {
            self.sem_ver()
        } else {
            format!("{}+{}", self.sem_ver(), metadata)
        }
    }
}

impl PartialEq for SemanticVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SemanticVersion {}

impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then_with(|| match (self.is_pre_release(), other.is_pre_release()) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                (false, false) => Ordering::Equal,
                (true, true) => self.pre_release_tag.cmp_precedence(&other.pre_release_tag),
            })
    }
}

impl Hash for SemanticVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.major.hash(state);
        self.minor.hash(state);
        self.patch.hash(state);
        if self.is_pre_release() {
            self.pre_release_tag.name.hash(state);
            self.pre_release_tag.number.hash(state);
        }
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sem_ver())
    }
}
