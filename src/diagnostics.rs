use std::fmt;
use tracing::{debug, info, warn};

/// Non-fatal conditions met while resolving a version.
/// They never stop the calculation; they are logged and, where useful,
/// shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// Branch inherits its increment but no source branch was found
    OrphanedBranch { branch: String, skipped: bool },
    /// Candidate dropped by a version filter
    CandidateExcluded { candidate: String, reason: String },
    /// Tag exists but cannot be parsed as a semantic version
    UnparsableTag { tag: String },
    /// `source-branches` lists a key with no branch rule
    UnknownSourceBranch { branch: String, key: String },
    /// No strategy produced a surviving candidate
    NoCandidates { branch: String },
}

impl Diagnostic {
    /// Emit through `tracing` at the level matching its severity
    pub fn log(&self) {
        match self {
            Diagnostic::OrphanedBranch { .. } | Diagnostic::NoCandidates { .. } => info!("{}", self),
            Diagnostic::UnknownSourceBranch { .. } => warn!("{}", self),
            Diagnostic::CandidateExcluded { .. } | Diagnostic::UnparsableTag { .. } => {
                debug!("{}", self)
            }
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::OrphanedBranch { branch, skipped } => write!(
                f,
                "An orphaned branch '{}' has been detected and will be skipped={}",
                branch, skipped
            ),
            Diagnostic::CandidateExcluded { candidate, reason } => {
                write!(f, "Candidate {} excluded: {}", candidate, reason)
            }
            Diagnostic::UnparsableTag { tag } => {
                write!(f, "Tag '{}' is not a semantic version", tag)
            }
            Diagnostic::UnknownSourceBranch { branch, key } => write!(
                f,
                "Source branch '{}' of '{}' names no branch rule",
                key, branch
            ),
            Diagnostic::NoCandidates { branch } => write!(
                f,
                "No base version found for '{}', using the fallback version",
                branch
            ),
        }
    }
}
