use git2::Oid;
use std::fmt;

const REMOTE_PREFIXES: [&str; 3] = ["refs/remotes/origin/", "origin/", "refs/heads/"];

/// A git branch as seen by the version engine
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Branch {
    /// Friendly name (e.g. "develop", "origin/feature/x")
    pub name: String,
    /// Whether this is a remote-tracking branch
    pub is_remote: bool,
    /// Commit at the tip of the branch, if any
    pub tip: Option<Oid>,
}

impl Branch {
    /// Create a local branch
    pub fn new(name: impl Into<String>, tip: Option<Oid>) -> Self {
        Branch {
            name: name.into(),
            is_remote: false,
            tip,
        }
    }

    /// Create a remote-tracking branch
    pub fn remote(name: impl Into<String>, tip: Option<Oid>) -> Self {
        Branch {
            name: name.into(),
            is_remote: true,
            tip,
        }
    }

    /// Branch name with any `origin/` style prefix removed
    pub fn name_without_origin(&self) -> &str {
        strip_origin(&self.name)
    }

    /// Whether two branches name the same line of work (local vs origin)
    pub fn is_same_branch(&self, other: &Branch) -> bool {
        self.name_without_origin() == other.name_without_origin()
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Strip `origin/`, `refs/remotes/origin/` and `refs/heads/` prefixes
pub fn strip_origin(name: &str) -> &str {
    REMOTE_PREFIXES
        .iter()
        .find_map(|prefix| name.strip_prefix(prefix))
        .unwrap_or(name)
}

/// Replace every character that is not ASCII alphanumeric with `-`
pub fn escape_branch_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}
