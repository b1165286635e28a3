use thiserror::Error;

/// Unified error type for git-stamp operations
#[derive(Error, Debug)]
pub enum GitStampError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration file is not valid TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience type alias for Results in git-stamp
pub type Result<T> = std::result::Result<T, GitStampError>;

impl GitStampError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GitStampError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        GitStampError::Version(msg.into())
    }

    /// Create a repository error with context
    pub fn repository(msg: impl Into<String>) -> Self {
        GitStampError::Repository(msg.into())
    }

    /// Create a template/format error with context
    pub fn format(msg: impl Into<String>) -> Self {
        GitStampError::Format(msg.into())
    }

    /// Create an error for a violated caller contract
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        GitStampError::InvalidArgument(msg.into())
    }
}
