use thiserror::Error;

/// Unified error type for git-release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Failed parsing: \"{0}\"")]
    Parse(String),

    #[error("Unsupported commit type '{0}'")]
    UnsupportedType(String),

    #[error("Unsupported scope '{scope}' for commit type '{commit_type}'")]
    UnsupportedScope { commit_type: String, scope: String },

    #[error("\"{0}\" version number invalid")]
    InvalidVersion(String),

    #[error("Working tree has uncommitted changes")]
    DirtyWorkingTree,

    #[error("Aborting due to empty commit message")]
    EmptyMessage,

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Branch error: {0}")]
    Branch(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Editor error: {0}")]
    Editor(String),

    #[error("Empty program in command")]
    EmptyProgram,

    #[error("Missing quote {quote}: {command}")]
    MissingQuote { command: String, quote: char },

    #[error("Invalid escape sequence '\\{character}': {command}")]
    InvalidEscapeSequence { command: String, character: char },

    #[error("Unterminated escape sequence: {0}")]
    UnterminatedEscapeSequence(String),

    #[error("'{0}' was terminated by a signal")]
    Terminated(String),

    #[error("Hosting operation failed: {0}")]
    Hosting(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a parse error carrying the offending message
    pub fn parse(msg: impl Into<String>) -> Self {
        ReleaseError::Parse(msg.into())
    }

    /// Create an invalid version error for the given version string
    pub fn invalid_version(version: impl Into<String>) -> Self {
        ReleaseError::InvalidVersion(version.into())
    }

    /// Create a branch error with context
    pub fn branch(msg: impl Into<String>) -> Self {
        ReleaseError::Branch(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a manifest error with context
    pub fn manifest(msg: impl Into<String>) -> Self {
        ReleaseError::Manifest(msg.into())
    }

    /// Create an editor error with context
    pub fn editor(msg: impl Into<String>) -> Self {
        ReleaseError::Editor(msg.into())
    }

    /// Create a hosting error with context
    pub fn hosting(msg: impl Into<String>) -> Self {
        ReleaseError::Hosting(msg.into())
    }
}
