//! Task error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by developer tasks.
#[derive(Debug, Error)]
pub enum XtaskError {
    /// Git2 error.
    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    /// No repository at or above the path.
    #[error("not inside a git repository: {0}")]
    NoRepository(PathBuf),

    /// The external tool could not be started.
    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// Malformed line in an env file.
    #[error("{}:{line}: {message}", .path.display())]
    EnvFile {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for developer tasks.
pub type XtaskResult<T> = Result<T, XtaskError>;
