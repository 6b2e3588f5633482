//! Errors raised while reading the local git checkout

use thiserror::Error;

/// Git collaborator and remote parsing errors.
///
/// Both variants that can occur before any network call (`Parse`,
/// `ToolNotFound`) are fatal for the CLI.
#[derive(Debug, Error)]
pub enum GitError {
    /// Remote listing had no usable `origin` URL
    #[error("failed to parse git remote: {message}")]
    Parse { message: String },

    /// The git executable could not be located
    #[error("git executable '{program}' not found")]
    ToolNotFound {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// git ran but exited unsuccessfully
    #[error("git {command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    /// Any other I/O failure while running git
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
