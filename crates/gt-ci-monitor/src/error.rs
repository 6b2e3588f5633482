//! CI-side error taxonomy

use thiserror::Error;

/// Errors raised while talking to GitHub and Travis.
///
/// Every variant except `DetailFetch` aborts the run. `DetailFetch` is only
/// ever recorded inside a [`crate::StatusReport`].
#[derive(Debug, Error)]
pub enum CiError {
    /// Visibility probe answered neither 200 nor 404
    #[error("unable to determine visibility of {repo}: {message}")]
    UnknownVisibility {
        repo: String,
        status: Option<u16>,
        message: String,
    },

    /// Credentials could not be obtained or were rejected
    #[error("authentication failed: {message}")]
    Auth {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Build listing missing, malformed or unreachable
    #[error("failed to fetch info for {repo}: {message}")]
    Listing {
        repo: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// No build to report, not even as a fallback.
    ///
    /// The reconciler only knows the branch; the orchestrator attaches the
    /// repository with [`CiError::with_repo`].
    #[error("Unable to locate a build for {}", build_target(.repo, .branch))]
    NotFound { repo: Option<String>, branch: String },

    /// Build detail could not be fetched after a build was selected
    #[error("failed to fetch build #{build_id} for {repo}: {message}")]
    DetailFetch {
        repo: String,
        build_id: u64,
        message: String,
    },

    /// HTTP transport failure outside of a more specific step
    #[error("transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl CiError {
    /// Transport error carrying its source
    pub fn transport(message: impl Into<String>, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        CiError::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Name the repository a [`CiError::NotFound`] refers to; other errors
    /// pass through unchanged.
    pub fn with_repo(self, repo: &impl std::fmt::Display) -> Self {
        match self {
            CiError::NotFound { branch, .. } => CiError::NotFound {
                repo: Some(repo.to_string()),
                branch,
            },
            other => other,
        }
    }

    /// Authentication error without an underlying source
    pub fn auth(message: impl Into<String>) -> Self {
        CiError::Auth {
            message: message.into(),
            source: None,
        }
    }
}

fn build_target(repo: &Option<String>, branch: &str) -> String {
    match repo {
        Some(repo) => format!("{repo}:{branch}"),
        None => format!("branch {branch}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_names_repo_once_attached() {
        let err = CiError::NotFound {
            repo: None,
            branch: "main".to_string(),
        };
        assert_eq!(err.to_string(), "Unable to locate a build for branch main");

        let err = err.with_repo(&"alice/demo");
        assert_eq!(err.to_string(), "Unable to locate a build for alice/demo:main");
    }

    #[test]
    fn test_with_repo_leaves_other_errors() {
        let err = CiError::auth("denied").with_repo(&"alice/demo");
        assert!(matches!(err, CiError::Auth { .. }));
    }
}
