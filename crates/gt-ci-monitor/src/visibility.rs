//! Repository visibility probe against the GitHub API

use crate::error::CiError;
use crate::http;
use git_travis_core::RepositoryRef;
use reqwest::{Client, StatusCode};
use std::future::Future;
use tracing::debug;

/// Whether anonymous users can read a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

/// Decides which Travis deployment, and whether credentials, a run needs
pub trait VisibilityProbe: Send + Sync {
    fn probe(&self, repo: &RepositoryRef) -> impl Future<Output = Result<Visibility, CiError>> + Send;
}

/// `HEAD /repos/{owner}/{repo}` without credentials.
///
/// 200 means public, 404 means private (or missing; GitHub does not say
/// which to anonymous callers). Anything else, rate limiting included, is
/// [`CiError::UnknownVisibility`].
#[derive(Debug, Clone)]
pub struct GitHubVisibilityProbe {
    client: Client,
    api_base: String,
}

impl GitHubVisibilityProbe {
    pub fn new(client: Client, api_base: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into(),
        }
    }
}

impl VisibilityProbe for GitHubVisibilityProbe {
    async fn probe(&self, repo: &RepositoryRef) -> Result<Visibility, CiError> {
        let url = http::join(&self.api_base, &format!("/repos/{}/{}", repo.owner(), repo.name()));
        debug!("probing visibility: HEAD {url}");

        let response = self
            .client
            .head(&url)
            .send()
            .await
            .map_err(|e| CiError::UnknownVisibility {
                repo: repo.to_string(),
                status: None,
                message: e.to_string(),
            })?;

        classify(repo, response.status())
    }
}

fn classify(repo: &RepositoryRef, status: StatusCode) -> Result<Visibility, CiError> {
    match status {
        StatusCode::OK => Ok(Visibility::Public),
        StatusCode::NOT_FOUND => Ok(Visibility::Private),
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => Err(CiError::UnknownVisibility {
            repo: repo.to_string(),
            status: Some(status.as_u16()),
            message: format!("GitHub API refused the request ({status}); the rate limit may be exhausted"),
        }),
        other => Err(CiError::UnknownVisibility {
            repo: repo.to_string(),
            status: Some(other.as_u16()),
            message: format!("unexpected status {other}"),
        }),
    }
}
