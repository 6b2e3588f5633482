//! Travis CI provider over the v2 REST API

use crate::auth::{Authenticator, Credentials, Endpoint, Session};
use crate::error::CiError;
use crate::http;
use crate::provider::CiProvider;
use crate::types::{BuildDetail, BuildListing, DetailResponse, ListingResponse};
use git_travis_core::RepositoryRef;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

/// Media type selecting the v2 API
const TRAVIS_ACCEPT: &str = "application/vnd.travis-ci.2+json";

/// GitHub scopes Travis needs to identify a user
const GITHUB_SCOPES: &[&str] = &[
    "read:org",
    "user:email",
    "repo_deployment",
    "repo:status",
    "write:repo_hook",
    "repo",
];

/// Base URLs a [`TravisClient`] talks to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TravisEndpoints {
    /// Public deployment (travis-ci.org)
    pub org: String,
    /// Private deployment (travis-ci.com)
    pub pro: String,
    /// GitHub API, for turning a password into a token
    pub github: String,
}

/// Travis CI provider and authenticator
#[derive(Debug, Clone)]
pub struct TravisClient {
    client: Client,
    endpoints: TravisEndpoints,
}

impl TravisClient {
    pub fn new(client: Client, endpoints: TravisEndpoints) -> Self {
        Self { client, endpoints }
    }

    fn base(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::Org => &self.endpoints.org,
            Endpoint::Pro => &self.endpoints.pro,
        }
    }

    /// GET against the session's deployment, authorized when the session is
    fn get(&self, session: &Session, path: &str) -> RequestBuilder {
        let url = http::join(self.base(session.endpoint()), path);
        debug!("GET {url}");
        let request = self.client.get(url).header(ACCEPT, TRAVIS_ACCEPT);
        match session.access_token() {
            Some(token) => request.header(AUTHORIZATION, format!("token \"{token}\"")),
            None => request,
        }
    }

    /// Exchange a GitHub token for a Travis access token
    async fn exchange_github_token(&self, github_token: &str) -> Result<Session, CiError> {
        let url = http::join(self.base(Endpoint::Pro), "/auth/github");
        debug!("POST {url}");

        let response = self
            .client
            .post(url)
            .header(ACCEPT, TRAVIS_ACCEPT)
            .json(&json!({ "github_token": github_token }))
            .send()
            .await
            .map_err(|e| CiError::Auth {
                message: format!("token exchange failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CiError::auth(format!("Travis rejected the GitHub token ({status})")));
        }

        let body: AccessTokenResponse = response.json().await.map_err(|e| CiError::Auth {
            message: format!("invalid token exchange response: {e}"),
            source: Some(Box::new(e)),
        })?;

        Ok(Session::authenticated(Endpoint::Pro, body.access_token))
    }

    /// Create a temporary GitHub authorization from a username and password
    async fn create_github_authorization(
        &self,
        username: &str,
        password: &str,
    ) -> Result<GitHubAuthorization, CiError> {
        let url = http::join(&self.endpoints.github, "/authorizations");
        debug!("POST {url}");

        let response = self
            .client
            .post(url)
            .basic_auth(username, Some(password))
            .json(&json!({
                "scopes": GITHUB_SCOPES,
                "note": "temporary token to identify with the Travis API",
            }))
            .send()
            .await
            .map_err(|e| CiError::Auth {
                message: format!("GitHub login failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CiError::auth(format!("GitHub rejected the credentials ({status})")));
        }

        response.json().await.map_err(|e| CiError::Auth {
            message: format!("invalid GitHub authorization response: {e}"),
            source: Some(Box::new(e)),
        })
    }

    /// Revoke a temporary authorization. Failure only leaves a stale token
    /// behind, so it is logged and ignored.
    async fn delete_github_authorization(&self, username: &str, password: &str, id: u64) {
        let url = http::join(&self.endpoints.github, &format!("/authorizations/{id}"));
        debug!("DELETE {url}");

        match self.client.delete(url).basic_auth(username, Some(password)).send().await {
            Ok(response) if response.status().is_success() => {}
            Ok(response) => warn!("Failed to revoke GitHub authorization #{id}: {}", response.status()),
            Err(e) => warn!("Failed to revoke GitHub authorization #{id}: {e}"),
        }
    }
}

impl Authenticator for TravisClient {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session, CiError> {
        match credentials {
            Credentials::Token(token) => self.exchange_github_token(token).await,
            Credentials::Password { username, password } => {
                let authorization = self.create_github_authorization(username, password).await?;
                let session = self.exchange_github_token(&authorization.token).await;
                if let Some(id) = authorization.id {
                    self.delete_github_authorization(username, password, id).await;
                }
                session
            }
        }
    }
}

impl CiProvider for TravisClient {
    async fn list_builds(&self, session: &Session, repo: &RepositoryRef) -> Result<BuildListing, CiError> {
        let path = format!("/repos/{}/{}/builds", repo.owner(), repo.name());
        let listing_error = |message: String, source: Option<Box<dyn std::error::Error + Send + Sync>>| {
            CiError::Listing {
                repo: repo.to_string(),
                message,
                source,
            }
        };

        let response = self
            .get(session, &path)
            .send()
            .await
            .map_err(|e| listing_error(format!("request failed: {e}"), Some(Box::new(e))))?;

        let status = response.status();
        if !status.is_success() {
            return Err(listing_error(format!("Travis answered {status}"), None));
        }

        let listing: ListingResponse = response
            .json()
            .await
            .map_err(|e| listing_error(format!("malformed build listing: {e}"), Some(Box::new(e))))?;

        Ok(listing.into())
    }

    async fn get_build(
        &self,
        session: &Session,
        repo: &RepositoryRef,
        build_id: u64,
    ) -> Result<BuildDetail, CiError> {
        let path = format!("/repos/{}/{}/builds/{build_id}", repo.owner(), repo.name());
        let detail_error = |message: String| CiError::DetailFetch {
            repo: repo.to_string(),
            build_id,
            message,
        };

        let response = self
            .get(session, &path)
            .send()
            .await
            .map_err(|e| detail_error(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(detail_error(format!("Travis answered {status}")));
        }

        let detail: DetailResponse = response
            .json()
            .await
            .map_err(|e| detail_error(format!("malformed build detail: {e}")))?;

        Ok(detail.normalize())
    }

    fn provider_name(&self) -> &str {
        "Travis CI"
    }
}

/// `POST /auth/github` response
#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: String,
}

/// `POST /authorizations` response
#[derive(Debug, Deserialize)]
struct GitHubAuthorization {
    #[serde(default)]
    id: Option<u64>,
    token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TravisClient {
        TravisClient::new(
            http::new_client("git-travis-test").unwrap(),
            TravisEndpoints {
                org: "https://org.example".to_string(),
                pro: "https://pro.example/".to_string(),
                github: "https://gh.example".to_string(),
            },
        )
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(client().provider_name(), "Travis CI");
    }

    #[test]
    fn test_session_selects_base() {
        let c = client();
        assert_eq!(c.base(Session::anonymous().endpoint()), "https://org.example");
        assert_eq!(c.base(Session::authenticated(Endpoint::Pro, "t").endpoint()), "https://pro.example/");
    }

    #[test]
    fn test_authorized_request_headers() {
        let c = client();
        let request = c
            .get(&Session::authenticated(Endpoint::Pro, "abc"), "/repos/a/b/builds")
            .build()
            .unwrap();
        assert_eq!(request.url().as_str(), "https://pro.example/repos/a/b/builds");
        assert_eq!(request.headers()[AUTHORIZATION], "token \"abc\"");
        assert_eq!(request.headers()[ACCEPT], TRAVIS_ACCEPT);

        let anonymous = c.get(&Session::anonymous(), "/repos/a/b/builds").build().unwrap();
        assert!(anonymous.headers().get(AUTHORIZATION).is_none());
    }
}
