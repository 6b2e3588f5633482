//! Credentials and CI sessions
//!
//! A [`Session`] is an explicit value: the orchestrator creates it (anonymous
//! for public repositories, via an [`Authenticator`] for private ones) and
//! passes it by reference to every provider call.

use crate::error::CiError;
use std::fmt;
use std::future::Future;
use tracing::debug;

/// Which Travis deployment a session talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Public repositories (travis-ci.org)
    Org,
    /// Private repositories (travis-ci.com)
    Pro,
}

/// Handle threaded through CI provider calls
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    endpoint: Endpoint,
    access_token: Option<String>,
}

impl Session {
    /// Unauthenticated session against the public endpoint
    pub fn anonymous() -> Self {
        Self {
            endpoint: Endpoint::Org,
            access_token: None,
        }
    }

    /// Authenticated session
    pub fn authenticated(endpoint: Endpoint, access_token: impl Into<String>) -> Self {
        Self {
            endpoint,
            access_token: Some(access_token.into()),
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }
}

// Keep tokens out of logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("endpoint", &self.endpoint)
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

/// What the user proves their identity with
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Pre-issued GitHub token
    Token(String),
    /// GitHub username and password, entered interactively
    Password { username: String, password: String },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Token(_) => f.write_str("Token(..)"),
            Credentials::Password { username, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .finish_non_exhaustive(),
        }
    }
}

/// Interactive credential entry
///
/// Implementations may block the calling thread on terminal input. The
/// orchestrator calls [`prompt`](Self::prompt) inline, so no request is in
/// flight while it waits.
pub trait CredentialPrompt: Send + Sync {
    /// Ask for a username and a hidden password. Blocks until answered.
    fn prompt(&self) -> Result<(String, String), CiError>;
}

/// Exchanges credentials for a [`Session`]
pub trait Authenticator: Send + Sync {
    fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Session, CiError>> + Send;
}

/// Pick credentials: the environment token when present, the prompt otherwise.
pub fn obtain_credentials(
    token: Option<&str>,
    prompt: &dyn CredentialPrompt,
) -> Result<Credentials, CiError> {
    if let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) {
        debug!("using access token from environment");
        return Ok(Credentials::Token(token.to_string()));
    }

    debug!("prompting for credentials");
    let (username, password) = prompt.prompt()?;
    if username.trim().is_empty() || password.is_empty() {
        return Err(CiError::auth("username and password are required"));
    }
    Ok(Credentials::Password {
        username: username.trim().to_string(),
        password,
    })
}
