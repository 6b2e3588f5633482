//! Mock collaborators for orchestrator tests
//!
//! All mocks can share one call log so tests can assert on the order in
//! which the orchestrator touched them.

use crate::auth::{Authenticator, CredentialPrompt, Credentials, Endpoint, Session};
use crate::error::CiError;
use crate::provider::CiProvider;
use crate::types::{BuildDetail, BuildListing, BuildSummary, CommitSummary};
use crate::visibility::{Visibility, VisibilityProbe};
use git_travis_core::RepositoryRef;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Shared, ordered record of mock calls
pub type CallLog = Arc<Mutex<Vec<MockCall>>>;

/// Create an empty call log
pub fn new_call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Record of method calls for test assertions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Probe(String),
    Prompt,
    Authenticate(Credentials),
    ListBuilds { repo: String, authenticated: bool },
    GetBuild(u64),
}

fn log_call(log: &CallLog, call: MockCall) {
    log.lock().unwrap().push(call);
}

/// Visibility probe with a canned answer. `None` answers like a rate-limited
/// GitHub API.
#[derive(Debug, Clone)]
pub struct MockVisibilityProbe {
    pub visibility: Option<Visibility>,
    pub call_log: CallLog,
}

impl MockVisibilityProbe {
    pub fn new(visibility: Option<Visibility>, call_log: CallLog) -> Self {
        Self { visibility, call_log }
    }
}

impl VisibilityProbe for MockVisibilityProbe {
    async fn probe(&self, repo: &RepositoryRef) -> Result<Visibility, CiError> {
        log_call(&self.call_log, MockCall::Probe(repo.to_string()));
        self.visibility.ok_or_else(|| CiError::UnknownVisibility {
            repo: repo.to_string(),
            status: Some(403),
            message: "rate limited".to_string(),
        })
    }
}

/// Authenticator issuing a fixed Pro session. `None` rejects every credential.
#[derive(Debug, Clone)]
pub struct MockAuthenticator {
    pub access_token: Option<String>,
    pub call_log: CallLog,
}

impl MockAuthenticator {
    pub fn new(access_token: Option<&str>, call_log: CallLog) -> Self {
        Self {
            access_token: access_token.map(str::to_string),
            call_log,
        }
    }
}

impl Authenticator for MockAuthenticator {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session, CiError> {
        log_call(&self.call_log, MockCall::Authenticate(credentials.clone()));
        match &self.access_token {
            Some(token) => Ok(Session::authenticated(Endpoint::Pro, token.clone())),
            None => Err(CiError::auth("bad credentials")),
        }
    }
}

/// Prompt answering with fixed credentials. `None` behaves like a closed stdin.
#[derive(Debug, Clone)]
pub struct MockPrompt {
    pub answer: Option<(String, String)>,
    pub call_log: CallLog,
}

impl MockPrompt {
    pub fn new(answer: Option<(&str, &str)>, call_log: CallLog) -> Self {
        Self {
            answer: answer.map(|(u, p)| (u.to_string(), p.to_string())),
            call_log,
        }
    }
}

impl CredentialPrompt for MockPrompt {
    fn prompt(&self) -> Result<(String, String), CiError> {
        log_call(&self.call_log, MockCall::Prompt);
        self.answer.clone().ok_or_else(|| CiError::auth("no input"))
    }
}

/// CI provider returning canned data.
///
/// A missing `listing` fails `list_builds` with [`CiError::Listing`]; a build
/// id absent from `details` fails `get_build` with [`CiError::DetailFetch`].
#[derive(Debug, Clone)]
pub struct MockCiProvider {
    pub listing: Option<BuildListing>,
    pub details: HashMap<u64, BuildDetail>,
    pub call_log: CallLog,
}

impl MockCiProvider {
    pub fn new(call_log: CallLog) -> Self {
        Self {
            listing: None,
            details: HashMap::new(),
            call_log,
        }
    }

    pub fn with_listing(mut self, commits: Vec<CommitSummary>, builds: Vec<BuildSummary>) -> Self {
        self.listing = Some(BuildListing { commits, builds });
        self
    }

    pub fn with_detail(mut self, build_id: u64, detail: BuildDetail) -> Self {
        self.details.insert(build_id, detail);
        self
    }

    /// Get a copy of the call log for assertions
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }
}

impl CiProvider for MockCiProvider {
    async fn list_builds(&self, session: &Session, repo: &RepositoryRef) -> Result<BuildListing, CiError> {
        log_call(
            &self.call_log,
            MockCall::ListBuilds {
                repo: repo.to_string(),
                authenticated: session.is_authenticated(),
            },
        );
        self.listing.clone().ok_or_else(|| CiError::Listing {
            repo: repo.to_string(),
            message: "Travis answered 500 Internal Server Error".to_string(),
            source: None,
        })
    }

    async fn get_build(&self, _session: &Session, repo: &RepositoryRef, build_id: u64) -> Result<BuildDetail, CiError> {
        log_call(&self.call_log, MockCall::GetBuild(build_id));
        self.details.get(&build_id).cloned().ok_or_else(|| CiError::DetailFetch {
            repo: repo.to_string(),
            build_id,
            message: "Travis answered 404 Not Found".to_string(),
        })
    }

    fn provider_name(&self) -> &str {
        "MockCiProvider"
    }
}

/// Helper function to create a test commit
pub fn create_test_commit(id: u64, branch: &str) -> CommitSummary {
    CommitSummary {
        id,
        branch: branch.to_string(),
        sha: format!("{id:040x}"),
    }
}

/// Helper function to create a test build pointing at `commit_id`
pub fn create_test_build(id: u64, commit_id: u64, result: Option<i64>) -> BuildSummary {
    BuildSummary {
        id,
        commit_id: Some(commit_id),
        branch: None,
        result,
        state: None,
    }
}

/// Helper function to create a test build detail without jobs
pub fn create_test_detail(sha: &str, branch: &str, state: &str) -> BuildDetail {
    BuildDetail {
        message: format!("Commit on {branch}"),
        sha: sha.to_string(),
        compare_url: None,
        branch: branch.to_string(),
        author_name: "Test Author".to_string(),
        author_email: "author@example.com".to_string(),
        state: state.to_string(),
        jobs: Vec::new(),
    }
}
