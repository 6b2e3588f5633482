//! Travis CI build status for a GitHub repository
//!
//! A status run walks a fixed sequence: probe GitHub for the repository's
//! visibility, authenticate against Travis when it is private, list recent
//! builds, reconcile them to the requested branch and fetch the selected
//! build's detail. [`Orchestrator`] drives the sequence over injected
//! collaborators; [`TravisClient`] and [`GitHubVisibilityProbe`] are the
//! production implementations. [`format`] turns the result into lines.

pub mod auth;
pub mod error;
pub mod format;
pub mod http;
pub mod orchestrator;
pub mod provider;
pub mod reconcile;
pub mod travis;
pub mod types;
pub mod visibility;

#[cfg(any(test, feature = "test-support"))]
pub mod mock_provider;

pub use auth::{obtain_credentials, Authenticator, CredentialPrompt, Credentials, Endpoint, Session};
pub use error::CiError;
pub use format::{format_failure, format_report, DisplayLine, Glyphs};
pub use orchestrator::{Orchestrator, Stage, StatusReport};
pub use provider::CiProvider;
pub use reconcile::reconcile;
pub use travis::{TravisClient, TravisEndpoints};
pub use types::{
    BuildDetail, BuildListing, BuildOutcome, BuildSummary, CommitSummary, JobSummary,
    ReconciliationResult,
};
pub use visibility::{GitHubVisibilityProbe, Visibility, VisibilityProbe};
