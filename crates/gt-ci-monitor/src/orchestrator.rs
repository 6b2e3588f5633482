//! One status run: probe, authenticate, list, reconcile, fetch detail
//!
//! The run is a linear state machine. Each step either advances to the next
//! [`Stage`] or ends the run with a [`CiError`]; the only non-fatal failure
//! is the final detail fetch, which is recorded in the [`StatusReport`].

use crate::auth::{obtain_credentials, Authenticator, CredentialPrompt, Session};
use crate::error::CiError;
use crate::provider::CiProvider;
use crate::reconcile::reconcile;
use crate::types::{BuildDetail, BuildSummary, CommitSummary};
use crate::visibility::{Visibility, VisibilityProbe};
use git_travis_core::RepositoryRef;
use std::fmt;
use tracing::{debug, info, warn};

/// Where a run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    ProbingVisibility,
    /// Public repository, listing anonymously
    Public,
    /// Private repository, waiting for credentials to be accepted
    AwaitingAuth,
    Authenticated,
    ListingBuilds,
    Reconciling,
    FetchingDetail,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Init => "init",
            Stage::ProbingVisibility => "probing-visibility",
            Stage::Public => "public",
            Stage::AwaitingAuth => "awaiting-auth",
            Stage::Authenticated => "authenticated",
            Stage::ListingBuilds => "listing-builds",
            Stage::Reconciling => "reconciling",
            Stage::FetchingDetail => "fetching-detail",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Everything the report printer needs from a finished run
#[derive(Debug)]
pub struct StatusReport {
    pub repo: RepositoryRef,
    pub branch: String,
    /// Set when the build shown is not from `branch`
    pub advisory: Option<String>,
    pub build: BuildSummary,
    pub matched_commit: Option<CommitSummary>,
    /// `Err` only ever holds [`CiError::DetailFetch`]
    pub detail: Result<BuildDetail, CiError>,
}

/// Drives a status run against injected collaborators
pub struct Orchestrator<'a, V, A, C> {
    probe: V,
    authenticator: A,
    provider: C,
    token: Option<String>,
    prompt: &'a dyn CredentialPrompt,
}

impl<'a, V, A, C> Orchestrator<'a, V, A, C>
where
    V: VisibilityProbe,
    A: Authenticator,
    C: CiProvider,
{
    pub fn new(probe: V, authenticator: A, provider: C, prompt: &'a dyn CredentialPrompt) -> Self {
        Self {
            probe,
            authenticator,
            provider,
            token: None,
            prompt,
        }
    }

    /// Pre-issued GitHub token; private repositories skip the prompt when set
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub async fn run(&self, repo: &RepositoryRef, branch: &str) -> Result<StatusReport, CiError> {
        debug!(%repo, branch, "starting status run");
        let mut stage = Stage::Init;
        match self.run_stages(repo, branch, &mut stage).await {
            Ok(report) => {
                advance(&mut stage, Stage::Done);
                Ok(report)
            }
            Err(e) => {
                debug!(error = %e, "run failed in stage {stage}");
                advance(&mut stage, Stage::Failed);
                Err(e)
            }
        }
    }

    async fn run_stages(
        &self,
        repo: &RepositoryRef,
        branch: &str,
        stage: &mut Stage,
    ) -> Result<StatusReport, CiError> {
        advance(stage, Stage::ProbingVisibility);
        let visibility = self.probe.probe(repo).await?;
        debug!(?visibility, "visibility resolved");

        let session = self.open_session(visibility, stage).await?;

        advance(stage, Stage::ListingBuilds);
        let listing = self.provider.list_builds(&session, repo).await?;
        debug!(
            commits = listing.commits.len(),
            builds = listing.builds.len(),
            provider = self.provider.provider_name(),
            "listing received"
        );

        advance(stage, Stage::Reconciling);
        let selection = reconcile(branch, &listing.commits, &listing.builds).map_err(|e| e.with_repo(repo))?;
        if let Some(advisory) = &selection.advisory {
            info!("{advisory}");
        }

        advance(stage, Stage::FetchingDetail);
        let build_id = selection.selected_build.id;
        debug!(build_id, "selected build");
        let detail = match self.provider.get_build(&session, repo, build_id).await {
            Ok(detail) => Ok(detail),
            Err(e) => {
                warn!("{e}");
                Err(match e {
                    e @ CiError::DetailFetch { .. } => e,
                    other => CiError::DetailFetch {
                        repo: repo.to_string(),
                        build_id,
                        message: other.to_string(),
                    },
                })
            }
        };

        Ok(StatusReport {
            repo: repo.clone(),
            branch: branch.to_string(),
            advisory: selection.advisory,
            build: selection.selected_build,
            matched_commit: selection.matched_commit,
            detail,
        })
    }

    async fn open_session(&self, visibility: Visibility, stage: &mut Stage) -> Result<Session, CiError> {
        match visibility {
            Visibility::Public => {
                advance(stage, Stage::Public);
                Ok(Session::anonymous())
            }
            Visibility::Private => {
                advance(stage, Stage::AwaitingAuth);
                // Blocks this task until the terminal prompt returns
                let credentials = obtain_credentials(self.token.as_deref(), self.prompt)?;
                let session = self.authenticator.authenticate(&credentials).await?;
                advance(stage, Stage::Authenticated);
                Ok(session)
            }
        }
    }
}

fn advance(stage: &mut Stage, to: Stage) {
    debug!(from = %stage, %to, "stage transition");
    *stage = to;
}
