//! Provider trait for CI build queries

use crate::auth::Session;
use crate::error::CiError;
use crate::types::{BuildDetail, BuildListing};
use git_travis_core::RepositoryRef;
use std::future::Future;

/// Async trait for CI build queries.
///
/// Uses RPITIT (Return Position Impl Trait in Traits) with explicit Send
/// bounds. Every call takes the run's [`Session`] explicitly.
pub trait CiProvider: Send + Sync + std::fmt::Debug {
    /// Recent commits and builds of a repository, normalized
    fn list_builds(
        &self,
        session: &Session,
        repo: &RepositoryRef,
    ) -> impl Future<Output = Result<BuildListing, CiError>> + Send;

    /// Full detail of one build, including its jobs
    fn get_build(
        &self,
        session: &Session,
        repo: &RepositoryRef,
        build_id: u64,
    ) -> impl Future<Output = Result<BuildDetail, CiError>> + Send;

    /// Provider name for logging/display
    fn provider_name(&self) -> &str;
}
