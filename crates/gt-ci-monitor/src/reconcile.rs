//! Branch-to-build reconciliation
//!
//! Travis lists commits and builds as two independently ordered collections.
//! A build only points at its commit through `commit_id`, and only the commit
//! knows its branch, so finding "the latest build of branch X" always goes
//! through the commit list first.

use crate::error::CiError;
use crate::types::{BuildSummary, CommitSummary, ReconciliationResult};

/// Advisory attached when no build of the requested branch was listed
pub fn fallback_advisory(branch: &str) -> String {
    format!("no recent builds on {branch} showing latest")
}

/// Select the build that best represents `branch`.
///
/// Policy, first match wins:
/// 1. the first commit on `branch`, then the first build pointing at it;
/// 2. otherwise `builds[0]`, with an advisory;
/// 3. `builds` empty: [`CiError::NotFound`].
pub fn reconcile(
    branch: &str,
    commits: &[CommitSummary],
    builds: &[BuildSummary],
) -> Result<ReconciliationResult, CiError> {
    let matched = commits.iter().find(|commit| commit.branch == branch).and_then(|commit| {
        builds
            .iter()
            .find(|build| build.commit_id == Some(commit.id))
            .map(|build| (commit, build))
    });

    if let Some((commit, build)) = matched {
        return Ok(ReconciliationResult {
            selected_build: build.clone(),
            matched_commit: Some(commit.clone()),
            advisory: None,
        });
    }

    let latest = builds.first().ok_or_else(|| CiError::NotFound {
        repo: None,
        branch: branch.to_string(),
    })?;

    Ok(ReconciliationResult {
        selected_build: latest.clone(),
        matched_commit: None,
        advisory: Some(fallback_advisory(branch)),
    })
}
