//! CI data model and response-shape normalization
//!
//! The Travis API has answered the same questions with two different JSON
//! shapes over its lifetime. Both are accepted here, as tagged unions, and
//! normalized once into the canonical records the rest of the crate uses:
//!
//! - [`ListingResponse`] → [`BuildListing`]
//! - [`DetailResponse`] → [`BuildDetail`]

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Three-valued build/job status.
///
/// `InProgress` is what an absent result means; it is never inferred from a
/// failing check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildOutcome {
    /// Finished successfully
    Passing,
    /// Finished unsuccessfully
    Failing,
    /// Not finished yet
    InProgress,
}

impl BuildOutcome {
    /// Classify a raw Travis state string
    pub fn from_state(state: &str) -> Self {
        match state {
            "passed" => BuildOutcome::Passing,
            "failed" | "errored" | "canceled" => BuildOutcome::Failing,
            _ => BuildOutcome::InProgress,
        }
    }
}

/// A commit as listed alongside builds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSummary {
    /// Provider commit id (not the SHA)
    pub id: u64,
    /// Branch the commit was built on
    pub branch: String,
    /// Commit SHA
    pub sha: String,
}

/// A build as listed for a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSummary {
    /// Provider build id
    pub id: u64,
    /// Back-reference to [`CommitSummary::id`]
    pub commit_id: Option<u64>,
    /// Branch, when the listing reports it inline
    pub branch: Option<String>,
    /// Legacy numeric result: 0 passed, anything else failed, absent running
    pub result: Option<i64>,
    /// Textual state (`passed`, `failed`, `started`, ...)
    pub state: Option<String>,
}

impl BuildSummary {
    /// Classify this build
    pub fn outcome(&self) -> BuildOutcome {
        match (self.result, self.state.as_deref()) {
            (Some(0), _) => BuildOutcome::Passing,
            (Some(_), _) => BuildOutcome::Failing,
            (None, Some(state)) => BuildOutcome::from_state(state),
            (None, None) => BuildOutcome::InProgress,
        }
    }
}

/// One matrix entry of a build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    /// Job number, e.g. `"42.1"`
    pub number: String,
    /// Language identifier from the job config
    pub language: String,
    /// Version or value configured for that language
    pub config_value: String,
    /// Raw state string
    pub state: String,
    /// Completion timestamp; absent while the job runs
    pub finished_at: Option<String>,
}

impl JobSummary {
    /// Classify this job. Failure states win; otherwise an absent
    /// `finished_at` means still running.
    pub fn outcome(&self) -> BuildOutcome {
        if BuildOutcome::from_state(&self.state) == BuildOutcome::Failing {
            BuildOutcome::Failing
        } else if self.finished_at.is_none() {
            BuildOutcome::InProgress
        } else {
            BuildOutcome::Passing
        }
    }
}

/// Full record of a single build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildDetail {
    /// Commit message (possibly multi-line)
    pub message: String,
    /// Full commit SHA
    pub sha: String,
    /// Compare view URL
    pub compare_url: Option<String>,
    /// Branch built
    pub branch: String,
    /// Commit author name
    pub author_name: String,
    /// Commit author email
    pub author_email: String,
    /// Raw build state
    pub state: String,
    /// Matrix jobs in listing order
    pub jobs: Vec<JobSummary>,
}

impl BuildDetail {
    /// Classify the build from its state
    pub fn outcome(&self) -> BuildOutcome {
        BuildOutcome::from_state(&self.state)
    }
}

/// Normalized build listing of one repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildListing {
    /// Recent commits, in provider order
    pub commits: Vec<CommitSummary>,
    /// Recent builds, most recent first
    pub builds: Vec<BuildSummary>,
}

impl From<ListingResponse> for BuildListing {
    fn from(response: ListingResponse) -> Self {
        let (commits, builds) = response.normalize();
        Self { commits, builds }
    }
}

/// Output of the build reconciler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    /// The build chosen to represent the branch
    pub selected_build: BuildSummary,
    /// Commit that linked the branch to the build, on an exact match
    pub matched_commit: Option<CommitSummary>,
    /// Set when the selection fell back to the latest build overall
    pub advisory: Option<String>,
}

/// `GET /repos/{owner}/{name}/builds` response
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListingResponse {
    /// Current shape: parallel `commits` and `builds` collections
    Structured {
        #[serde(default)]
        commits: Vec<RawCommit>,
        builds: Vec<RawBuild>,
    },
    /// Legacy shape: a bare array of builds with inline commit fields
    LegacyArray(Vec<RawBuild>),
}

impl ListingResponse {
    /// Normalize either shape into `(commits, builds)`, both in listing order.
    ///
    /// Legacy rows carry their branch and SHA inline, so each one yields a
    /// synthetic commit keyed by the build id and the build is linked back to
    /// it. That keeps branch lookup uniform for the reconciler.
    pub fn normalize(self) -> (Vec<CommitSummary>, Vec<BuildSummary>) {
        match self {
            ListingResponse::Structured { commits, builds } => (
                commits.into_iter().map(RawCommit::into_summary).collect(),
                builds.into_iter().map(RawBuild::into_summary).collect(),
            ),
            ListingResponse::LegacyArray(rows) => rows
                .into_iter()
                .map(|row| {
                    let commit = CommitSummary {
                        id: row.id,
                        branch: row.branch.clone().unwrap_or_default(),
                        sha: row.commit.as_ref().map(value_to_string).unwrap_or_default(),
                    };
                    let mut build = row.into_summary();
                    build.commit_id = Some(commit.id);
                    (commit, build)
                })
                .unzip(),
        }
    }
}

/// Commit row of the structured listing
#[derive(Debug, Clone, Deserialize)]
pub struct RawCommit {
    id: u64,
    #[serde(default)]
    branch: Option<String>,
    #[serde(default)]
    sha: Option<String>,
}

impl RawCommit {
    fn into_summary(self) -> CommitSummary {
        CommitSummary {
            id: self.id,
            branch: self.branch.unwrap_or_default(),
            sha: self.sha.unwrap_or_default(),
        }
    }
}

/// Build row of either listing shape
#[derive(Debug, Clone, Deserialize)]
pub struct RawBuild {
    id: u64,
    #[serde(default)]
    commit_id: Option<u64>,
    #[serde(default)]
    branch: Option<String>,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    status: Option<Value>,
    #[serde(default)]
    state: Option<String>,
    /// Legacy rows carry the SHA here
    #[serde(default)]
    commit: Option<Value>,
}

impl RawBuild {
    fn into_summary(self) -> BuildSummary {
        let result = self
            .result
            .as_ref()
            .and_then(Value::as_i64)
            .or_else(|| self.status.as_ref().and_then(Value::as_i64));
        BuildSummary {
            id: self.id,
            commit_id: self.commit_id,
            branch: self.branch,
            result,
            state: self.state,
        }
    }
}

/// `GET /repos/{owner}/{name}/builds/{id}` response
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DetailResponse {
    /// Current shape: separate build, commit and jobs objects
    Structured {
        build: RawDetailBuild,
        commit: RawDetailCommit,
        #[serde(default)]
        jobs: Vec<RawJob>,
    },
    /// Legacy shape: one flat object with inline commit fields and `matrix`
    Flat(RawFlatDetail),
}

impl DetailResponse {
    /// Normalize either shape into a [`BuildDetail`].
    ///
    /// Missing fields become empty strings; nothing here fails.
    pub fn normalize(self) -> BuildDetail {
        match self {
            DetailResponse::Structured { build, commit, jobs } => BuildDetail {
                message: commit.message.unwrap_or_default(),
                sha: commit.sha.unwrap_or_default(),
                compare_url: commit.compare_url,
                branch: commit.branch.unwrap_or_default(),
                author_name: commit.author_name.unwrap_or_default(),
                author_email: commit.author_email.unwrap_or_default(),
                state: derive_state(build.state, build.result.as_ref()),
                jobs: jobs.into_iter().map(RawJob::into_summary).collect(),
            },
            DetailResponse::Flat(flat) => BuildDetail {
                message: flat.message.unwrap_or_default(),
                sha: flat.commit.as_ref().map(value_to_string).unwrap_or_default(),
                compare_url: flat.compare_url,
                branch: flat.branch.unwrap_or_default(),
                author_name: flat.author_name.unwrap_or_default(),
                author_email: flat.author_email.unwrap_or_default(),
                state: derive_state(flat.state, flat.result.as_ref()),
                jobs: flat.matrix.into_iter().map(RawJob::into_summary).collect(),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDetailBuild {
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    result: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDetailCommit {
    #[serde(default)]
    sha: Option<String>,
    #[serde(default)]
    branch: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    compare_url: Option<String>,
    #[serde(default)]
    author_name: Option<String>,
    #[serde(default)]
    author_email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawFlatDetail {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    commit: Option<Value>,
    #[serde(default)]
    compare_url: Option<String>,
    #[serde(default)]
    branch: Option<String>,
    #[serde(default)]
    author_name: Option<String>,
    #[serde(default)]
    author_email: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    matrix: Vec<RawJob>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawJob {
    #[serde(default)]
    number: Option<Value>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    finished_at: Option<String>,
    #[serde(default)]
    config: Option<Value>,
}

impl RawJob {
    fn into_summary(self) -> JobSummary {
        let config = self.config.unwrap_or(Value::Null);
        let language = config
            .get("language")
            .map(value_to_string)
            .unwrap_or_default();
        let config_value = language_config_value(&config, &language);
        JobSummary {
            number: self.number.as_ref().map(value_to_string).unwrap_or_default(),
            config_value,
            language,
            state: derive_state(self.state, self.result.as_ref()),
            finished_at: self.finished_at,
        }
    }
}

/// Config keys holding the version for languages whose key differs from the
/// language name.
const VERSION_KEYS: &[(&str, &str)] = &[
    ("ruby", "rvm"),
    ("java", "jdk"),
    ("scala", "scala"),
    ("objective-c", "xcode_sdk"),
    ("android", "jdk"),
    ("clojure", "lein"),
    ("groovy", "jdk"),
];

/// Value configured for `language` in a job config, e.g. `node_js: "0.10"`
fn language_config_value(config: &Value, language: &str) -> String {
    if language.is_empty() {
        return String::new();
    }
    if let Some(value) = config.get(language) {
        return value_to_string(value);
    }
    VERSION_KEYS
        .iter()
        .find(|(lang, _)| *lang == language)
        .and_then(|(_, key)| config.get(*key))
        .map(value_to_string)
        .unwrap_or_default()
}

/// Legacy records report `finished` plus a numeric result instead of
/// `passed`/`failed`.
fn derive_state(state: Option<String>, result: Option<&Value>) -> String {
    match state {
        Some(state) if state != "finished" => state,
        state => match result.and_then(Value::as_i64) {
            Some(0) => "passed".to_string(),
            Some(_) => "failed".to_string(),
            None => state.unwrap_or_default(),
        },
    }
}

/// Render a JSON scalar without quotes; arrays render their first element.
fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.first().map(value_to_string).unwrap_or_default(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn build(id: u64, result: Option<i64>, state: Option<&str>) -> BuildSummary {
        BuildSummary {
            id,
            commit_id: None,
            branch: None,
            result,
            state: state.map(str::to_string),
        }
    }

    #[test]
    fn test_build_outcome_is_three_valued() {
        assert_eq!(build(1, Some(0), None).outcome(), BuildOutcome::Passing);
        assert_eq!(build(1, Some(1), None).outcome(), BuildOutcome::Failing);
        assert_eq!(build(1, None, None).outcome(), BuildOutcome::InProgress);
        assert_eq!(build(1, None, Some("passed")).outcome(), BuildOutcome::Passing);
        assert_eq!(build(1, None, Some("errored")).outcome(), BuildOutcome::Failing);
        assert_eq!(build(1, None, Some("started")).outcome(), BuildOutcome::InProgress);
    }

    fn job(state: &str, finished_at: Option<&str>) -> JobSummary {
        JobSummary {
            number: "1.1".to_string(),
            language: "rust".to_string(),
            config_value: "stable".to_string(),
            state: state.to_string(),
            finished_at: finished_at.map(str::to_string),
        }
    }

    #[test]
    fn test_job_outcome_matches_build_failure_states() {
        let done = Some("2026-01-01T00:00:00Z");
        assert_eq!(job("failed", done).outcome(), BuildOutcome::Failing);
        assert_eq!(job("errored", done).outcome(), BuildOutcome::Failing);
        assert_eq!(job("canceled", done).outcome(), BuildOutcome::Failing);
        assert_eq!(job("canceled", None).outcome(), BuildOutcome::Failing);
        assert_eq!(job("passed", done).outcome(), BuildOutcome::Passing);
        assert_eq!(job("started", None).outcome(), BuildOutcome::InProgress);
    }

    #[test]
    fn test_structured_listing() {
        let body = json!({
            "builds": [
                {"id": 10, "commit_id": 1, "state": "passed", "number": "7"},
                {"id": 11, "commit_id": 2, "state": "started"}
            ],
            "commits": [
                {"id": 1, "sha": "aaaa", "branch": "main", "message": "m"},
                {"id": 2, "sha": "bbbb", "branch": "dev"}
            ]
        });
        let listing: ListingResponse = serde_json::from_value(body).unwrap();
        assert!(matches!(listing, ListingResponse::Structured { .. }));

        let (commits, builds) = listing.normalize();
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[1].branch, "dev");
        assert_eq!(builds[0].commit_id, Some(1));
        assert_eq!(builds[0].outcome(), BuildOutcome::Passing);
    }

    #[test]
    fn test_legacy_listing_links_synthetic_commits() {
        let body = json!([
            {"id": 20, "result": null, "status": null, "branch": "dev", "commit": "cccc"},
            {"id": 19, "result": 1, "branch": "main", "commit": "dddd"}
        ]);
        let listing: ListingResponse = serde_json::from_value(body).unwrap();
        assert!(matches!(listing, ListingResponse::LegacyArray(_)));

        let (commits, builds) = listing.normalize();
        assert_eq!(commits[0], CommitSummary { id: 20, branch: "dev".into(), sha: "cccc".into() });
        assert_eq!(builds[1].commit_id, Some(19));
        assert_eq!(builds[0].outcome(), BuildOutcome::InProgress);
        assert_eq!(builds[1].outcome(), BuildOutcome::Failing);
    }

    #[test]
    fn test_listing_missing_builds_is_malformed() {
        let result = serde_json::from_value::<ListingResponse>(json!({"commits": []}));
        assert!(result.is_err());
    }

    #[test]
    fn test_structured_detail() {
        let body = json!({
            "build": {"id": 10, "state": "failed"},
            "commit": {
                "sha": "0123456789abcdef",
                "branch": "main",
                "message": "Fix parser\n\nDetails",
                "compare_url": "https://github.com/alice/demo/compare/a...b",
                "author_name": "Alice",
                "author_email": "alice@example.com"
            },
            "jobs": [
                {"number": "10.1", "state": "passed", "finished_at": "2026-01-01T00:00:00Z",
                 "config": {"language": "node_js", "node_js": "0.10"}},
                {"number": "10.2", "state": "started", "finished_at": null,
                 "config": {"language": "ruby", "rvm": "2.1"}}
            ]
        });
        let detail = serde_json::from_value::<DetailResponse>(body).unwrap().normalize();
        assert_eq!(detail.state, "failed");
        assert_eq!(detail.outcome(), BuildOutcome::Failing);
        assert_eq!(detail.author_name, "Alice");
        assert_eq!(detail.jobs[0].config_value, "0.10");
        assert_eq!(detail.jobs[1].language, "ruby");
        assert_eq!(detail.jobs[1].config_value, "2.1");
        assert_eq!(detail.jobs[1].outcome(), BuildOutcome::InProgress);
    }

    #[test]
    fn test_flat_detail() {
        let body = json!({
            "id": 7,
            "message": "Legacy build",
            "commit": "fedcba9876543210",
            "branch": "master",
            "compare_url": "https://github.com/a/b/compare/x",
            "author_name": "Bob",
            "author_email": "bob@example.com",
            "state": "finished",
            "result": 0,
            "matrix": [
                {"number": 7.1, "result": 0, "finished_at": "2013-01-01T00:00:00Z",
                 "config": {"language": "python", "python": 2.7}}
            ]
        });
        let detail = serde_json::from_value::<DetailResponse>(body).unwrap().normalize();
        assert_eq!(detail.sha, "fedcba9876543210");
        assert_eq!(detail.state, "passed");
        assert_eq!(detail.jobs[0].number, "7.1");
        assert_eq!(detail.jobs[0].state, "passed");
        assert_eq!(detail.jobs[0].config_value, "2.7");
        assert_eq!(detail.jobs[0].outcome(), BuildOutcome::Passing);
    }

    #[test]
    fn test_sparse_detail_degrades() {
        let detail = serde_json::from_value::<DetailResponse>(json!({})).unwrap().normalize();
        assert_eq!(detail.sha, "");
        assert_eq!(detail.state, "");
        assert!(detail.compare_url.is_none());
        assert!(detail.jobs.is_empty());
    }

    #[test]
    fn test_job_without_language() {
        let job = serde_json::from_value::<RawJob>(json!({"number": "3.1", "state": "failed"}))
            .unwrap()
            .into_summary();
        assert_eq!(job.language, "");
        assert_eq!(job.config_value, "");
        assert_eq!(job.outcome(), BuildOutcome::Failing);
    }
}
