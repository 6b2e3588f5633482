//! `origin` remote parsing
//!
//! Turns `git remote -v` output into a canonical [`RepositoryRef`]. Only three
//! URL shapes are recognised, each by its own matcher:
//!
//! - SSH: `git@github.com:owner/repo.git`
//! - git protocol: `git://github.com/owner/repo.git`
//! - HTTPS: `https://github.com/owner/repo.git`
//!
//! Every other shape is rejected rather than guessed at. In particular a
//! plain `http://host:owner/repo` remote looks like SSH to a naive splitter
//! and would otherwise resolve to the wrong owner.

use crate::error::GitError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// Name of the remote that identifies the repository
pub const ORIGIN: &str = "origin";

/// Owner and name of a hosted repository
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryRef {
    owner: String,
    name: String,
}

impl RepositoryRef {
    /// Build a reference from raw segments.
    ///
    /// Both segments are trimmed and must be non-empty afterwards.
    pub fn new(owner: &str, name: &str) -> Result<Self, GitError> {
        let owner = owner.trim();
        let name = name.trim();
        if owner.is_empty() || name.is_empty() {
            return Err(GitError::Parse {
                message: format!("invalid repository '{owner}/{name}'"),
            });
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    /// Owning user or organisation
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A recognised remote URL shape.
///
/// Each matcher returns the bare `owner/repo` path when the URL has its shape.
type Matcher = fn(&str) -> Option<&str>;

const MATCHERS: &[(&str, Matcher)] = &[
    ("ssh", match_ssh),
    ("git", match_git_protocol),
    ("https", match_https),
];

/// Parse `git remote -v` output into the `origin` repository.
///
/// The first line whose first token is `origin` decides the result; later
/// lines are never consulted, even when the first one fails to parse.
pub fn parse_remotes(text: &str) -> Result<RepositoryRef, GitError> {
    let line = text
        .lines()
        .find(|line| line.split_whitespace().next() == Some(ORIGIN))
        .ok_or_else(|| GitError::Parse {
            message: "no 'origin' remote found".to_string(),
        })?;

    parse_remote_line(line)
}

/// Parse a single `origin<TAB>url (fetch)` line.
pub fn parse_remote_line(line: &str) -> Result<RepositoryRef, GitError> {
    let line = line.trim_end();
    let line = line
        .strip_suffix(" (fetch)")
        .or_else(|| line.strip_suffix(" (push)"))
        .unwrap_or(line);

    let url = line.split('\t').nth(1).map(str::trim).ok_or_else(|| GitError::Parse {
        message: format!("malformed remote line '{line}'"),
    })?;

    let path = normalize_url(url).ok_or_else(|| GitError::Parse {
        message: format!("unsupported remote URL '{url}'"),
    })?;

    let mut segments = path
        .split('/')
        .map(str::trim)
        .filter(|segment| !segment.is_empty());

    match (segments.next(), segments.next()) {
        (Some(owner), Some(name)) => RepositoryRef::new(owner, name),
        _ => Err(GitError::Parse {
            message: format!("remote URL '{url}' has no owner/repo path"),
        }),
    }
}

/// Reduce a remote URL to its `owner/repo` path using the first matcher that
/// accepts it.
pub fn normalize_url(url: &str) -> Option<&str> {
    let path = MATCHERS.iter().find_map(|(shape, matcher)| {
        let path = matcher(url)?;
        trace!(shape, url, "matched remote URL");
        Some(path)
    })?;
    let path = path.trim_end_matches('/');
    Some(path.strip_suffix(".git").unwrap_or(path))
}

/// `user@host:owner/repo.git`
fn match_ssh(url: &str) -> Option<&str> {
    if url.contains("://") {
        return None;
    }
    let (user, rest) = url.split_once('@')?;
    let (host, path) = rest.split_once(':')?;
    if user.is_empty() || host.is_empty() || host.contains('/') || path.starts_with('/') {
        return None;
    }
    Some(path)
}

/// `git://host/owner/repo.git`
fn match_git_protocol(url: &str) -> Option<&str> {
    strip_scheme_and_host(url, "git://")
}

/// `https://host/owner/repo.git`
fn match_https(url: &str) -> Option<&str> {
    strip_scheme_and_host(url, "https://")
}

fn strip_scheme_and_host<'a>(url: &'a str, scheme: &str) -> Option<&'a str> {
    // Validate with the url crate; the returned path borrows the original text.
    let parsed = url::Url::parse(url).ok()?;
    parsed.host_str()?;

    let rest = url.strip_prefix(scheme)?;
    let (_, path) = rest.split_once('/')?;
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(owner: &str, name: &str) -> RepositoryRef {
        RepositoryRef::new(owner, name).unwrap()
    }

    #[test]
    fn test_https_fetch_line() {
        let text = "origin\thttps://github.com/alice/demo.git (fetch)\n";
        assert_eq!(parse_remotes(text).unwrap(), repo("alice", "demo"));
    }

    #[test]
    fn test_three_shapes_agree() {
        let lines = [
            "origin\tgit@github.com:alice/demo.git (fetch)",
            "origin\tgit://github.com/alice/demo.git (fetch)",
            "origin\thttps://github.com/alice/demo.git (push)",
        ];
        for line in lines {
            assert_eq!(parse_remotes(line).unwrap(), repo("alice", "demo"), "{line}");
        }
    }

    #[test]
    fn test_without_git_extension() {
        let text = "origin\thttps://github.com/alice/demo (fetch)";
        assert_eq!(parse_remotes(text).unwrap(), repo("alice", "demo"));

        let text = "origin\tgit@github.com:alice/demo (fetch)";
        assert_eq!(parse_remotes(text).unwrap(), repo("alice", "demo"));
    }

    #[test]
    fn test_extra_path_segments_ignored() {
        let text = "origin\thttps://github.com/alice/demo/tree/main (fetch)";
        assert_eq!(parse_remotes(text).unwrap(), repo("alice", "demo"));
    }

    #[test]
    fn test_first_origin_line_wins() {
        let text = "upstream\thttps://github.com/bob/other.git (fetch)\n\
                    origin\tgit@github.com:alice/demo.git (fetch)\n\
                    origin\tgit@github.com:carol/late.git (push)\n";
        assert_eq!(parse_remotes(text).unwrap(), repo("alice", "demo"));
    }

    #[test]
    fn test_origin_prefix_is_not_origin() {
        let text = "origin2\thttps://github.com/bob/other.git (fetch)";
        assert!(matches!(parse_remotes(text), Err(GitError::Parse { .. })));
    }

    #[test]
    fn test_plain_http_with_colon_rejected() {
        let text = "origin\thttp://github.com:alice/demo.git (fetch)";
        assert!(matches!(parse_remotes(text), Err(GitError::Parse { .. })));
    }

    #[test]
    fn test_plain_http_rejected() {
        let text = "origin\thttp://github.com/alice/demo.git (fetch)";
        assert!(matches!(parse_remotes(text), Err(GitError::Parse { .. })));
    }

    #[test]
    fn test_single_segment_rejected() {
        let text = "origin\thttps://github.com/alice (fetch)";
        assert!(matches!(parse_remotes(text), Err(GitError::Parse { .. })));

        let text = "origin\tgit@github.com:demo.git (fetch)";
        assert!(matches!(parse_remotes(text), Err(GitError::Parse { .. })));
    }

    #[test]
    fn test_missing_url_field() {
        assert!(matches!(parse_remotes("origin"), Err(GitError::Parse { .. })));
    }

    #[test]
    fn test_no_remotes() {
        assert!(matches!(parse_remotes(""), Err(GitError::Parse { .. })));
    }

    #[test]
    fn test_local_path_rejected() {
        let text = "origin\t/srv/git/demo.git (fetch)";
        assert!(matches!(parse_remotes(text), Err(GitError::Parse { .. })));
    }

    #[test]
    fn test_segments_trimmed() {
        assert_eq!(normalize_url("git@github.com:alice/demo.git"), Some("alice/demo"));
        assert_eq!(normalize_url("https://github.com/alice/demo/"), Some("alice/demo"));
        assert_eq!(normalize_url("ftp://github.com/alice/demo"), None);
    }

    #[test]
    fn test_repository_ref_validation() {
        assert!(RepositoryRef::new("", "demo").is_err());
        assert!(RepositoryRef::new("alice", "  ").is_err());
        let r = RepositoryRef::new(" alice ", "demo\n").unwrap();
        assert_eq!(r.owner(), "alice");
        assert_eq!(r.name(), "demo");
        assert_eq!(r.to_string(), "alice/demo");
    }
}
