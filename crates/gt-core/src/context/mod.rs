//! Repository context detection
//!
//! Pure parsers over git's textual output. The subprocess side lives in
//! [`crate::git`].

mod branch;
mod remote;

pub use branch::{parse_branch, DEFAULT_BRANCH};
pub use remote::{normalize_url, parse_remote_line, parse_remotes, RepositoryRef, ORIGIN};
