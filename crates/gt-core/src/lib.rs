//! Core types for git-travis
//!
//! This crate turns the local git checkout into something the CI side can
//! query: the `origin` remote becomes a [`RepositoryRef`], `git status`
//! becomes a branch name. It also owns configuration, home directory
//! resolution and logging setup shared by the other crates.
//!
//! Nothing in here talks to the network.

pub mod config;
pub mod context;
pub mod error;
pub mod git;
pub mod home;
pub mod logging;
pub mod text;

pub use context::{parse_branch, parse_remotes, RepositoryRef, DEFAULT_BRANCH};
pub use error::GitError;
pub use git::{resolve_target, GitCli, GitRemoteLister, GitStatusReader};
