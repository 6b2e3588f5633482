//! Home directory resolution
//!
//! # Precedence
//!
//! 1. `GIT_TRAVIS_HOME` environment variable (if set and non-empty)
//! 2. `dirs::home_dir()` platform default
//!
//! Integration tests point `GIT_TRAVIS_HOME` at a temporary directory so the
//! developer's own configuration never leaks into a run.

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Environment variable overriding the home directory
pub const HOME_ENV: &str = "GIT_TRAVIS_HOME";

/// Get the home directory used to locate global configuration
///
/// # Errors
///
/// Returns an error if `GIT_TRAVIS_HOME` is unset and the platform home
/// directory cannot be determined.
pub fn get_home_dir() -> Result<PathBuf> {
    if let Ok(home) = std::env::var(HOME_ENV) {
        let trimmed = home.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed));
        }
    }

    dirs::home_dir().context("Could not determine home directory")
}
