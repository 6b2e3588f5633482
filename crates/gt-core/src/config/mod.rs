//! Configuration resolution
//!
//! Resolves configuration from multiple sources with priority:
//! 1. Environment variables
//! 2. Repo-local config (.git-travis.toml)
//! 3. Global config (~/.config/git-travis/config.toml)
//! 4. Defaults

mod discovery;
mod types;

pub use discovery::{
    resolve_config, ConfigError, COLOR_ENV, GIT_ENV, GITHUB_API_ENV, NO_COLOR_ENV, ORG_API_ENV,
    PRO_API_ENV, TOKEN_ENV,
};
pub use types::{ApiConfig, Config, DisplayConfig, GitConfig};
