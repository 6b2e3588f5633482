//! Configuration types

use serde::Deserialize;

/// Public GitHub API
pub const DEFAULT_GITHUB_API: &str = "https://api.github.com";
/// Travis endpoint for public repositories
pub const DEFAULT_TRAVIS_ORG_API: &str = "https://api.travis-ci.org";
/// Travis endpoint for private repositories
pub const DEFAULT_TRAVIS_PRO_API: &str = "https://api.travis-ci.com";
/// User-Agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "git-travis cli tool";

/// Complete resolved configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Remote API endpoints
    pub api: ApiConfig,
    /// Display configuration
    pub display: DisplayConfig,
    /// git executable configuration
    pub git: GitConfig,
    /// Pre-issued GitHub token. Only ever read from the environment.
    pub token: Option<String>,
}

/// Remote API endpoints
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// GitHub API base URL (visibility probe, password authorizations)
    pub github: String,
    /// Travis API base URL for public repositories
    pub travis_org: String,
    /// Travis API base URL for private repositories
    pub travis_pro: String,
    /// User-Agent header value
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            github: DEFAULT_GITHUB_API.to_string(),
            travis_org: DEFAULT_TRAVIS_ORG_API.to_string(),
            travis_pro: DEFAULT_TRAVIS_PRO_API.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Display configuration
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayConfig {
    /// Enable colored output
    pub color: bool,
    /// Use unicode status glyphs (✔ ✖ ♢) instead of OK / X / O
    pub unicode: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: true,
            unicode: !cfg!(windows),
        }
    }
}

/// git executable configuration
#[derive(Debug, Clone, PartialEq)]
pub struct GitConfig {
    /// Program name or path
    pub executable: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            executable: "git".to_string(),
        }
    }
}

/// On-disk configuration file. Every field is optional so that a later file
/// only overrides what it names.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct FileConfig {
    #[serde(default)]
    pub api: FileApiConfig,
    #[serde(default)]
    pub display: FileDisplayConfig,
    #[serde(default)]
    pub git: FileGitConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct FileApiConfig {
    pub github: Option<String>,
    pub travis_org: Option<String>,
    pub travis_pro: Option<String>,
    pub user_agent: Option<String>,
}

impl FileApiConfig {
    pub(crate) fn is_set(&self) -> bool {
        self.github.is_some() || self.travis_org.is_some() || self.travis_pro.is_some() || self.user_agent.is_some()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct FileDisplayConfig {
    pub color: Option<bool>,
    pub unicode: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct FileGitConfig {
    pub executable: Option<String>,
}

impl FileGitConfig {
    pub(crate) fn is_set(&self) -> bool {
        self.executable.is_some()
    }
}
