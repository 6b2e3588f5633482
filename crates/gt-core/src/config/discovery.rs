//! Configuration discovery and resolution

use super::types::{Config, FileConfig, FileDisplayConfig};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Pre-issued GitHub token, preferred over interactive login
pub const TOKEN_ENV: &str = "GIT_TRAVIS_TOKEN";
/// GitHub API base URL override
pub const GITHUB_API_ENV: &str = "GIT_TRAVIS_GITHUB_API";
/// Travis public endpoint override
pub const ORG_API_ENV: &str = "GIT_TRAVIS_ORG_API";
/// Travis private endpoint override
pub const PRO_API_ENV: &str = "GIT_TRAVIS_PRO_API";
/// git executable override
pub const GIT_ENV: &str = "GIT_TRAVIS_GIT";
/// Disables color when set
pub const COLOR_ENV: &str = "GIT_TRAVIS_NO_COLOR";
/// Conventional cross-tool switch, see <https://no-color.org>
pub const NO_COLOR_ENV: &str = "NO_COLOR";

const REPO_CONFIG_FILE: &str = ".git-travis.toml";
const GLOBAL_CONFIG_FILE: &str = ".config/git-travis/config.toml";

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Resolve configuration from all sources
///
/// Priority (highest to lowest):
/// 1. Environment variables
/// 2. Repo-local config (.git-travis.toml in current dir or up to the git root),
///    `[display]` only
/// 3. Global config (~/.config/git-travis/config.toml)
/// 4. Defaults
///
/// A checkout is untrusted, so its config may not pick the git executable or
/// the endpoints credentials are sent to. `[api]` and `[git]` in the
/// repo-local file are ignored with a warning.
///
/// Unreadable or malformed files are skipped with a warning.
pub fn resolve_config(current_dir: &Path, home_dir: &Path) -> Config {
    resolve_config_with(current_dir, home_dir, |key| std::env::var(key).ok())
}

pub(crate) fn resolve_config_with<F>(current_dir: &Path, home_dir: &Path, env: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = Config::default();

    // 3. Global config
    let global_config_path = home_dir.join(GLOBAL_CONFIG_FILE);
    if global_config_path.exists() {
        match load_config_file(&global_config_path) {
            Ok(file_config) => merge_config(&mut config, file_config),
            Err(e) => warn!("Failed to parse global config at {global_config_path:?}: {e}"),
        }
    }

    // 2. Repo-local config
    if let Some(repo_config) = find_repo_local_config(current_dir) {
        match load_config_file(&repo_config) {
            Ok(file_config) => merge_repo_local_config(&mut config, file_config, &repo_config),
            Err(e) => warn!("Failed to parse repo config at {repo_config:?}: {e}"),
        }
    }

    // 1. Environment
    apply_env_overrides(&mut config, env);

    config
}

/// Find repo-local config file
///
/// Searches current directory and parent directories up to git root
fn find_repo_local_config(current_dir: &Path) -> Option<PathBuf> {
    let mut dir = current_dir;

    loop {
        let config_path = dir.join(REPO_CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if dir.join(".git").exists() {
            break;
        }

        dir = dir.parent()?;
    }

    None
}

fn load_config_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    let config: FileConfig = toml::from_str(&contents)?;
    Ok(config)
}

/// Merge the display section of a repo-local file; everything else is dropped
fn merge_repo_local_config(base: &mut Config, file: FileConfig, path: &Path) {
    if file.api.is_set() || file.git.is_set() {
        warn!("Ignoring [api] and [git] in repo config at {path:?}; set them in the global config or environment");
    }
    merge_display(base, file.display);
}

/// Merge file config into base config, field by field
fn merge_config(base: &mut Config, file: FileConfig) {
    if let Some(github) = file.api.github {
        base.api.github = github;
    }
    if let Some(org) = file.api.travis_org {
        base.api.travis_org = org;
    }
    if let Some(pro) = file.api.travis_pro {
        base.api.travis_pro = pro;
    }
    if let Some(user_agent) = file.api.user_agent {
        base.api.user_agent = user_agent;
    }

    if let Some(executable) = file.git.executable {
        base.git.executable = executable;
    }

    merge_display(base, file.display);
}

fn merge_display(base: &mut Config, display: FileDisplayConfig) {
    if let Some(color) = display.color {
        base.display.color = color;
    }
    if let Some(unicode) = display.unicode {
        base.display.unicode = unicode;
    }
}

fn apply_env_overrides<F>(config: &mut Config, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| env(key).filter(|value| !value.trim().is_empty());

    if let Some(github) = non_empty(GITHUB_API_ENV) {
        config.api.github = github;
    }
    if let Some(org) = non_empty(ORG_API_ENV) {
        config.api.travis_org = org;
    }
    if let Some(pro) = non_empty(PRO_API_ENV) {
        config.api.travis_pro = pro;
    }
    if let Some(git) = non_empty(GIT_ENV) {
        config.git.executable = git;
    }
    if env(COLOR_ENV).is_some() || non_empty(NO_COLOR_ENV).is_some() {
        config.display.color = false;
    }

    config.token = non_empty(TOKEN_ENV).map(|token| token.trim().to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write_global(home: &Path, contents: &str) {
        let path = home.join(GLOBAL_CONFIG_FILE);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_defaults() {
        let temp = TempDir::new().unwrap();
        let config = resolve_config_with(temp.path(), temp.path(), no_env);
        assert_eq!(config, Config::default());
        assert_eq!(config.api.travis_org, "https://api.travis-ci.org");
        assert!(config.token.is_none());
    }

    #[test]
    fn test_global_then_repo_local_display() {
        let home = TempDir::new().unwrap();
        let repo = TempDir::new().unwrap();
        fs::create_dir(repo.path().join(".git")).unwrap();

        write_global(
            home.path(),
            "[api]\ngithub = \"https://ghe.example.com/api/v3\"\n[display]\nunicode = false\n[git]\nexecutable = \"/opt/git/bin/git\"\n",
        );
        fs::write(repo.path().join(REPO_CONFIG_FILE), "[display]\ncolor = false\n").unwrap();

        let config = resolve_config_with(repo.path(), home.path(), no_env);
        assert_eq!(config.api.github, "https://ghe.example.com/api/v3");
        assert_eq!(config.git.executable, "/opt/git/bin/git");
        assert!(!config.display.unicode);
        assert!(!config.display.color);
    }

    #[test]
    fn test_repo_local_cannot_redirect_git_or_endpoints() {
        let home = TempDir::new().unwrap();
        let repo = TempDir::new().unwrap();
        fs::create_dir(repo.path().join(".git")).unwrap();
        fs::write(
            repo.path().join(REPO_CONFIG_FILE),
            "[api]\ngithub = \"https://attacker.example\"\ntravis_pro = \"https://attacker.example\"\n\
             [git]\nexecutable = \"./pwn.sh\"\n[display]\nunicode = false\n",
        )
        .unwrap();

        let config = resolve_config_with(repo.path(), home.path(), |key| {
            (key == TOKEN_ENV).then(|| "ghp_secret".to_string())
        });

        assert_eq!(config.git.executable, "git");
        assert_eq!(config.api, Config::default().api);
        assert_eq!(config.token.as_deref(), Some("ghp_secret"));
        // The display section of the same file still applies.
        assert!(!config.display.unicode);
    }

    #[test]
    fn test_repo_local_found_from_subdirectory() {
        let repo = TempDir::new().unwrap();
        fs::create_dir(repo.path().join(".git")).unwrap();
        let nested = repo.path().join("src/deep");
        fs::create_dir_all(&nested).unwrap();
        fs::write(repo.path().join(REPO_CONFIG_FILE), "[display]\ncolor = false\n").unwrap();

        let home = TempDir::new().unwrap();
        let config = resolve_config_with(&nested, home.path(), no_env);
        assert!(!config.display.color);
    }

    #[test]
    fn test_malformed_file_skipped() {
        let home = TempDir::new().unwrap();
        write_global(home.path(), "[api\ngithub = ");
        let config = resolve_config_with(home.path(), home.path(), no_env);
        assert_eq!(config.api, Config::default().api);
    }

    #[test]
    fn test_env_overrides() {
        let home = TempDir::new().unwrap();
        write_global(home.path(), "[api]\ntravis_org = \"https://from-file\"\n");

        let env: HashMap<&str, &str> = HashMap::from([
            (ORG_API_ENV, "http://127.0.0.1:9999"),
            (TOKEN_ENV, " abc123 \n"),
            (NO_COLOR_ENV, "1"),
            (GIT_ENV, ""),
        ]);
        let config = resolve_config_with(home.path(), home.path(), |key| {
            env.get(key).map(|v| v.to_string())
        });

        assert_eq!(config.api.travis_org, "http://127.0.0.1:9999");
        assert_eq!(config.token.as_deref(), Some("abc123"));
        assert!(!config.display.color);
        assert_eq!(config.git.executable, "git");
    }

    #[test]
    fn test_blank_token_ignored() {
        let home = TempDir::new().unwrap();
        let config = resolve_config_with(home.path(), home.path(), |key| {
            (key == TOKEN_ENV).then(|| "   ".to_string())
        });
        assert!(config.token.is_none());
    }

    #[test]
    #[serial]
    fn test_resolve_config_reads_process_env() {
        let home = TempDir::new().unwrap();
        let original = std::env::var(TOKEN_ENV).ok();
        unsafe { std::env::set_var(TOKEN_ENV, "from-env") };

        let config = resolve_config(home.path(), home.path());
        assert_eq!(config.token.as_deref(), Some("from-env"));

        unsafe {
            match original {
                Some(v) => std::env::set_var(TOKEN_ENV, v),
                None => std::env::remove_var(TOKEN_ENV),
            }
        }
    }
}
