//! git subprocess collaborators

use crate::context::{parse_branch, parse_remotes, RepositoryRef};
use crate::error::GitError;
use std::future::Future;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::debug;

/// Source of `git remote -v` output
pub trait GitRemoteLister: Send + Sync {
    /// List remotes verbosely
    fn list_remotes(&self) -> impl Future<Output = Result<String, GitError>> + Send;
}

/// Source of `git status` output
pub trait GitStatusReader: Send + Sync {
    /// Report working tree status
    fn current_status(&self) -> impl Future<Output = Result<String, GitError>> + Send;
}

/// Runs the git executable in a working directory
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
    cwd: Option<PathBuf>,
}

impl GitCli {
    /// Use `program` as the git executable, run from the process' current directory
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            cwd: None,
        }
    }

    /// Run git from `dir` instead of the current directory
    pub fn with_cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Execute git with `args` and return stdout
    async fn run(&self, args: &[&str]) -> Result<String, GitError> {
        let mut command = Command::new(&self.program);
        command.args(args);
        if let Some(dir) = &self.cwd {
            command.current_dir(dir);
        }

        debug!("running {} {}", self.program, args.join(" "));
        let output = command.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                GitError::ToolNotFound {
                    program: self.program.clone(),
                    source: e,
                }
            } else {
                GitError::Io(e)
            }
        })?;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitRemoteLister for GitCli {
    async fn list_remotes(&self) -> Result<String, GitError> {
        self.run(&["remote", "-v"]).await
    }
}

impl GitStatusReader for GitCli {
    async fn current_status(&self) -> Result<String, GitError> {
        self.run(&["status"]).await
    }
}

/// Resolve the repository and branch to report on.
///
/// Remotes are parsed before status is read, so a checkout without a usable
/// `origin` fails without a second subprocess.
pub async fn resolve_target<G>(git: &G) -> Result<(RepositoryRef, String), GitError>
where
    G: GitRemoteLister + GitStatusReader,
{
    let remotes = git.list_remotes().await?;
    let repo = parse_remotes(&remotes)?;

    let status = git.current_status().await?;
    let branch = parse_branch(&status);

    debug!("resolved {repo}:{branch}");
    Ok((repo, branch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FakeGit {
        remotes: &'static str,
        status: &'static str,
        calls: Mutex<Vec<&'static str>>,
    }

    impl FakeGit {
        fn new(remotes: &'static str, status: &'static str) -> Self {
            Self {
                remotes,
                status,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl GitRemoteLister for FakeGit {
        async fn list_remotes(&self) -> Result<String, GitError> {
            self.calls.lock().unwrap().push("remote");
            Ok(self.remotes.to_string())
        }
    }

    impl GitStatusReader for FakeGit {
        async fn current_status(&self) -> Result<String, GitError> {
            self.calls.lock().unwrap().push("status");
            Ok(self.status.to_string())
        }
    }

    #[tokio::test]
    async fn test_resolve_target() {
        let git = FakeGit::new(
            "origin\tgit@github.com:alice/demo.git (fetch)\norigin\tgit@github.com:alice/demo.git (push)\n",
            "On branch dev\n",
        );
        let (repo, branch) = resolve_target(&git).await.unwrap();
        assert_eq!(repo.to_string(), "alice/demo");
        assert_eq!(branch, "dev");
    }

    #[tokio::test]
    async fn test_resolve_target_parse_failure_skips_status() {
        let git = FakeGit::new("upstream\thttps://github.com/a/b.git (fetch)\n", "On branch dev\n");
        let err = resolve_target(&git).await.unwrap_err();
        assert!(matches!(err, GitError::Parse { .. }));
        assert_eq!(*git.calls.lock().unwrap(), vec!["remote"]);
    }

    #[tokio::test]
    async fn test_missing_executable() {
        let git = GitCli::new("git-travis-definitely-not-installed");
        let err = git.list_remotes().await.unwrap_err();
        assert!(matches!(err, GitError::ToolNotFound { .. }));
    }
}
