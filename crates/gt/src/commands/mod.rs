//! CLI definition and execution

use anyhow::{Context, Result};
use clap::Parser;

mod status;

/// git-travis - Travis CI build status for the current branch
#[derive(Parser, Debug)]
#[command(
    name = "git-travis",
    version,
    about = "Show the Travis CI build status of the current git branch",
    long_about = "Looks up the origin remote and current branch, then prints the latest \
                  Travis CI build for that branch with its jobs. Private repositories use \
                  GIT_TRAVIS_TOKEN or prompt for GitHub credentials."
)]
pub struct Cli {}

impl Cli {
    /// Execute the status lookup, returning the process exit code
    pub fn execute(self) -> Result<i32> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to start async runtime")?;
        runtime.block_on(status::execute())
    }
}
