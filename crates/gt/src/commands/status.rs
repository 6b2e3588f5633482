//! Build status lookup for the current checkout

use crate::prompt::TerminalPrompt;
use crate::render::Renderer;
use anyhow::{Context, Result};
use git_travis_ci_monitor::http::new_client;
use git_travis_ci_monitor::{
    format_failure, format_report, GitHubVisibilityProbe, Glyphs, Orchestrator, TravisClient, TravisEndpoints,
};
use git_travis_core::config::resolve_config;
use git_travis_core::home::get_home_dir;
use git_travis_core::{resolve_target, GitCli};
use std::io::{self, IsTerminal};
use tracing::debug;

/// Run one status lookup.
///
/// Git failures are returned as errors (exit 1 before any network call).
/// A failed run prints a failure line and yields exit code 1; a run whose
/// only gap is the build detail still succeeds.
pub async fn execute() -> Result<i32> {
    let current_dir = std::env::current_dir().context("failed to read current directory")?;
    let home_dir = get_home_dir()?;
    let config = resolve_config(&current_dir, &home_dir);
    debug!(api = ?config.api, display = ?config.display, "configuration resolved");

    let git = GitCli::new(config.git.executable.clone()).with_cwd(&current_dir);
    let (repo, branch) = resolve_target(&git).await?;

    let glyphs = if config.display.unicode { Glyphs::UNICODE } else { Glyphs::ASCII };
    let renderer = Renderer::new(config.display.color && io::stdout().is_terminal(), glyphs);

    println!("Fetching build status for {repo}:{branch}");

    let client = new_client(config.api.user_agent.clone())?;
    let probe = GitHubVisibilityProbe::new(client.clone(), config.api.github.clone());
    let travis = TravisClient::new(
        client,
        TravisEndpoints {
            org: config.api.travis_org.clone(),
            pro: config.api.travis_pro.clone(),
            github: config.api.github.clone(),
        },
    );

    let prompt = TerminalPrompt;
    let orchestrator = Orchestrator::new(probe, travis.clone(), travis, &prompt).with_token(config.token.clone());

    match orchestrator.run(&repo, &branch).await {
        Ok(report) => {
            for line in format_report(&report) {
                println!("{}", renderer.render(&line));
            }
            Ok(0)
        }
        Err(e) => {
            eprintln!("{}", renderer.render(&format_failure(&e)));
            Ok(1)
        }
    }
}
