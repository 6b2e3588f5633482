//! git-travis - Travis CI build status for the current branch
//!
//! Reads the `origin` remote and current branch from git, asks Travis for the
//! latest build of that branch and prints a colorized summary.

use clap::Parser;
use git_travis_core::logging;

mod commands;
mod prompt;
mod render;

use commands::Cli;

fn main() {
    logging::init();
    let cli = Cli::parse();

    match cli.execute() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}
