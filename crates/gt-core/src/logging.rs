//! Logging initialization for the git-travis binary.

use std::sync::OnceLock;

/// Environment variable selecting the log level
pub const LOG_ENV: &str = "GIT_TRAVIS_LOG";

static INIT: OnceLock<()> = OnceLock::new();

fn parse_level(value: Option<&str>) -> tracing::Level {
    match value.unwrap_or("warn").to_ascii_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::WARN,
    }
}

/// Initialize process-level tracing output from `GIT_TRAVIS_LOG`.
///
/// Logs go to stderr so they never interleave with the status report on
/// stdout. Safe to call multiple times; only the first call installs the
/// subscriber, and failures are ignored.
pub fn init() {
    if INIT.get().is_some() {
        return;
    }
    let level = parse_level(std::env::var(LOG_ENV).ok().as_deref());
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
    let _ = INIT.set(());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level(None), tracing::Level::WARN);
        assert_eq!(parse_level(Some("DEBUG")), tracing::Level::DEBUG);
        assert_eq!(parse_level(Some("info")), tracing::Level::INFO);
        assert_eq!(parse_level(Some("bogus")), tracing::Level::WARN);
    }

    #[test]
    fn test_init_is_idempotent() {
        init();
        init();
    }
}
