//! Shared HTTP client construction

use crate::error::CiError;
use reqwest::{Client, ClientBuilder};

/// Creates a new HTTP client builder with the given User-Agent header.
///
/// GitHub rejects requests without a User-Agent, so every client in this
/// crate goes through here.
pub fn builder(user_agent: impl Into<String>) -> ClientBuilder {
    Client::builder().user_agent(user_agent.into())
}

/// Creates a new HTTP client with the given User-Agent header.
pub fn new_client(user_agent: impl Into<String>) -> Result<Client, CiError> {
    builder(user_agent)
        .build()
        .map_err(|e| CiError::transport("failed to build HTTP client", e))
}

/// Join a base URL and an absolute API path without doubling slashes.
pub(crate) fn join(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_client() {
        assert!(new_client("git-travis-test/1.0").is_ok());
    }

    #[test]
    fn test_join() {
        assert_eq!(join("https://api.github.com", "/repos/a/b"), "https://api.github.com/repos/a/b");
        assert_eq!(join("http://127.0.0.1:8080/", "repos/a/b"), "http://127.0.0.1:8080/repos/a/b");
    }
}
