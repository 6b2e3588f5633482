//! Branch detection from `git status` output

/// Branch assumed when `git status` does not name one
pub const DEFAULT_BRANCH: &str = "master";

/// Extract the current branch from the first line of `git status`.
///
/// Accepts both the modern `On branch X` header and the older `# On branch X`
/// form. A detached HEAD, empty output or anything unrecognised yields
/// [`DEFAULT_BRANCH`].
pub fn parse_branch(status: &str) -> String {
    let first = status.trim().lines().next().unwrap_or_default().trim();
    let rest = first
        .strip_prefix("# On branch ")
        .or_else(|| first.strip_prefix("On branch "));

    match rest.and_then(|rest| rest.split_whitespace().next()) {
        Some(branch) => branch.to_string(),
        None => DEFAULT_BRANCH.to_string(),
    }
}
