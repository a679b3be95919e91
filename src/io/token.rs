use std::process::Command;

/// Environment variables checked for a token, in order
const TOKEN_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("no GitHub token found. Please run 'gh auth login' first, or set GITHUB_TOKEN.")]
    NotLoggedIn,
    #[error("could not run 'gh auth token': {0}. Install the GitHub CLI or set GITHUB_TOKEN.")]
    GhUnavailable(std::io::Error),
}

/// Find a GitHub API token: `GITHUB_TOKEN`, `GH_TOKEN`, then `gh auth token`.
pub fn github_token() -> Result<String, TokenError> {
    if let Some(token) = token_from_env(|var| std::env::var(var).ok()) {
        tracing::debug!("using token from environment");
        return Ok(token);
    }
    gh_auth_token()
}

/// First non-blank token among the known environment variables
pub fn token_from_env(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    TOKEN_VARS
        .iter()
        .filter_map(|var| lookup(var))
        .map(|t| t.trim().to_string())
        .find(|t| !t.is_empty())
}

fn gh_auth_token() -> Result<String, TokenError> {
    let output = Command::new("gh")
        .args(["auth", "token"])
        .output()
        .map_err(TokenError::GhUnavailable)?;
    if !output.status.success() {
        return Err(TokenError::NotLoggedIn);
    }
    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(TokenError::NotLoggedIn);
    }
    Ok(token)
}
