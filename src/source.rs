use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::types::{CommitSummary, PullRequestSummary, RepositorySummary};

/// Remote data the interactive views pull on demand
#[async_trait]
pub trait RepoSource: Send + Sync + std::fmt::Debug {
    async fn fetch_recent_pulls(
        &self,
        pulls_url: &str,
        limit: u8,
    ) -> Result<Vec<PullRequestSummary>>;

    async fn fetch_recent_commits(&self, repo_api_url: &str, limit: u8)
        -> Result<Vec<CommitSummary>>;

    /// Resolve a web URL to full metadata plus its current recent-issue count
    async fn fetch_bookmark_repo_details(&self, web_url: &str) -> Result<RepositorySummary>;
}

/// Owner and repo from an API URL such as `https://api.github.com/repos/{owner}/{repo}[/...]`
pub fn api_owner_repo(api_url: &str) -> Result<(String, String)> {
    let parts: Vec<&str> = api_url.split('/').collect();
    if parts.len() < 6 || parts[4].is_empty() || parts[5].is_empty() {
        return Err(AppError::InvalidUrl(format!(
            "invalid repo URL format: {}",
            api_url
        )));
    }
    // pulls_url carries a `{/number}` template suffix
    let repo = parts[5].split('{').next().unwrap_or(parts[5]);
    Ok((parts[4].to_string(), repo.to_string()))
}

/// Convert `https://github.com/{owner}/{repo}` (optionally with trailing `/` or `.git`)
/// to the matching API URL
pub fn web_url_to_api(web_url: &str) -> Result<String> {
    let trimmed = web_url.trim();
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);

    let invalid = || AppError::InvalidUrl(format!("invalid GitHub URL format: {}", web_url));

    let (_, path) = trimmed.split_once("github.com/").ok_or_else(invalid)?;
    let mut segments = path.split('/');
    let owner = segments.next().filter(|s| !s.is_empty()).ok_or_else(invalid)?;
    let repo = segments.next().filter(|s| !s.is_empty()).ok_or_else(invalid)?;

    Ok(format!("https://api.github.com/repos/{}/{}", owner, repo))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_repo_from_api_url() {
        assert_eq!(
            api_owner_repo("https://api.github.com/repos/rust-lang/rust").unwrap(),
            ("rust-lang".to_string(), "rust".to_string())
        );
    }

    #[test]
    fn owner_repo_from_pulls_template() {
        assert_eq!(
            api_owner_repo("https://api.github.com/repos/tokio-rs/tokio/pulls{/number}").unwrap(),
            ("tokio-rs".to_string(), "tokio".to_string())
        );
    }

    #[test]
    fn owner_repo_rejects_short_url() {
        let err = api_owner_repo("https://api.github.com/repos").unwrap_err();
        assert!(err.to_string().contains("invalid repo URL format"));
    }

    #[test]
    fn web_url_variants_convert() {
        for url in [
            "https://github.com/a/b",
            "https://github.com/a/b/",
            "https://github.com/a/b.git",
            "  github.com/a/b  ",
            "https://github.com/a/b/pulls",
        ] {
            assert_eq!(
                web_url_to_api(url).unwrap(),
                "https://api.github.com/repos/a/b",
                "{}",
                url
            );
        }
    }

    #[test]
    fn web_url_without_repo_is_invalid() {
        let err = web_url_to_api("https://github.com/a").unwrap_err();
        assert_eq!(err.to_string(), "invalid GitHub URL format: https://github.com/a");
        assert!(web_url_to_api("https://gitlab.com/a/b").is_err());
    }
}
