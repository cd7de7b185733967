use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::DiscoveryConfig;
use crate::error::{AppError, Result};
use crate::source::{api_owner_repo, web_url_to_api, RepoSource};
use crate::types::{CommitSummary, IssueRef, PullRequestSummary, RepositorySummary};

/// Pause between per-repository requests during discovery
const DISCOVERY_DELAY: Duration = Duration::from_millis(100);

pub struct GitHub {
    client: Octocrab,
    issue_window_days: u32,
}

impl std::fmt::Debug for GitHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHub").finish_non_exhaustive()
    }
}

impl From<octocrab::Error> for AppError {
    fn from(err: octocrab::Error) -> Self {
        AppError::Api(err.to_string())
    }
}

// GitHub REST response types

#[derive(Deserialize)]
struct GhSearch {
    items: Vec<GhIssue>,
}

#[derive(Deserialize)]
struct GhIssue {
    number: u64,
    #[serde(default)]
    title: Option<String>,
    html_url: String,
    repository_url: String,
}

#[derive(Deserialize)]
struct GhRepo {
    url: String,
    name: String,
    html_url: String,
    language: Option<String>,
    pulls_url: String,
    created_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct GhPull {
    number: u64,
    title: Option<String>,
    html_url: String,
}

#[derive(Deserialize)]
struct GhCommit {
    sha: String,
    commit: GhCommitInner,
}

#[derive(Deserialize)]
struct GhCommitInner {
    message: Option<String>,
    author: Option<GhCommitAuthor>,
}

#[derive(Deserialize)]
struct GhCommitAuthor {
    name: Option<String>,
}

#[derive(Serialize)]
struct SearchParams<'a> {
    q: &'a str,
    sort: &'a str,
    order: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    per_page: Option<u8>,
}

#[derive(Serialize)]
struct PullParams {
    state: &'static str,
    sort: &'static str,
    direction: &'static str,
    per_page: u8,
}

#[derive(Serialize)]
struct PageParams {
    per_page: u8,
}

impl From<GhIssue> for IssueRef {
    fn from(issue: GhIssue) -> Self {
        IssueRef {
            number: issue.number,
            title: issue.title.unwrap_or_default(),
            html_url: issue.html_url,
            repository_url: issue.repository_url,
        }
    }
}

impl GitHub {
    pub fn new(token: Option<String>, issue_window_days: u32) -> Result<Self> {
        let mut builder = Octocrab::builder();
        if let Some(token) = token {
            builder = builder.personal_token(token);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            issue_window_days,
        })
    }

    fn cutoff(&self) -> String {
        (Utc::now() - chrono::Duration::days(i64::from(self.issue_window_days)))
            .format("%Y-%m-%d")
            .to_string()
    }

    async fn search_issues(&self, query: &str, per_page: Option<u8>) -> Result<Vec<IssueRef>> {
        let params = SearchParams {
            q: query,
            sort: "created",
            order: "desc",
            per_page,
        };
        let response: GhSearch = self.client.get("/search/issues", Some(&params)).await?;
        Ok(response.items.into_iter().map(IssueRef::from).collect())
    }

    /// Open issues created inside the look-back window, newest first
    pub async fn fetch_recent_issues(&self) -> Result<Vec<IssueRef>> {
        let query = format!("type:issue state:open created:>{}", self.cutoff());
        self.search_issues(&query, None).await
    }

    /// Recent open issues of a single repository
    pub async fn repo_issue_count(&self, repo_api_url: &str) -> Result<Vec<IssueRef>> {
        let (owner, repo) = api_owner_repo(repo_api_url)?;
        let query = format!(
            "repo:{}/{} type:issue state:open created:>{}",
            owner,
            repo,
            self.cutoff()
        );
        self.search_issues(&query, Some(100)).await
    }

    async fn repo_metadata(&self, owner: &str, repo: &str) -> Result<GhRepo> {
        let route = format!("/repos/{}/{}", owner, repo);
        Ok(self.client.get(route, None::<&()>).await?)
    }

    /// Discover, enrich and rank the most active repositories
    pub async fn discover(&self, config: &DiscoveryConfig) -> Result<Vec<RepositorySummary>> {
        let issues = self.fetch_recent_issues().await?;
        info!(issues = issues.len(), "fetched recent issues");

        let mut repos = sample_repositories(issues, config.sample_repos);

        for repo in repos.iter_mut() {
            let (owner, name) = api_owner_repo(&repo.api_url)?;
            let meta = self.repo_metadata(&owner, &name).await?;
            repo.name = meta.name;
            repo.html_url = meta.html_url;
            repo.language = meta.language;
            repo.pulls_url = meta.pulls_url;
            repo.created_at = meta.created_at;

            match self.repo_issue_count(&repo.api_url).await {
                Ok(recent) => {
                    repo.count = recent.len() as u32;
                    repo.recent_issues = recent;
                }
                Err(e) => {
                    warn!(repo = %repo.name, error = %e, "could not get issue count, keeping sample count");
                }
            }

            tokio::time::sleep(DISCOVERY_DELAY).await;
        }

        Ok(rank_repositories(repos, config.display_repos))
    }
}

/// Group issues by repository and keep the `top_n` repositories with most issues.
/// Ties keep first-seen order.
pub fn sample_repositories(issues: Vec<IssueRef>, top_n: usize) -> Vec<RepositorySummary> {
    let mut repos: Vec<RepositorySummary> = Vec::new();

    for issue in issues {
        match repos.iter_mut().find(|r| r.api_url == issue.repository_url) {
            Some(repo) => {
                repo.count += 1;
                repo.recent_issues.push(issue);
            }
            None => repos.push(RepositorySummary {
                api_url: issue.repository_url.clone(),
                name: String::new(),
                html_url: String::new(),
                language: None,
                pulls_url: String::new(),
                count: 1,
                created_at: None,
                score: None,
                recent_issues: vec![issue],
            }),
        }
    }

    repos.sort_by(|a, b| b.count.cmp(&a.count));
    repos.truncate(top_n);
    repos
}

/// Drop repositories without issues, order by count and keep the first `limit`
pub fn rank_repositories(repos: Vec<RepositorySummary>, limit: usize) -> Vec<RepositorySummary> {
    let mut ranked: Vec<_> = repos.into_iter().filter(|r| r.count > 0).collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);
    ranked
}

#[async_trait]
impl RepoSource for GitHub {
    async fn fetch_recent_pulls(
        &self,
        pulls_url: &str,
        limit: u8,
    ) -> Result<Vec<PullRequestSummary>> {
        let (owner, repo) = api_owner_repo(pulls_url)?;
        let params = PullParams {
            state: "open",
            sort: "created",
            direction: "desc",
            per_page: limit,
        };
        let route = format!("/repos/{}/{}/pulls", owner, repo);
        let pulls: Vec<GhPull> = self.client.get(route, Some(&params)).await?;

        Ok(pulls
            .into_iter()
            .map(|pr| PullRequestSummary {
                number: pr.number,
                title: pr.title.unwrap_or_default(),
                html_url: pr.html_url,
            })
            .collect())
    }

    async fn fetch_recent_commits(
        &self,
        repo_api_url: &str,
        limit: u8,
    ) -> Result<Vec<CommitSummary>> {
        let (owner, repo) = api_owner_repo(repo_api_url)?;
        let route = format!("/repos/{}/{}/commits", owner, repo);
        let commits: Vec<GhCommit> = self
            .client
            .get(route, Some(&PageParams { per_page: limit }))
            .await?;

        Ok(commits
            .into_iter()
            .map(|c| CommitSummary {
                sha: c.sha,
                message: c.commit.message.unwrap_or_default(),
                author: c
                    .commit
                    .author
                    .and_then(|a| a.name)
                    .unwrap_or_else(|| "unknown".to_string()),
            })
            .collect())
    }

    async fn fetch_bookmark_repo_details(&self, web_url: &str) -> Result<RepositorySummary> {
        let api_url = web_url_to_api(web_url)?;
        let (owner, repo) = api_owner_repo(&api_url)?;

        let meta = self.repo_metadata(&owner, &repo).await.map_err(|e| {
            warn!(url = %web_url, error = %e, "repository lookup failed");
            AppError::Api(format!(
                "repository not found or not accessible: {}",
                web_url
            ))
        })?;

        let recent = self.repo_issue_count(&api_url).await.unwrap_or_else(|e| {
            warn!(url = %web_url, error = %e, "could not get issue count for bookmark");
            Vec::new()
        });

        Ok(RepositorySummary {
            api_url: meta.url,
            name: meta.name,
            html_url: meta.html_url,
            language: meta.language,
            pulls_url: meta.pulls_url,
            count: recent.len() as u32,
            created_at: meta.created_at,
            score: None,
            recent_issues: recent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(repo: &str, number: u64) -> IssueRef {
        IssueRef {
            number,
            title: format!("issue {}", number),
            html_url: format!("https://github.com/{}/issues/{}", repo, number),
            repository_url: format!("https://api.github.com/repos/{}", repo),
        }
    }

    #[test]
    fn sample_groups_and_orders_by_count() {
        let issues = vec![
            issue("a/one", 1),
            issue("b/two", 2),
            issue("b/two", 3),
            issue("c/three", 4),
            issue("b/two", 5),
            issue("c/three", 6),
        ];

        let repos = sample_repositories(issues, 10);
        let urls: Vec<_> = repos.iter().map(|r| r.api_url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://api.github.com/repos/b/two",
                "https://api.github.com/repos/c/three",
                "https://api.github.com/repos/a/one",
            ]
        );
        assert_eq!(repos[0].count, 3);
        assert_eq!(repos[0].recent_issues.len(), 3);
    }

    #[test]
    fn sample_truncates_to_top_n() {
        let issues = vec![issue("a/one", 1), issue("b/two", 2), issue("c/three", 3)];
        assert_eq!(sample_repositories(issues, 2).len(), 2);
    }

    #[test]
    fn rank_drops_empty_and_limits() {
        let mut repos = sample_repositories(
            vec![issue("a/one", 1), issue("b/two", 2), issue("b/two", 3)],
            10,
        );
        repos.push(RepositorySummary {
            count: 0,
            ..repos[0].clone()
        });
        repos[1].count = 5;

        let ranked = rank_repositories(repos, 1);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].api_url, "https://api.github.com/repos/a/one");
        assert_eq!(ranked[0].count, 5);
    }

    #[test]
    fn search_params_encode_query() {
        let params = SearchParams {
            q: "type:issue state:open",
            sort: "created",
            order: "desc",
            per_page: None,
        };
        let value = serde_json::to_value(&params).unwrap();
        assert!(value.get("per_page").is_none());
        assert_eq!(value["q"], "type:issue state:open");
    }
}
