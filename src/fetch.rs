//! Background units of work.
//!
//! Each adapter performs exactly one network call or process run and turns the
//! outcome into a single [`Completion`]. Adapters never see UI state; the engine
//! spawns them and receives their completion as an [`crate::action::Action`].

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;

use tokio::process::Command;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::source::RepoSource;
use crate::types::{CommitSummary, PullRequestSummary, RepositorySummary};

/// Which kind of request is pending
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    PullRequests,
    Commits,
    HealthCheck,
    BookmarkRepo,
}

/// Outcome of one background fetch: a typed success payload or an error message
#[derive(Debug, Clone)]
pub enum Completion {
    PullRequests(std::result::Result<Vec<PullRequestSummary>, String>),
    Commits(std::result::Result<Vec<CommitSummary>, String>),
    HealthCheck(std::result::Result<String, String>),
    BookmarkRepo(std::result::Result<RepositorySummary, String>),
}

impl Completion {
    pub fn kind(&self) -> FetchKind {
        match self {
            Completion::PullRequests(_) => FetchKind::PullRequests,
            Completion::Commits(_) => FetchKind::Commits,
            Completion::HealthCheck(_) => FetchKind::HealthCheck,
            Completion::BookmarkRepo(_) => FetchKind::BookmarkRepo,
        }
    }
}

pub async fn pull_requests(source: Arc<dyn RepoSource>, pulls_url: String, limit: u8) -> Completion {
    let result = source.fetch_recent_pulls(&pulls_url, limit).await;
    Completion::PullRequests(result.map_err(|e| e.to_string()))
}

pub async fn commits(source: Arc<dyn RepoSource>, repo_api_url: String, limit: u8) -> Completion {
    let result = source.fetch_recent_commits(&repo_api_url, limit).await;
    Completion::Commits(result.map_err(|e| e.to_string()))
}

pub async fn bookmark_repo(source: Arc<dyn RepoSource>, web_url: String) -> Completion {
    let result = source.fetch_bookmark_repo_details(&web_url).await;
    Completion::BookmarkRepo(result.map_err(|e| e.to_string()))
}

pub async fn health_check(runner: HealthCheck, repo_url: String) -> Completion {
    let result = runner.run(&repo_url).await;
    Completion::HealthCheck(result.map_err(|e| e.to_string()))
}

/// External health-check executable, invoked with the repository URL as its only argument
#[derive(Debug, Clone)]
pub struct HealthCheck {
    script: PathBuf,
}

impl HealthCheck {
    pub fn new(script: impl Into<PathBuf>) -> Self {
        Self {
            script: script.into(),
        }
    }

    /// Run the script and capture stdout. A non-zero exit carries the captured
    /// stderr when there is any.
    pub async fn run(&self, repo_url: &str) -> Result<String> {
        #[cfg(unix)]
        ensure_executable(&self.script);

        debug!(script = %self.script.display(), url = %repo_url, "running health check");

        let output = Command::new(&self.script)
            .arg(repo_url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                AppError::HealthCheck(format!("failed to run {}: {}", self.script.display(), e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = if stderr.trim().is_empty() {
                output.status.to_string()
            } else {
                format!("{}\nStderr: {}", output.status, stderr)
            };
            return Err(AppError::HealthCheck(message));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Best effort `chmod +x`; a missing script surfaces as a launch failure instead
#[cfg(unix)]
fn ensure_executable(path: &std::path::Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Ok(metadata) = std::fs::metadata(path) {
        let mut perms = metadata.permissions();
        let mode = perms.mode();
        if mode & 0o111 != 0o111 {
            perms.set_mode(mode | 0o111);
            let _ = std::fs::set_permissions(path, perms);
        }
    }
}
