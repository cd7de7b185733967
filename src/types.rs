use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Issue that contributed to a repository's recent-issue count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueRef {
    pub number: u64,
    #[serde(default)]
    pub title: String,
    pub html_url: String,
    pub repository_url: String,
}

/// Ranked repository, also the record persisted as a bookmark.
///
/// Reads the older bookmark layout with capitalised keys (`APIURL`, `HTMLURL`, ...) as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositorySummary {
    #[serde(alias = "APIURL")]
    pub api_url: String,
    #[serde(alias = "Name")]
    pub name: String,
    /// Canonical web URL; bookmarks are deduplicated on it
    #[serde(alias = "HTMLURL")]
    pub html_url: String,
    #[serde(default, alias = "Language")]
    pub language: Option<String>,
    #[serde(default, alias = "PullsURL", deserialize_with = "null_as_default")]
    pub pulls_url: String,
    #[serde(default, alias = "Count")]
    pub count: u32,
    #[serde(default, alias = "CreatedAt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "Score")]
    pub score: Option<f64>,
    #[serde(default, alias = "RecentIssues", deserialize_with = "null_as_default")]
    pub recent_issues: Vec<IssueRef>,
}

impl RepositorySummary {
    pub fn language_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.language.as_deref() {
            Some(lang) if !lang.is_empty() => lang,
            _ => fallback,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequestSummary {
    pub number: u64,
    pub title: String,
    pub html_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitSummary {
    pub sha: String,
    pub message: String,
    pub author: String,
}

impl CommitSummary {
    pub fn short_sha(&self) -> &str {
        let end = self
            .sha
            .char_indices()
            .nth(7)
            .map(|(i, _)| i)
            .unwrap_or(self.sha.len());
        &self.sha[..end]
    }

    /// First line of the message
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    /// First non-blank line after the subject
    pub fn body_line(&self) -> Option<&str> {
        self.message
            .lines()
            .skip(1)
            .map(str::trim)
            .find(|line| !line.is_empty())
    }
}
