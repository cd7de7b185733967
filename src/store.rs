use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::types::RepositorySummary;

/// On-disk layout: `{"bookmarks": [...]}`
#[derive(Debug, Default, Serialize, Deserialize)]
struct BookmarkDatabase {
    #[serde(default)]
    bookmarks: Vec<RepositorySummary>,
}

/// JSON file holding the bookmark collection.
///
/// Every mutation re-reads the file first, so the file is the only source of truth.
/// There is no locking: another process writing the same file concurrently wins or
/// loses depending on who writes last.
#[derive(Debug, Clone)]
pub struct BookmarkStore {
    path: PathBuf,
}

impl BookmarkStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all bookmarks. Missing, unreadable or corrupt files yield an empty list.
    pub fn load(&self) -> Vec<RepositorySummary> {
        if !self.path.exists() {
            return Vec::new();
        }

        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read bookmark database");
                return Vec::new();
            }
        };

        match serde_json::from_str::<BookmarkDatabase>(&data) {
            Ok(db) => db.bookmarks,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to parse bookmark database");
                Vec::new()
            }
        }
    }

    /// Overwrite the file with the given collection
    pub fn save(&self, bookmarks: &[RepositorySummary]) -> Result<()> {
        self.try_save(bookmarks).map_err(|e| {
            warn!(path = %self.path.display(), error = %e, "failed to write bookmark database");
            e
        })
    }

    fn try_save(&self, bookmarks: &[RepositorySummary]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let db = BookmarkDatabase {
            bookmarks: bookmarks.to_vec(),
        };
        let data = serde_json::to_string_pretty(&db)?;
        std::fs::write(&self.path, data)?;
        Ok(())
    }

    /// Append `repo` unless a bookmark with the same web URL exists.
    /// Returns whether it was added; a failed write is an error.
    pub fn add(&self, repo: &RepositorySummary) -> Result<bool> {
        let mut bookmarks = self.load();
        if bookmarks.iter().any(|b| b.html_url == repo.html_url) {
            debug!(url = %repo.html_url, "already bookmarked");
            return Ok(false);
        }
        bookmarks.push(repo.clone());
        self.save(&bookmarks)?;
        Ok(true)
    }

    /// Drop the first bookmark with the given web URL. Returns whether one was removed;
    /// the file is left alone when nothing matched.
    pub fn remove(&self, html_url: &str) -> Result<bool> {
        let mut bookmarks = self.load();
        let Some(pos) = bookmarks.iter().position(|b| b.html_url == html_url) else {
            return Ok(false);
        };
        bookmarks.remove(pos);
        self.save(&bookmarks)?;
        Ok(true)
    }
}
