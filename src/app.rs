use std::future::Future;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;
use tracing::debug;

use crate::action::{Action, InputEdit};
use crate::event::Event;
use crate::fetch::{self, Completion, FetchKind, HealthCheck};
use crate::list::EntryList;
use crate::source::RepoSource;
use crate::store::BookmarkStore;
use crate::types::{CommitSummary, PullRequestSummary, RepositorySummary};

/// Rows a list screen spends on header, footer, borders and the filter line
pub const LIST_CHROME: u16 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    RepoList,     // Ranked repositories
    RepoDetail,   // One repository, launches fetches
    PullRequests, // Recent pull requests of the selected repo
    Commits,      // Recent commits of the selected repo
    Bookmarks,    // Persisted bookmarks
    AddBookmark,  // URL entry for a new bookmark
    HealthCheck,  // Output of the health-check script
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Loading,
    Error,
    Success,
}

/// Text shown under the current screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub text: String,
}

impl Status {
    fn new(kind: StatusKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// The request the loading gate is currently held for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingFetch {
    pub id: u64,
    pub kind: FetchKind,
}

/// Single-line text buffer; the cursor counts characters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    buffer: String,
    cursor: usize,
}

impl TextInput {
    pub fn value(&self) -> &str {
        &self.buffer
    }

    fn byte_index(&self) -> usize {
        self.buffer
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.buffer.len())
    }

    /// Buffer split at the cursor
    pub fn split(&self) -> (&str, &str) {
        self.buffer.split_at(self.byte_index())
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    pub fn apply(&mut self, edit: InputEdit) {
        let len = self.buffer.chars().count();
        match edit {
            InputEdit::Insert(c) => {
                let at = self.byte_index();
                self.buffer.insert(at, c);
                self.cursor += 1;
            }
            InputEdit::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_index();
                    self.buffer.remove(at);
                }
            }
            InputEdit::Left => self.cursor = self.cursor.saturating_sub(1),
            InputEdit::Right => self.cursor = (self.cursor + 1).min(len),
            InputEdit::Home => self.cursor = 0,
            InputEdit::End => self.cursor = len,
        }
    }
}

pub struct App {
    pub screen: Screen,

    // List widgets, one per list screen
    pub repo_list: EntryList<RepositorySummary>,
    pub bookmark_list: EntryList<RepositorySummary>,
    pub pr_list: EntryList<PullRequestSummary>,
    pub commit_list: EntryList<CommitSummary>,

    /// Repository shown on the detail, pull request, commit and health screens
    pub selected: Option<RepositorySummary>,
    pub health_output: String,

    pub input: TextInput,
    pub loading: bool,
    pub status: Option<Status>,
    pub spinner: usize,
    pub should_quit: bool,
    /// Look-back window the ranked list was built from
    pub window_days: u32,

    pending: Option<PendingFetch>,
    next_request_id: u64,
    list_limit: u8,
    source: Arc<dyn RepoSource>,
    health: HealthCheck,
    store: BookmarkStore,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl App {
    pub fn new(
        repos: Vec<RepositorySummary>,
        source: Arc<dyn RepoSource>,
        store: BookmarkStore,
        health: HealthCheck,
        list_limit: u8,
        window_days: u32,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        let bookmarks = store.load();
        debug!(path = %store.path().display(), count = bookmarks.len(), "bookmarks loaded");

        Self {
            screen: Screen::RepoList,
            repo_list: EntryList::new(repos),
            bookmark_list: EntryList::new(bookmarks),
            pr_list: EntryList::default(),
            commit_list: EntryList::default(),
            selected: None,
            health_output: String::new(),
            input: TextInput::default(),
            loading: false,
            status: None,
            spinner: 0,
            should_quit: false,
            window_days,
            pending: None,
            next_request_id: 0,
            list_limit,
            source,
            health,
            store,
            action_tx,
        }
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Resize(width, height) => Action::Resize(width, height),
            Event::Tick => Action::Tick,
            Event::Init | Event::Render => Action::None,
        }
    }

    /// Whether the active list is taking keystrokes for its filter
    fn list_filtering(&self) -> bool {
        match self.screen {
            Screen::RepoList => self.repo_list.is_filtering(),
            Screen::Bookmarks => self.bookmark_list.is_filtering(),
            Screen::PullRequests => self.pr_list.is_filtering(),
            Screen::Commits => self.commit_list.is_filtering(),
            _ => false,
        }
    }

    fn list_has_filter(&self) -> bool {
        match self.screen {
            Screen::RepoList => self.repo_list.has_filter(),
            Screen::Bookmarks => self.bookmark_list.has_filter(),
            Screen::PullRequests => self.pr_list.has_filter(),
            Screen::Commits => self.commit_list.has_filter(),
            _ => false,
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Action {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        if self.screen == Screen::AddBookmark && !self.loading {
            return match key.code {
                KeyCode::Enter => Action::SubmitBookmark,
                KeyCode::Esc => Action::CancelBookmark,
                KeyCode::Backspace => Action::Input(InputEdit::Backspace),
                KeyCode::Left => Action::Input(InputEdit::Left),
                KeyCode::Right => Action::Input(InputEdit::Right),
                KeyCode::Home => Action::Input(InputEdit::Home),
                KeyCode::End => Action::Input(InputEdit::End),
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Action::Input(InputEdit::Insert(c))
                }
                _ => Action::None,
            };
        }

        if self.list_filtering() {
            return Action::ListKey(key);
        }

        match (self.screen, key.code) {
            (_, KeyCode::Char('q')) => Action::Quit,
            (Screen::RepoList | Screen::Bookmarks, KeyCode::Enter) => Action::Select,
            (Screen::RepoList, KeyCode::Char('b')) => Action::OpenBookmarks,
            (Screen::RepoDetail, KeyCode::Char('b')) => Action::Back,
            (
                Screen::PullRequests | Screen::Commits | Screen::HealthCheck,
                KeyCode::Char('b'),
            ) => Action::ToRepoList,
            (Screen::Bookmarks, KeyCode::Char('a')) => Action::AddBookmark,
            (Screen::Bookmarks, KeyCode::Char('d') | KeyCode::Delete) => Action::DeleteBookmark,
            (Screen::RepoDetail, KeyCode::Char('p')) => Action::Fetch(FetchKind::PullRequests),
            (Screen::RepoDetail, KeyCode::Char('c')) => Action::Fetch(FetchKind::Commits),
            (Screen::RepoDetail, KeyCode::Char('h')) => Action::Fetch(FetchKind::HealthCheck),
            (_, KeyCode::Esc) if !self.list_has_filter() => Action::Back,
            (Screen::RepoList | Screen::Bookmarks | Screen::PullRequests | Screen::Commits, _) => {
                Action::ListKey(key)
            }
            _ => Action::None,
        }
    }

    pub fn update(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::Back => match self.screen {
                Screen::RepoList => {}
                Screen::RepoDetail => {
                    self.abandon_pending();
                    self.status = None;
                    self.screen = Screen::RepoList;
                }
                Screen::PullRequests | Screen::Commits | Screen::HealthCheck => {
                    self.screen = Screen::RepoDetail;
                }
                Screen::Bookmarks => {
                    self.status = None;
                    self.screen = Screen::RepoList;
                }
                Screen::AddBookmark => self.cancel_bookmark(),
            },
            Action::ToRepoList => {
                if matches!(
                    self.screen,
                    Screen::PullRequests | Screen::Commits | Screen::HealthCheck
                ) {
                    self.status = None;
                    self.screen = Screen::RepoList;
                }
            }
            Action::Select => {
                let repo = match self.screen {
                    Screen::RepoList => self.repo_list.selected(),
                    Screen::Bookmarks => self.bookmark_list.selected(),
                    _ => None,
                };
                if let Some(repo) = repo.cloned() {
                    self.selected = Some(repo);
                    self.status = None;
                    self.screen = Screen::RepoDetail;
                }
            }
            Action::Tick => {
                self.spinner = self.spinner.wrapping_add(1);
            }
            Action::Resize(width, height) => self.resize(width, height),

            // Bookmarks
            Action::OpenBookmarks => {
                if self.screen == Screen::RepoList {
                    self.screen = Screen::Bookmarks;
                }
            }
            Action::AddBookmark => {
                if self.screen == Screen::Bookmarks {
                    self.input.clear();
                    self.status = None;
                    self.screen = Screen::AddBookmark;
                }
            }
            Action::DeleteBookmark => {
                if self.screen == Screen::Bookmarks {
                    self.delete_selected_bookmark();
                }
            }
            Action::SubmitBookmark => {
                if self.screen == Screen::AddBookmark {
                    self.submit_bookmark();
                }
            }
            Action::CancelBookmark => {
                if self.screen == Screen::AddBookmark {
                    self.cancel_bookmark();
                }
            }
            Action::Input(edit) => {
                if self.screen == Screen::AddBookmark && !self.loading {
                    self.input.apply(edit);
                }
            }

            Action::Fetch(kind) => {
                if self.screen == Screen::RepoDetail {
                    self.fetch_for_selected(kind);
                }
            }

            Action::ListKey(key) => {
                match self.screen {
                    Screen::RepoList => self.repo_list.handle_key(key),
                    Screen::Bookmarks => self.bookmark_list.handle_key(key),
                    Screen::PullRequests => self.pr_list.handle_key(key),
                    Screen::Commits => self.commit_list.handle_key(key),
                    _ => false,
                };
            }

            Action::Completed {
                request_id,
                completion,
            } => self.complete(request_id, completion),

            Action::None => {}
        }
    }

    /// Keep every list in step with the terminal, visible or not
    fn resize(&mut self, width: u16, height: u16) {
        let rows = height.saturating_sub(LIST_CHROME);
        self.repo_list.set_size(width, rows);
        self.bookmark_list.set_size(width, rows);
        self.pr_list.set_size(width, rows);
        self.commit_list.set_size(width, rows);
    }

    fn reload_bookmarks(&mut self) {
        self.bookmark_list.set_items(self.store.load());
    }

    fn delete_selected_bookmark(&mut self) {
        let Some(bookmark) = self.bookmark_list.selected().cloned() else {
            return;
        };
        let result = self.store.remove(&bookmark.html_url);
        self.reload_bookmarks();
        self.status = Some(match result {
            Ok(_) => Status::new(
                StatusKind::Success,
                format!("Removed bookmark {}", bookmark.name),
            ),
            Err(e) => Status::new(StatusKind::Error, format!("Bookmark not removed: {}", e)),
        });
    }

    fn submit_bookmark(&mut self) {
        if self.loading {
            return;
        }
        let url = self.input.value().trim().to_string();
        if url.is_empty() {
            return;
        }
        let source = Arc::clone(&self.source);
        self.spawn_fetch(
            FetchKind::BookmarkRepo,
            "Loading repository details...",
            fetch::bookmark_repo(source, url),
        );
    }

    fn cancel_bookmark(&mut self) {
        self.abandon_pending();
        self.input.clear();
        self.status = None;
        self.screen = Screen::Bookmarks;
    }

    fn fetch_for_selected(&mut self, kind: FetchKind) {
        if self.loading {
            debug!(?kind, pending = ?self.pending, "fetch ignored, another request is pending");
            return;
        }
        let Some(repo) = &self.selected else {
            return;
        };

        let source = Arc::clone(&self.source);
        match kind {
            FetchKind::PullRequests => {
                let work = fetch::pull_requests(source, repo.pulls_url.clone(), self.list_limit);
                self.spawn_fetch(kind, "Loading pull requests...", work);
            }
            FetchKind::Commits => {
                let work = fetch::commits(source, repo.api_url.clone(), self.list_limit);
                self.spawn_fetch(kind, "Loading commits...", work);
            }
            FetchKind::HealthCheck => {
                let work = fetch::health_check(self.health.clone(), repo.html_url.clone());
                self.spawn_fetch(kind, "Running repository health check...", work);
            }
            FetchKind::BookmarkRepo => {}
        }
    }

    /// Take the loading gate and run `work` in the background
    fn spawn_fetch<F>(&mut self, kind: FetchKind, message: &str, work: F)
    where
        F: Future<Output = Completion> + Send + 'static,
    {
        self.next_request_id += 1;
        let request_id = self.next_request_id;
        self.pending = Some(PendingFetch {
            id: request_id,
            kind,
        });
        self.loading = true;
        self.status = Some(Status::new(StatusKind::Loading, message));
        debug!(request_id, ?kind, "fetch issued");

        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let completion = work.await;
            tx.send(Action::Completed {
                request_id,
                completion,
            })
            .ok();
        });
    }

    /// Release the loading gate without waiting; the completion will be discarded
    fn abandon_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!(request_id = pending.id, kind = ?pending.kind, "pending fetch abandoned");
        }
        self.loading = false;
    }

    fn complete(&mut self, request_id: u64, completion: Completion) {
        match self.pending {
            Some(pending) if pending.id == request_id && pending.kind == completion.kind() => {}
            _ => {
                debug!(request_id, kind = ?completion.kind(), "stale completion discarded");
                return;
            }
        }
        self.pending = None;
        self.loading = false;

        match completion {
            Completion::PullRequests(Ok(prs)) => {
                self.pr_list.set_items(prs);
                self.status = None;
                self.screen = Screen::PullRequests;
            }
            Completion::PullRequests(Err(e)) => {
                self.fail(format!("Error loading pull requests: {}", e));
            }
            Completion::Commits(Ok(commits)) => {
                self.commit_list.set_items(commits);
                self.status = None;
                self.screen = Screen::Commits;
            }
            Completion::Commits(Err(e)) => {
                self.fail(format!("Error loading commits: {}", e));
            }
            Completion::HealthCheck(Ok(output)) => {
                self.health_output = output;
                self.status = None;
                self.screen = Screen::HealthCheck;
            }
            Completion::HealthCheck(Err(e)) => {
                self.fail(format!("Health check failed: {}", e));
            }
            Completion::BookmarkRepo(Ok(repo)) => {
                let text = match self.store.add(&repo) {
                    Ok(true) => format!("Successfully bookmarked {}!", repo.name),
                    Ok(false) => format!("{} is already bookmarked", repo.name),
                    Err(e) => {
                        self.fail(format!("Bookmark not saved: {}", e));
                        return;
                    }
                };
                self.reload_bookmarks();
                self.input.clear();
                self.status = Some(Status::new(StatusKind::Success, text));
                self.screen = Screen::Bookmarks;
            }
            Completion::BookmarkRepo(Err(e)) => {
                self.fail(format!("Error loading repository: {}", e));
            }
        }
    }

    fn fail(&mut self, text: String) {
        self.status = Some(Status::new(StatusKind::Error, text));
    }
}
