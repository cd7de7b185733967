//! Scrollable, filterable lists backing the four list screens.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::types::{CommitSummary, PullRequestSummary, RepositorySummary};

/// Maximum displayed title length, ellipsis included
pub const TITLE_MAX: usize = 60;
const DESCRIPTION_MAX: usize = 80;
const ELLIPSIS: &str = "...";

/// Truncate to at most `max` characters, ending in `...` when shortened
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(ELLIPSIS.len());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

/// What a list needs to know about the records it shows
pub trait ListEntry {
    /// Rows one entry occupies on screen, spacing included
    const ROW_HEIGHT: usize = 2;

    fn title(&self) -> String;
    /// One or two description lines
    fn description(&self) -> Vec<String>;
    /// Text the live filter matches against
    fn filter_key(&self) -> &str;
}

impl ListEntry for RepositorySummary {
    fn title(&self) -> String {
        truncate(&self.name, TITLE_MAX)
    }

    fn description(&self) -> Vec<String> {
        vec![format!("{} issues • {}", self.count, self.language_or("N/A"))]
    }

    fn filter_key(&self) -> &str {
        &self.name
    }
}

impl ListEntry for PullRequestSummary {
    const ROW_HEIGHT: usize = 3;

    fn title(&self) -> String {
        format!("#{}: {}", self.number, truncate(&self.title, TITLE_MAX))
    }

    fn description(&self) -> Vec<String> {
        vec![self.html_url.clone()]
    }

    fn filter_key(&self) -> &str {
        &self.title
    }
}

impl ListEntry for CommitSummary {
    const ROW_HEIGHT: usize = 3;

    fn title(&self) -> String {
        format!("{}: {}", self.short_sha(), truncate(self.subject(), TITLE_MAX))
    }

    fn description(&self) -> Vec<String> {
        let mut lines = vec![format!("by {}", self.author)];
        if let Some(body) = self.body_line() {
            lines.push(truncate(body, DESCRIPTION_MAX));
        }
        lines
    }

    fn filter_key(&self) -> &str {
        &self.message
    }
}

/// Items plus cursor, filter and viewport for one list screen.
///
/// The cursor indexes the visible (filtered) items.
#[derive(Debug, Clone)]
pub struct EntryList<T> {
    items: Vec<T>,
    visible: Vec<usize>,
    cursor: usize,
    filter: String,
    filtering: bool,
    width: u16,
    rows: u16,
}

impl<T: ListEntry> Default for EntryList<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T: ListEntry> EntryList<T> {
    pub fn new(items: Vec<T>) -> Self {
        let mut list = Self {
            items,
            visible: Vec::new(),
            cursor: 0,
            filter: String::new(),
            filtering: false,
            width: 0,
            rows: 0,
        };
        list.refilter();
        list
    }

    /// Replace all items; the cursor returns to the top and the filter is kept
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.cursor = 0;
        self.refilter();
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected(&self) -> Option<&T> {
        self.visible.get(self.cursor).map(|&i| &self.items[i])
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn is_filtering(&self) -> bool {
        self.filtering
    }

    pub fn has_filter(&self) -> bool {
        !self.filter.is_empty()
    }

    pub fn set_size(&mut self, width: u16, rows: u16) {
        self.width = width;
        self.rows = rows;
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    /// Entries that fit in the viewport
    pub fn per_page(&self) -> usize {
        (self.rows as usize / T::ROW_HEIGHT).max(1)
    }

    /// Visible entries on the cursor's page, with their position in the visible list
    pub fn page(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        let per_page = self.per_page();
        let start = (self.cursor / per_page) * per_page;
        self.visible
            .iter()
            .enumerate()
            .skip(start)
            .take(per_page)
            .map(move |(pos, &i)| (pos, &self.items[i]))
    }

    /// Current page and page count, both 1-based
    pub fn page_position(&self) -> (usize, usize) {
        let per_page = self.per_page();
        let pages = self.visible.len().div_ceil(per_page).max(1);
        (self.cursor / per_page + 1, pages)
    }

    pub fn clear_filter(&mut self) {
        self.filter.clear();
        self.filtering = false;
        self.refilter();
    }

    fn refilter(&mut self) {
        let needle = self.filter.to_lowercase();
        self.visible = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| needle.is_empty() || item.filter_key().to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect();
        self.cursor = self.cursor.min(self.visible.len().saturating_sub(1));
    }

    fn move_by(&mut self, delta: isize) {
        if self.visible.is_empty() {
            return;
        }
        let last = self.visible.len() - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
    }

    /// Apply navigation or filter keys. Returns whether the key was consumed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.filtering {
            match key.code {
                KeyCode::Esc => self.clear_filter(),
                KeyCode::Enter => self.filtering = false,
                KeyCode::Backspace => {
                    self.filter.pop();
                    self.cursor = 0;
                    self.refilter();
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.filter.push(c);
                    self.cursor = 0;
                    self.refilter();
                }
                _ => {}
            }
            return true;
        }

        let page = self.per_page() as isize;
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.move_by(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_by(-1),
            KeyCode::PageDown => self.move_by(page),
            KeyCode::PageUp => self.move_by(-page),
            KeyCode::Home | KeyCode::Char('g') => self.cursor = 0,
            KeyCode::End | KeyCode::Char('G') => {
                self.cursor = self.visible.len().saturating_sub(1);
            }
            KeyCode::Char('/') => self.filtering = true,
            KeyCode::Esc if self.has_filter() => self.clear_filter(),
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn pr(number: u64, title: &str) -> PullRequestSummary {
        PullRequestSummary {
            number,
            title: title.to_string(),
            html_url: format!("https://github.com/a/b/pull/{}", number),
        }
    }

    fn prs(titles: &[&str]) -> EntryList<PullRequestSummary> {
        EntryList::new(
            titles
                .iter()
                .enumerate()
                .map(|(i, t)| pr(i as u64 + 1, t))
                .collect(),
        )
    }

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate("short", 60), "short");
        assert_eq!(truncate(&"x".repeat(60), 60), "x".repeat(60));
    }

    #[test]
    fn long_pr_title_is_truncated_with_ellipsis() {
        let long = "a".repeat(80);
        let shown = truncate(&long, TITLE_MAX);
        assert_eq!(shown.chars().count(), 60);
        assert!(shown.ends_with("..."));

        let title = pr(7, &long).title();
        assert_eq!(title, format!("#7: {}", shown));
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        let text = "é".repeat(70);
        let shown = truncate(&text, 60);
        assert_eq!(shown.chars().count(), 60);
    }

    #[test]
    fn commit_entry_uses_subject_and_body() {
        let commit = CommitSummary {
            sha: "abcdef0123".to_string(),
            message: "Add cache\n\nSpeeds up lookups".to_string(),
            author: "ferris".to_string(),
        };
        assert_eq!(commit.title(), "abcdef0: Add cache");
        assert_eq!(
            commit.description(),
            vec!["by ferris".to_string(), "Speeds up lookups".to_string()]
        );
        assert_eq!(commit.filter_key(), "Add cache\n\nSpeeds up lookups");
    }

    #[test]
    fn repo_entry_description_falls_back_for_language() {
        let repo = RepositorySummary {
            api_url: String::new(),
            name: "tokio".to_string(),
            html_url: String::new(),
            language: None,
            pulls_url: String::new(),
            count: 12,
            created_at: None,
            score: None,
            recent_issues: Vec::new(),
        };
        assert_eq!(repo.description(), vec!["12 issues • N/A".to_string()]);
    }

    #[test]
    fn cursor_moves_within_bounds() {
        let mut list = prs(&["one", "two", "three"]);
        assert!(list.handle_key(key(KeyCode::Up)));
        assert_eq!(list.cursor(), 0);

        list.handle_key(key(KeyCode::Char('j')));
        list.handle_key(key(KeyCode::Down));
        list.handle_key(key(KeyCode::Down));
        assert_eq!(list.cursor(), 2);

        list.handle_key(key(KeyCode::Char('g')));
        assert_eq!(list.cursor(), 0);
        list.handle_key(key(KeyCode::End));
        assert_eq!(list.selected().unwrap().title, "three");
    }

    #[test]
    fn filter_is_case_insensitive_and_selects_underlying_item() {
        let mut list = prs(&["Fix parser", "Add docs", "fix CI"]);
        list.handle_key(key(KeyCode::Char('/')));
        assert!(list.is_filtering());
        for c in "FIX".chars() {
            list.handle_key(key(KeyCode::Char(c)));
        }
        list.handle_key(key(KeyCode::Enter));

        assert!(!list.is_filtering());
        assert_eq!(list.visible_len(), 2);
        list.handle_key(key(KeyCode::Down));
        assert_eq!(list.selected().unwrap().number, 3);
    }

    #[test]
    fn keys_go_to_filter_while_editing() {
        let mut list = prs(&["alpha", "beta"]);
        list.handle_key(key(KeyCode::Char('/')));
        list.handle_key(key(KeyCode::Char('j')));
        assert_eq!(list.filter(), "j");
        assert_eq!(list.visible_len(), 0);
        assert!(list.selected().is_none());

        list.handle_key(key(KeyCode::Backspace));
        assert_eq!(list.visible_len(), 2);
    }

    #[test]
    fn esc_clears_accepted_filter_then_is_unhandled() {
        let mut list = prs(&["alpha", "beta"]);
        list.handle_key(key(KeyCode::Char('/')));
        list.handle_key(key(KeyCode::Char('b')));
        list.handle_key(key(KeyCode::Enter));

        assert!(list.handle_key(key(KeyCode::Esc)));
        assert!(!list.has_filter());
        assert_eq!(list.visible_len(), 2);
        assert!(!list.handle_key(key(KeyCode::Esc)));
    }

    #[test]
    fn set_items_resets_cursor_and_keeps_filter() {
        let mut list = prs(&["fix a", "fix b"]);
        list.handle_key(key(KeyCode::Char('/')));
        list.handle_key(key(KeyCode::Char('b')));
        list.handle_key(key(KeyCode::Enter));

        list.set_items(vec![pr(1, "b one"), pr(2, "other"), pr(3, "b two")]);
        assert_eq!(list.cursor(), 0);
        assert_eq!(list.filter(), "b");
        assert_eq!(list.visible_len(), 2);
    }

    #[test]
    fn paging_follows_viewport_height() {
        let titles: Vec<String> = (0..10).map(|i| format!("pr {}", i)).collect();
        let refs: Vec<&str> = titles.iter().map(String::as_str).collect();
        let mut list = prs(&refs);
        list.set_size(80, 9); // three rows per pull request

        assert_eq!(list.per_page(), 3);
        assert_eq!(list.page().count(), 3);
        assert_eq!(list.page_position(), (1, 4));

        list.handle_key(key(KeyCode::PageDown));
        assert_eq!(list.cursor(), 3);
        let first = list.page().next().unwrap();
        assert_eq!(first.0, 3);
        assert_eq!(list.page_position(), (2, 4));
    }

    #[test]
    fn unknown_keys_are_not_consumed() {
        let mut list = prs(&["a"]);
        assert!(!list.handle_key(key(KeyCode::Char('x'))));
        assert!(!list.handle_key(key(KeyCode::Enter)));
    }
}
