use crossterm::event::KeyEvent;

use crate::fetch::{Completion, FetchKind};

/// Edit applied to the add-bookmark text buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEdit {
    Insert(char),
    Backspace,
    Left,
    Right,
    Home,
    End,
}

#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    Back,
    /// Jump straight to the ranked list from a result screen
    ToRepoList,
    Select,
    Tick,
    Resize(u16, u16),

    // Bookmarks
    OpenBookmarks,
    AddBookmark,
    DeleteBookmark,
    SubmitBookmark,
    CancelBookmark,
    Input(InputEdit),

    // Repo detail requests
    Fetch(FetchKind),

    /// Key forwarded to the active list widget
    ListKey(KeyEvent),

    /// A background fetch finished
    Completed {
        request_id: u64,
        completion: Completion,
    },

    None,
}
