mod add_bookmark;
mod health;
mod list_view;
mod repo_detail;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{App, Screen, StatusKind};
use crate::theme::Theme;

pub fn render(frame: &mut Frame, app: &App, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, theme, chunks[0]);

    match app.screen {
        Screen::RepoList => list_view::render(
            frame,
            &app.repo_list,
            &repo_list_title(app.window_days),
            theme.repo_list_title,
            &["No repositories with recent issues."],
            theme,
            chunks[1],
        ),
        Screen::Bookmarks => list_view::render(
            frame,
            &app.bookmark_list,
            " Bookmarked Repositories ",
            theme.bookmark_list_title,
            &["No bookmarks yet", "Press 'a' to add your first bookmark!"],
            theme,
            chunks[1],
        ),
        Screen::PullRequests => list_view::render(
            frame,
            &app.pr_list,
            " Recent Pull Requests ",
            theme.pr_list_title,
            &["No recent pull requests found."],
            theme,
            chunks[1],
        ),
        Screen::Commits => list_view::render(
            frame,
            &app.commit_list,
            " Recent Commits ",
            theme.commit_list_title,
            &["No recent commits found."],
            theme,
            chunks[1],
        ),
        Screen::RepoDetail => repo_detail::render(frame, app, theme, chunks[1]),
        Screen::AddBookmark => add_bookmark::render(frame, app, theme, chunks[1]),
        Screen::HealthCheck => health::render(frame, app, theme, chunks[1]),
    }

    render_status_bar(frame, app, theme, chunks[2]);
}

fn repo_list_title(days: u32) -> String {
    let unit = if days == 1 { "Day" } else { "Days" };
    format!(" Top Active Repositories (Last {} {}) ", days, unit)
}

fn selected_name(app: &App) -> &str {
    app.selected
        .as_ref()
        .map(|r| r.name.as_str())
        .unwrap_or("Repository")
}

fn render_header(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let title = match app.screen {
        Screen::RepoList => "hotrepos - Repositories".to_string(),
        Screen::RepoDetail => format!("hotrepos - {}", selected_name(app)),
        Screen::PullRequests => format!("hotrepos - Pull Requests for {}", selected_name(app)),
        Screen::Commits => format!("hotrepos - Commits for {}", selected_name(app)),
        Screen::Bookmarks => "hotrepos - Bookmarks".to_string(),
        Screen::AddBookmark => "hotrepos - Add Repository Bookmark".to_string(),
        Screen::HealthCheck => format!("hotrepos - Health Check for {}", selected_name(app)),
    };

    let header = Paragraph::new(Line::from(Span::styled(title, theme.header)))
        .style(theme.status_bar);
    frame.render_widget(header, area);
}

/// `Loading` followed by one to four dots, advanced by ticks
pub fn loading_indicator(spinner: usize) -> String {
    format!("Loading{}", ".".repeat(spinner % 4 + 1))
}

fn help_text(screen: Screen) -> &'static str {
    match screen {
        Screen::RepoList => "enter: select | b: bookmarks | /: filter | j/k: nav | q: quit",
        Screen::RepoDetail => {
            "p: pull requests | c: commits | h: health check | b/esc: back | q: quit"
        }
        Screen::PullRequests | Screen::Commits => "/: filter | j/k: nav | b: repos | esc: back | q: quit",
        Screen::Bookmarks => {
            "a: add | d: delete | enter: select | /: filter | esc: back | q: quit"
        }
        Screen::AddBookmark => "enter: add | esc: cancel | ctrl+c: quit",
        Screen::HealthCheck => "b: repos | esc: back | q: quit",
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let status = match &app.status {
        Some(status) if status.kind == StatusKind::Loading && app.loading => Line::from(vec![
            Span::styled(status.text.clone(), theme.body),
            Span::raw(" "),
            Span::styled(loading_indicator(app.spinner), theme.loading),
        ]),
        Some(status) if status.kind == StatusKind::Error => {
            Line::from(Span::styled(status.text.clone(), theme.error))
        }
        Some(status) if status.kind == StatusKind::Success => {
            Line::from(Span::styled(status.text.clone(), theme.success))
        }
        _ => Line::from(Span::styled(help_text(app.screen), theme.help)),
    };

    let status_bar = Paragraph::new(status).style(theme.status_bar);
    frame.render_widget(status_bar, area);
}
