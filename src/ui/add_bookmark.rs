use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::{App, StatusKind};
use crate::theme::Theme;

pub fn render(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let mut lines = vec![Line::from("")];

    if app.loading {
        let text = app
            .status
            .as_ref()
            .map(|s| s.text.clone())
            .unwrap_or_default();
        lines.push(Line::from(Span::styled(text, theme.body)));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            super::loading_indicator(app.spinner),
            theme.loading,
        )));
    } else {
        let (before, after) = app.input.split();
        lines.push(Line::from(Span::styled(
            "Enter GitHub repository URL (e.g., https://github.com/owner/repo):",
            theme.body,
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(before.to_string(), theme.detail),
            Span::styled("│", theme.selected),
            Span::styled(after.to_string(), theme.detail),
        ]));

        if let Some(status) = app.status.as_ref().filter(|s| s.kind == StatusKind::Error) {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(status.text.clone(), theme.error)));
        }
    }

    let form = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(" Add Repository Bookmark ", theme.bookmark_list_title)),
    );
    frame.render_widget(form, area);
}
