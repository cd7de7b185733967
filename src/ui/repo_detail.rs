use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::{App, StatusKind};
use crate::theme::Theme;

pub fn render(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let Some(repo) = &app.selected else {
        let empty = Paragraph::new("No repository selected")
            .block(Block::default().borders(Borders::ALL))
            .style(theme.body);
        frame.render_widget(empty, area);
        return;
    };

    let created = repo
        .created_at
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("Issues in last week: ", theme.detail),
            Span::styled(repo.count.to_string(), theme.count),
        ]),
        Line::from(vec![
            Span::styled("Primary Language: ", theme.detail),
            Span::styled(repo.language_or("Not specified").to_string(), theme.language),
        ]),
        Line::from(vec![
            Span::styled("Repository URL: ", theme.detail),
            Span::styled(repo.html_url.clone(), theme.url),
        ]),
        Line::from(vec![
            Span::styled("Created: ", theme.detail),
            Span::styled(created, theme.body),
        ]),
    ];

    if let Some(issue) = repo.recent_issues.first() {
        lines.push(Line::from(vec![
            Span::styled("Latest issue: ", theme.detail),
            Span::styled(format!("#{} {}", issue.number, issue.title), theme.body),
        ]));
    }

    lines.push(Line::from(""));
    match &app.status {
        Some(status) if status.kind == StatusKind::Loading && app.loading => {
            lines.push(Line::from(Span::styled(status.text.clone(), theme.body)));
            lines.push(Line::from(Span::styled(
                super::loading_indicator(app.spinner),
                theme.loading,
            )));
        }
        Some(status) if status.kind == StatusKind::Error => {
            lines.push(Line::from(Span::styled(status.text.clone(), theme.error)));
        }
        Some(status) => {
            lines.push(Line::from(Span::styled(status.text.clone(), theme.success)));
        }
        None => {}
    }

    let detail = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(format!(" {} ", repo.name), theme.header)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(detail, area);
}
