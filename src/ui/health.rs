use ratatui::layout::Rect;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::App;
use crate::theme::Theme;

pub fn render(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let name = super::selected_name(app);

    let mut lines = vec![
        Line::from(Span::styled(
            format!("Health Check Results for {}", name),
            theme.header,
        )),
        Line::from(""),
    ];
    lines.extend(
        Text::raw(app.health_output.as_str())
            .lines
            .into_iter()
            .map(|l| l.style(theme.detail)),
    );

    let output = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    frame.render_widget(output, area);
}
