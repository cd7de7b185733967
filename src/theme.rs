//! Styles used by the renderer.
//!
//! A `Theme` is built once at startup and handed to every render function by reference.

use ratatui::style::{Color, Modifier, Style};

/// Rotating colours for unselected row titles
const ROW_PALETTE: [Color; 12] = [
    Color::Rgb(0xFF, 0x6B, 0x6B),
    Color::Rgb(0x4E, 0xCD, 0xC4),
    Color::Rgb(0x45, 0xB7, 0xD1),
    Color::Rgb(0x96, 0xCE, 0xB4),
    Color::Rgb(0xFF, 0xEA, 0xA7),
    Color::Rgb(0xDD, 0xA0, 0xDD),
    Color::Rgb(0x98, 0xD8, 0xC8),
    Color::Rgb(0xF7, 0xDC, 0x6F),
    Color::Rgb(0xAE, 0xD6, 0xF1),
    Color::Rgb(0xD7, 0xBD, 0xE2),
    Color::Rgb(0xA9, 0xDF, 0xBF),
    Color::Rgb(0xF8, 0xC4, 0x71),
];

#[derive(Debug, Clone)]
pub struct Theme {
    pub header: Style,
    pub repo_list_title: Style,
    pub bookmark_list_title: Style,
    pub pr_list_title: Style,
    pub commit_list_title: Style,
    pub selected: Style,
    pub selected_bg: Style,
    pub body: Style,
    pub detail: Style,
    pub count: Style,
    pub language: Style,
    pub url: Style,
    pub help: Style,
    pub loading: Style,
    pub error: Style,
    pub success: Style,
    pub filter: Style,
    pub status_bar: Style,
    row_palette: [Color; 12],
}

impl Default for Theme {
    fn default() -> Self {
        let banner = |bg: Color| {
            Style::default()
                .bg(bg)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        };

        Self {
            header: Style::default()
                .fg(Color::Rgb(0x4E, 0xCD, 0xC4))
                .add_modifier(Modifier::BOLD),
            repo_list_title: banner(Color::Rgb(0xFF, 0x6B, 0x6B)),
            bookmark_list_title: banner(Color::Rgb(0xE6, 0x7E, 0x22)),
            pr_list_title: banner(Color::Rgb(0x4E, 0xCD, 0xC4)),
            commit_list_title: banner(Color::Rgb(0x9B, 0x59, 0xB6)),
            selected: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            selected_bg: Style::default().bg(Color::DarkGray),
            body: Style::default().fg(Color::Gray),
            detail: Style::default().fg(Color::White),
            count: Style::default()
                .fg(Color::Rgb(0xFF, 0x6B, 0x6B))
                .add_modifier(Modifier::BOLD),
            language: Style::default().fg(Color::Rgb(0x96, 0xCE, 0xB4)),
            url: Style::default()
                .fg(Color::Rgb(0xAE, 0xD6, 0xF1))
                .add_modifier(Modifier::UNDERLINED),
            help: Style::default().fg(Color::DarkGray),
            loading: Style::default()
                .fg(Color::Rgb(0xFF, 0xA0, 0x7A))
                .add_modifier(Modifier::BOLD),
            error: Style::default().fg(Color::Red),
            success: Style::default().fg(Color::Green),
            filter: Style::default().fg(Color::Yellow),
            status_bar: Style::default().bg(Color::Black),
            row_palette: ROW_PALETTE,
        }
    }
}

impl Theme {
    /// Title colour for an unselected row at `index`
    pub fn row_color(&self, index: usize) -> Style {
        Style::default().fg(self.row_palette[index % self.row_palette.len()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_colors_cycle() {
        let theme = Theme::default();
        assert_eq!(theme.row_color(0), theme.row_color(12));
        assert_ne!(theme.row_color(0), theme.row_color(1));
    }
}
