use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;

use crate::list::{truncate, EntryList, ListEntry};
use crate::theme::Theme;

/// Draw one page of `list`, or `empty` when it holds nothing
pub fn render<T: ListEntry>(
    frame: &mut Frame,
    list: &EntryList<T>,
    title: &str,
    title_style: Style,
    empty: &[&str],
    theme: &Theme,
    area: Rect,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(title.to_string(), title_style));

    if list.is_empty() {
        let mut lines = vec![Line::from("")];
        for (i, text) in empty.iter().enumerate() {
            let style = if i == 0 { theme.header } else { theme.body };
            lines.push(Line::from(Span::styled(*text, style)));
            lines.push(Line::from(""));
        }
        frame.render_widget(Paragraph::new(lines).block(block), area);
        return;
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    frame.render_widget(Paragraph::new(filter_line(list, theme)), chunks[0]);

    // Room for a description line inside the borders, after the indent
    let desc_max = (list.width() as usize).saturating_sub(4).max(20);

    let items: Vec<ListItem> = list
        .page()
        .map(|(pos, entry)| {
            let is_selected = pos == list.cursor();
            let (marker, title_style, desc_style) = if is_selected {
                ("> ", theme.selected, theme.detail)
            } else {
                ("  ", theme.row_color(pos), theme.body)
            };

            let mut lines = vec![Line::from(vec![
                Span::styled(marker, theme.selected),
                Span::styled(entry.title(), title_style),
            ])];
            lines.extend(entry.description().into_iter().map(|d| {
                Line::from(Span::styled(
                    format!("  {}", truncate(&d, desc_max)),
                    desc_style,
                ))
            }));
            while lines.len() < T::ROW_HEIGHT {
                lines.push(Line::from(""));
            }

            let item = ListItem::new(lines);
            if is_selected {
                item.style(theme.selected_bg)
            } else {
                item
            }
        })
        .collect();

    frame.render_widget(List::new(items), chunks[1]);
}

fn filter_line<'a, T: ListEntry>(list: &EntryList<T>, theme: &Theme) -> Line<'a> {
    if list.is_filtering() {
        Line::from(vec![
            Span::styled("Filter: ", theme.filter),
            Span::styled(format!("{}│", list.filter()), theme.detail),
        ])
    } else if list.has_filter() {
        Line::from(vec![
            Span::styled(format!("Filter: {}", list.filter()), theme.filter),
            Span::styled(
                format!("  ({}/{})", list.visible_len(), list.items().len()),
                theme.help,
            ),
        ])
    } else {
        let (page, pages) = list.page_position();
        Line::from(Span::styled(
            format!("{} items  page {}/{}", list.items().len(), page, pages),
            theme.help,
        ))
    }
}
