use ratatui::{
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use tree_rows::ItemKind;

use crate::app::App;

/// Render the tree view plus a one-line status bar.
pub fn render(app: &mut App, frame: &mut Frame) {
    let [tree_area, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

    let visible_height = tree_area.height.saturating_sub(2) as usize;
    app.update_scroll(visible_height);

    let mut lines: Vec<Line> = Vec::with_capacity(visible_height);
    let end = (app.scroll + visible_height).min(app.index.row_count());
    for row in app.scroll..end {
        let r = app.index.row_at(row);

        let marker = if r.has_children {
            if r.expanded {
                "▾ "
            } else {
                "▸ "
            }
        } else {
            "  "
        };

        let style = match r.item.kind() {
            ItemKind::Header => Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            ItemKind::Project => Style::default().fg(Color::Magenta),
            ItemKind::File if r.has_children => Style::default().fg(Color::Cyan),
            _ => Style::default(),
        };
        let style = if row == app.selected {
            style.add_modifier(Modifier::REVERSED)
        } else {
            style
        };

        lines.push(Line::from(Span::styled(
            format!("{}{marker}{}", "  ".repeat(r.indent), r.item.display_text()),
            style,
        )));
    }

    let block = Block::default().title(" tree ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(Text::from(lines)).block(block), tree_area);

    let kind = if app.index.row_count() > 0 {
        app.index.row_at(app.selected).item.kind().as_str()
    } else {
        ""
    };
    let status = Line::from(vec![
        Span::styled(
            format!(" {}/{} ", app.selected + 1, app.index.row_count()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("{kind} "), Style::default().fg(Color::DarkGray)),
        Span::raw(app.status.as_str()),
    ]);
    frame.render_widget(Paragraph::new(status), status_area);
}
