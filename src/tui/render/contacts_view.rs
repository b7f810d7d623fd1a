use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::render::view::ContactRow;
use crate::tui::app::App;
use crate::util::text::truncate_to_width;

/// Contact list grouped by letter on the left, the selected contact on the
/// right
pub fn render_contacts_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let list = app.contact_list();

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let width = chunks[0].width.saturating_sub(3) as usize;
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut selected_line = 0;
    let mut index = 0;
    for group in &list.groups {
        lines.push(Line::from(Span::styled(
            format!(" {}", group.letter),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        )));
        for row in &group.contacts {
            let selected = index == app.contact_row;
            if selected {
                selected_line = lines.len();
            }
            lines.push(contact_line(app, row, width, selected));
            index += 1;
        }
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            " No contacts yet",
            Style::default().fg(app.theme.dim).bg(bg),
        )));
    }

    let height = chunks[0].height as usize;
    let scroll = (selected_line + 1).saturating_sub(height);
    frame.render_widget(
        Paragraph::new(lines)
            .style(Style::default().bg(bg))
            .scroll((scroll as u16, 0)),
        chunks[0],
    );

    if let Some(row) = list.rows().nth(app.contact_row) {
        render_contact_card(frame, app, chunks[1], row);
    }
}

fn contact_line(app: &App, row: &ContactRow, width: usize, selected: bool) -> Line<'static> {
    let bg = if selected {
        app.theme.selection_bg
    } else {
        app.theme.background
    };
    let mut name = row.avatar.name.clone();
    if row.is_you {
        name.push_str(" (You)");
    }
    Line::from(vec![
        Span::styled(
            if selected { "\u{258C}" } else { " " },
            Style::default().fg(app.theme.selection_border).bg(bg),
        ),
        Span::styled(
            format!("{:<3}", row.avatar.initials),
            Style::default()
                .fg(app.theme.avatar_color(&row.avatar.color))
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            truncate_to_width(&name, width.saturating_sub(3)),
            Style::default().fg(app.theme.text).bg(bg),
        ),
    ])
}

fn render_contact_card(frame: &mut Frame, app: &App, area: Rect, row: &ContactRow) {
    let bg = app.theme.background;
    let block = Block::default()
        .borders(Borders::LEFT)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let label = Style::default().fg(app.theme.dim).bg(bg);
    let value = Style::default().fg(app.theme.text).bg(bg);
    let phone = if row.phone.is_empty() {
        "-".to_string()
    } else {
        row.phone.clone()
    };
    let lines = vec![
        Line::from(vec![
            Span::styled(
                format!(" {} ", row.avatar.initials),
                Style::default()
                    .fg(app.theme.background)
                    .bg(app.theme.avatar_color(&row.avatar.color))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" {}", row.avatar.name),
                Style::default()
                    .fg(app.theme.text_bright)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::default(),
        Line::from(vec![Span::styled(" Email  ", label), Span::styled(row.email.clone(), value)]),
        Line::from(vec![Span::styled(" Phone  ", label), Span::styled(phone, value)]),
        Line::from(vec![
            Span::styled(" Key    ", label),
            Span::styled(row.avatar.key.clone(), value),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), inner);
}

#[cfg(test)]
mod tests {
    use super::super::test_helpers::*;
    use crate::tui::app::View;

    #[test]
    fn contacts_are_grouped_and_current_user_marked() {
        let mut app = loaded_app();
        app.view = View::Contacts;
        let out = render_app(&app, TERM_W, TERM_H);
        let lines: Vec<&str> = out.lines().collect();
        let a = lines.iter().position(|l| l.starts_with(" A ")).unwrap();
        let b = lines.iter().position(|l| l.starts_with(" B ")).unwrap();
        assert!(a < b);
        assert!(out.contains("Anna Meier (You)"));
        assert!(out.contains("ben klein"));
    }

    #[test]
    fn selected_contact_details_are_shown() {
        let mut app = loaded_app();
        app.view = View::Contacts;
        app.contact_row = 1;
        let out = render_app(&app, TERM_W, TERM_H);
        assert!(out.contains("ben@example.com"));
        assert!(out.contains("Key    BK100"));
        assert!(!out.contains("anna@example.com"));
    }
}
