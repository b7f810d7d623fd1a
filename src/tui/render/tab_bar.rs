use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::push_right_hint;
use crate::tui::app::{App, View};

/// Render the tab bar: one tab per view and the logged-in user, with a
/// separator line below
pub fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tabs
            Constraint::Length(1), // separator
        ])
        .split(area);

    let bg = app.theme.background;
    let sep = Span::styled("\u{2502}", Style::default().fg(app.theme.dim).bg(bg));

    let mut spans: Vec<Span<'static>> = vec![Span::styled(" ", Style::default().bg(bg))];
    for (i, view) in View::ALL.into_iter().enumerate() {
        if i > 0 {
            spans.push(sep.clone());
        }
        let mut label = format!(" {} ", view.label());
        if view == View::Board && app.query.is_active() {
            label = format!(" {} /{} ", view.label(), app.query.text());
        }
        spans.push(Span::styled(label, tab_style(app, app.view == view)));
    }

    let user = match app.current_user() {
        Some(user) => format!("{} ({}) ", user.name, user.initials()),
        None => format!("{} ", app.user_key),
    };
    push_right_hint(
        &mut spans,
        &user,
        chunks[0].width as usize,
        Style::default().fg(app.theme.dim).bg(bg),
    );

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        chunks[0],
    );

    let line = "\u{2500}".repeat(chunks[1].width as usize);
    frame.render_widget(
        Paragraph::new(line).style(Style::default().fg(app.theme.dim).bg(bg)),
        chunks[1],
    );
}

fn tab_style(app: &App, selected: bool) -> Style {
    if selected {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.dim).bg(app.theme.background)
    }
}
