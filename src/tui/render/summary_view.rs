use chrono::Timelike;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::task::TaskState;
use crate::ops::summary::{format_deadline, greeting, summarize};
use crate::tui::app::App;

pub fn render_summary_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let summary = summarize(app.board());
    let label = Style::default().fg(app.theme.dim).bg(bg);
    let figure = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let hello = greeting(chrono::Local::now().hour());
    let mut lines = vec![
        Line::from(match app.current_user() {
            Some(user) => vec![
                Span::styled(format!(" {}, ", hello), Style::default().fg(app.theme.text).bg(bg)),
                Span::styled(user.name.clone(), Style::default().fg(app.theme.highlight).bg(bg)),
            ],
            None => vec![Span::styled(format!(" {}", hello), Style::default().fg(app.theme.text).bg(bg))],
        }),
        Line::default(),
    ];

    for state in TaskState::ALL {
        lines.push(Line::from(vec![
            Span::styled(format!(" {:<18}", state.label()), label),
            Span::styled(format!("{:>4}", summary.count(state)), figure),
        ]));
    }
    lines.push(Line::default());
    lines.push(Line::from(vec![
        Span::styled(format!(" {:<18}", "Tasks on board"), label),
        Span::styled(format!("{:>4}", summary.total), figure),
    ]));
    lines.push(Line::from(vec![
        Span::styled(format!(" {:<18}", "Urgent"), label),
        Span::styled(
            format!("{:>4}", summary.urgent),
            Style::default()
                .fg(app.theme.red)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
    ]));
    let deadline = summary
        .next_urgent_deadline
        .map_or_else(|| "No upcoming deadline".to_string(), format_deadline);
    lines.push(Line::from(vec![
        Span::styled(format!(" {:<18}", "Next deadline"), label),
        Span::styled(format!("{:>4}", ""), figure),
        Span::styled(format!(" {}", deadline), Style::default().fg(app.theme.text).bg(bg)),
    ]));

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}
