use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::centered;
use crate::model::task::Priority;
use crate::ops::subtask_editor::ItemState;
use crate::render::view::TaskDetailView;
use crate::tui::app::App;
use crate::tui::theme::priority_symbol;
use crate::util::text::{truncate_to_width, wrap_words};

fn priority_label(priority: Priority) -> &'static str {
    match priority {
        Priority::Urgent => "Urgent",
        Priority::Medium => "Medium",
        Priority::Low => "Low",
    }
}

/// The task dialog, drawn over the board
pub fn render_detail_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(detail) = &app.detail else {
        return;
    };
    let Some(view) = TaskDetailView::build(app.board(), &detail.key) else {
        return;
    };

    let theme = &app.theme;
    let bg = theme.background;
    let popup = centered(area, 64, area.height);
    frame.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.selection_border).bg(bg))
        .title(Span::styled(
            format!(" {} ", view.key),
            Style::default().fg(theme.dim).bg(bg),
        ))
        .style(Style::default().bg(bg));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let width = inner.width.saturating_sub(2) as usize;
    let label = Style::default().fg(theme.dim).bg(bg);
    let text = Style::default().fg(theme.text).bg(bg);

    let mut lines: Vec<Line<'static>> = vec![
        Line::from(Span::styled(
            format!(" {}", view.category),
            Style::default().fg(theme.category_color(&view.category)).bg(bg),
        )),
        Line::from(Span::styled(
            format!(" {}", truncate_to_width(&view.title, width)),
            Style::default()
                .fg(theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        )),
    ];
    for line in wrap_words(&view.description, width) {
        lines.push(Line::from(Span::styled(format!(" {}", line), text)));
    }
    lines.push(Line::default());

    let due = if view.due_date.is_empty() {
        "-".to_string()
    } else {
        view.due_date.clone()
    };
    lines.push(Line::from(vec![
        Span::styled(" Due date  ", label),
        Span::styled(due, text),
    ]));
    let mut priority = vec![Span::styled(" Priority  ", label)];
    match view.priority {
        Some(p) => {
            priority.push(Span::styled(format!("{} ", priority_label(p)), text));
            priority.push(Span::styled(
                priority_symbol(p),
                Style::default().fg(theme.priority_color(p)).bg(bg),
            ));
        }
        None => priority.push(Span::styled("-", text)),
    }
    lines.push(Line::from(priority));
    lines.push(Line::from(vec![
        Span::styled(" Column    ", label),
        Span::styled(view.state.clone(), text),
    ]));

    lines.push(Line::from(Span::styled(" Assigned to", label)));
    if view.assignees.is_empty() {
        lines.push(Line::from(Span::styled("   nobody", text)));
    }
    for avatar in &view.assignees {
        lines.push(Line::from(vec![
            Span::styled(
                format!("   {:<3}", avatar.initials),
                Style::default()
                    .fg(theme.avatar_color(&avatar.color))
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(avatar.name.clone(), text),
        ]));
    }
    lines.push(Line::default());

    lines.push(Line::from(Span::styled(" Subtasks", label)));
    let editing = detail.editor.editing();
    for (i, item) in detail.editor.items().iter().enumerate() {
        let selected = i == detail.cursor && detail.adding.is_none();
        let row_bg = if selected { theme.selection_bg } else { bg };
        let marker = if selected { "\u{258C}" } else { " " };
        let check = if item.checked { "[x] " } else { "[ ] " };
        let mut spans = vec![
            Span::styled(
                format!("{}  ", marker),
                Style::default().fg(theme.selection_border).bg(row_bg),
            ),
            Span::styled(check, Style::default().fg(theme.text).bg(row_bg)),
        ];
        match (detail.editor.state(i), editing) {
            (ItemState::Edit, Some((_, buffer))) => {
                spans.push(Span::styled(
                    buffer.to_string(),
                    Style::default().fg(theme.text_bright).bg(row_bg),
                ));
                spans.push(Span::styled(
                    "\u{258C}",
                    Style::default().fg(theme.highlight).bg(row_bg),
                ));
            }
            (ItemState::PendingDelete, _) => {
                spans.push(Span::styled(
                    truncate_to_width(&item.text, width.saturating_sub(18)),
                    Style::default()
                        .fg(theme.dim)
                        .bg(row_bg)
                        .add_modifier(Modifier::CROSSED_OUT),
                ));
                spans.push(Span::styled(
                    "  deleting\u{2026}",
                    Style::default().fg(theme.red).bg(row_bg),
                ));
            }
            _ => {
                let style = if item.checked {
                    Style::default()
                        .fg(theme.dim)
                        .bg(row_bg)
                        .add_modifier(Modifier::CROSSED_OUT)
                } else {
                    Style::default().fg(theme.text).bg(row_bg)
                };
                spans.push(Span::styled(
                    truncate_to_width(&item.text, width.saturating_sub(6)),
                    style,
                ));
            }
        }
        lines.push(Line::from(spans));
    }
    if detail.editor.is_empty() && detail.adding.is_none() {
        lines.push(Line::from(Span::styled("   no subtasks", text)));
    }
    if let Some(buffer) = &detail.adding {
        lines.push(Line::from(vec![
            Span::styled("\u{258C}  + ", Style::default().fg(theme.selection_border).bg(bg)),
            Span::styled(buffer.clone(), Style::default().fg(theme.text_bright).bg(bg)),
            Span::styled("\u{258C}", Style::default().fg(theme.highlight).bg(bg)),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), inner);
}
