use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::push_right_hint;
use crate::tui::app::{App, Mode, View};

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let dim = Style::default().fg(app.theme.dim).bg(bg);
    let bright = Style::default().fg(app.theme.text_bright).bg(bg);
    let cursor = Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)); // ▌

    let mut spans: Vec<Span<'static>> = Vec::new();
    let hint: Option<&str> = match &app.mode {
        Mode::Search => {
            spans.push(Span::styled(format!("/{}", app.search_input), bright));
            spans.push(cursor);
            Some("Enter keep  Esc clear")
        }
        Mode::Move { key, target } => {
            spans.push(Span::styled(format!("Move {} \u{2192} ", key), bright));
            spans.push(Span::styled(
                target.label(),
                Style::default().fg(app.theme.state_color(*target)).bg(bg),
            ));
            Some("\u{2190}/\u{2192} column  Enter move  Esc cancel")
        }
        Mode::Detail => match &app.detail {
            Some(detail) if detail.confirm_delete => {
                spans.push(Span::styled(format!("Delete {}? ", detail.key), bright));
                Some("y delete  any key cancels")
            }
            Some(detail) if detail.adding.is_some() => {
                let text = detail.adding.clone().unwrap_or_default();
                spans.push(Span::styled(format!("New subtask: {}", text), bright));
                spans.push(cursor);
                Some("Enter add  Esc cancel")
            }
            Some(detail) if detail.editor.editing().is_some() => {
                push_message(app, &mut spans);
                Some("Enter save  Esc restore")
            }
            _ => {
                push_message(app, &mut spans);
                app.show_key_hints
                    .then_some("space toggle  e edit  a add  d delete  D delete task  Esc close")
            }
        },
        Mode::Navigate => {
            push_message(app, &mut spans);
            if spans.is_empty() && app.query.is_active() && app.view == View::Board {
                spans.push(Span::styled(format!("/{}", app.query.text()), dim));
            }
            app.show_key_hints.then_some(match app.view {
                View::Board => "/ search  m move  Enter open  r reload  q quit",
                View::Contacts | View::Summary => "Tab switch  r reload  q quit",
            })
        }
    };

    if let Some(hint) = hint {
        push_right_hint(&mut spans, hint, width, dim);
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

/// Loading/saving indicator, else the last message
fn push_message(app: &App, spans: &mut Vec<Span<'static>>) {
    let style = Style::default().fg(app.theme.text).bg(app.theme.background);
    if !app.cache.is_loaded() {
        spans.push(Span::styled("loading\u{2026}", style));
    } else if app.is_busy() {
        spans.push(Span::styled("saving\u{2026}", style));
    } else if let Some(message) = &app.status {
        spans.push(Span::styled(message.clone(), style));
    }
}
