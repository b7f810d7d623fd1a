pub mod board_view;
pub mod contacts_view;
pub mod detail_popup;
pub mod status_row;
pub mod summary_view;
pub mod tab_bar;

#[cfg(test)]
pub mod test_helpers;

use std::ops::Range;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::Block;

use super::app::{App, View};
use crate::util::text::{display_width, fitting_prefix, split_highlights};

/// Main render function — dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: tab bar (2 rows) | content | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // tab bar + separator
            Constraint::Min(1),    // content area
            Constraint::Length(1), // status row
        ])
        .split(area);

    tab_bar::render_tab_bar(frame, app, chunks[0]);

    match app.view {
        View::Board => board_view::render_board_view(frame, app, chunks[1]),
        View::Contacts => contacts_view::render_contacts_view(frame, app, chunks[1]),
        View::Summary => summary_view::render_summary_view(frame, app, chunks[1]),
    }

    if app.detail.is_some() {
        detail_popup::render_detail_popup(frame, app, chunks[1]);
    }

    status_row::render_status_row(frame, app, chunks[2]);
}

/// Spans for `text` cut to `max_cells`, with the `hits` ranges in
/// `highlight_style`. A cut line ends in `…`.
pub(super) fn highlighted_spans(
    text: &str,
    hits: &[Range<usize>],
    max_cells: usize,
    base_style: Style,
    highlight_style: Style,
) -> Vec<Span<'static>> {
    if max_cells == 0 {
        return Vec::new();
    }
    let cut = display_width(text) > max_cells;
    let mut budget = if cut { max_cells - 1 } else { max_cells };

    let mut spans = Vec::new();
    for (run, hit) in split_highlights(text, hits) {
        let style = if hit { highlight_style } else { base_style };
        let shown = fitting_prefix(run, budget);
        if !shown.is_empty() {
            spans.push(Span::styled(shown.to_string(), style));
        }
        budget -= display_width(shown);
        if shown.len() < run.len() {
            break;
        }
    }
    if cut {
        spans.push(Span::styled("\u{2026}", base_style));
    }
    spans
}

/// A rectangle of at most `width` x `height` centered in `area`
pub(super) fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}

/// Right-align `hint` after `spans` when it fits in `width`
pub(super) fn push_right_hint(spans: &mut Vec<Span<'static>>, hint: &str, width: usize, style: Style) {
    let used: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let hint_width = display_width(hint);
    if used + hint_width < width {
        spans.push(Span::raw(" ".repeat(width - used - hint_width)));
        spans.push(Span::styled(hint.to_string(), style));
    }
}
