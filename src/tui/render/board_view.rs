use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::highlighted_spans;
use crate::ops::search::{NO_RESULTS, SearchedCard, SearchedColumn, apply_search};
use crate::tui::app::{App, Mode};
use crate::tui::theme::priority_symbol;
use crate::util::text::truncate_to_width;

/// Render the four columns side by side
pub fn render_board_view(frame: &mut Frame, app: &App, area: Rect) {
    let view = app.board_view();
    let searched = apply_search(&view, &app.query);

    let areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    let move_target = match &app.mode {
        Mode::Move { target, .. } => Some(target.index()),
        _ => None,
    };

    for (i, col) in searched.columns.iter().enumerate() {
        let focused = match move_target {
            Some(target) => target == i,
            None => app.column == i,
        };
        let selected_row = (app.column == i).then_some(app.row);
        render_column(frame, app, areas[i], col, focused, selected_row);
    }
}

fn render_column(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    col: &SearchedColumn,
    focused: bool,
    selected_row: Option<usize>,
) {
    let bg = app.theme.background;
    let border = if focused {
        Style::default().fg(app.theme.selection_border).bg(bg)
    } else {
        Style::default().fg(app.theme.dim).bg(bg)
    };
    let count = col.visible_cards().count();
    let title = Span::styled(
        format!(" {} ({}) ", col.label, count),
        Style::default()
            .fg(app.theme.state_color(col.state))
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title)
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width.saturating_sub(1) as usize;
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    if count == 0 {
        let placeholder = if col.no_results {
            NO_RESULTS.to_string()
        } else {
            format!("No tasks {}", col.label)
        };
        let line = Line::from(Span::styled(
            format!(" {}", truncate_to_width(&placeholder, width)),
            dim,
        ));
        frame.render_widget(Paragraph::new(line), inner);
        return;
    }

    let cards: Vec<Vec<Line<'static>>> = col
        .visible_cards()
        .enumerate()
        .map(|(row, card)| card_lines(app, card, width, selected_row == Some(row)))
        .collect();

    // Scroll so the selected card is fully shown
    let height = inner.height as usize;
    let mut first = 0;
    if let Some(selected) = selected_row.filter(|&r| r < cards.len()) {
        let mut used: usize = cards[..=selected].iter().map(|c| c.len() + 1).sum();
        while used > height && first < selected {
            used -= cards[first].len() + 1;
            first += 1;
        }
    }

    let mut lines: Vec<Line<'static>> = Vec::new();
    for card in &cards[first..] {
        lines.extend(card.iter().cloned());
        lines.push(Line::default());
    }
    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), inner);
}

/// Category, title, description and a footer with progress, avatars and
/// priority
fn card_lines(app: &App, searched: &SearchedCard, width: usize, selected: bool) -> Vec<Line<'static>> {
    let theme = &app.theme;
    let card = searched.card;
    let bg = if selected { theme.selection_bg } else { theme.background };
    let marker = if selected {
        Span::styled("\u{258C}", Style::default().fg(theme.selection_border).bg(bg))
    } else {
        Span::styled(" ", Style::default().bg(bg))
    };
    let hl = Style::default()
        .fg(theme.search_match_fg)
        .bg(theme.search_match_bg);

    let mut lines = Vec::new();

    lines.push(Line::from(vec![
        marker.clone(),
        Span::styled(
            truncate_to_width(&card.category, width),
            Style::default().fg(theme.category_color(&card.category)).bg(bg),
        ),
    ]));

    let title_style = Style::default()
        .fg(theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let mut title = vec![marker.clone()];
    title.extend(highlighted_spans(&card.title, &searched.title_hits, width, title_style, hl));
    lines.push(Line::from(title));

    if !card.description.is_empty() {
        let mut description = vec![marker.clone()];
        description.extend(highlighted_spans(
            &card.description,
            &searched.description_hits,
            width,
            Style::default().fg(theme.dim).bg(bg),
            hl,
        ));
        lines.push(Line::from(description));
    }

    let mut footer = vec![marker];
    if card.subtasks_total > 0 {
        footer.push(Span::styled(
            format!("{}/{} ", card.subtasks_done, card.subtasks_total),
            Style::default().fg(theme.text).bg(bg),
        ));
    }
    for avatar in &card.assignees {
        footer.push(Span::styled(
            format!("{} ", avatar.initials),
            Style::default()
                .fg(theme.avatar_color(&avatar.color))
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ));
    }
    if let Some(priority) = card.priority {
        footer.push(Span::styled(
            priority_symbol(priority),
            Style::default().fg(theme.priority_color(priority)).bg(bg),
        ));
    }
    if footer.len() > 1 {
        lines.push(Line::from(footer));
    }

    lines
}
