use crossterm::event::{KeyCode, KeyEvent};

use crate::model::task::TaskState;
use crate::tui::app::{App, Mode, View};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    app.status = None;
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Tab => app.view = app.view.cycle(1),
        KeyCode::BackTab => app.view = app.view.cycle(-1),
        KeyCode::Char('1') => app.view = View::Board,
        KeyCode::Char('2') => app.view = View::Contacts,
        KeyCode::Char('3') => app.view = View::Summary,
        KeyCode::Char('r') => {
            app.request_reload();
            app.flash("reloading\u{2026}");
        }
        _ => match app.view {
            View::Board => handle_board_key(app, key),
            View::Contacts => handle_contacts_key(app, key),
            View::Summary => {}
        },
    }
}

fn handle_board_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Left | KeyCode::Char('h') => {
            app.column = app.column.saturating_sub(1);
            app.clamp_cursors();
        }
        KeyCode::Right | KeyCode::Char('l') => {
            app.column = (app.column + 1).min(TaskState::ALL.len() - 1);
            app.clamp_cursors();
        }
        KeyCode::Up | KeyCode::Char('k') => app.row = app.row.saturating_sub(1),
        KeyCode::Down | KeyCode::Char('j') => {
            app.row += 1;
            app.clamp_cursors();
        }
        KeyCode::Char('g') | KeyCode::Home => app.row = 0,
        KeyCode::Char('G') | KeyCode::End => {
            app.row = usize::MAX;
            app.clamp_cursors();
        }
        KeyCode::Char('/') => app.mode = Mode::Search,
        KeyCode::Esc if !app.search_input.is_empty() => app.set_search(""),
        KeyCode::Enter => {
            if let Some(key) = app.selected_key() {
                app.open_detail(&key);
            }
        }
        KeyCode::Char('m') => {
            if let Some(key) = app.selected_key()
                && let Some(state) = app.board().task(&key).and_then(|t| t.state())
            {
                app.mode = Mode::Move { key, target: state };
            }
        }
        _ => {}
    }
}

fn handle_contacts_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.contact_row = app.contact_row.saturating_sub(1),
        KeyCode::Down | KeyCode::Char('j') => {
            app.contact_row += 1;
            app.clamp_cursors();
        }
        _ => {}
    }
}
