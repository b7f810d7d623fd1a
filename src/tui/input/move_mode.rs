use crossterm::event::{KeyCode, KeyEvent};

use crate::ops::task_ops::neighbor_state;
use crate::tui::app::{App, Mode};

/// Move mode: the card stays put while a target column is chosen; Enter
/// moves it there, Esc leaves it where it was.
pub(super) fn handle_move(app: &mut App, key: KeyEvent) {
    let Mode::Move { key: task_key, target } = app.mode.clone() else {
        return;
    };
    match key.code {
        KeyCode::Left | KeyCode::Char('h') => {
            app.mode = Mode::Move {
                key: task_key,
                target: neighbor_state(Some(target), -1),
            };
        }
        KeyCode::Right | KeyCode::Char('l') => {
            app.mode = Mode::Move {
                key: task_key,
                target: neighbor_state(Some(target), 1),
            };
        }
        KeyCode::Enter => {
            app.mode = Mode::Navigate;
            let current = app.board().task(&task_key).and_then(|t| t.state());
            if current != Some(target) {
                app.commit_move(&task_key, target);
            }
        }
        KeyCode::Esc => app.mode = Mode::Navigate,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use crate::model::task::TaskState;
    use crate::tui::app::Mode;
    use crate::tui::input::press;
    use crate::tui::render::test_helpers::loaded_app;
    use crate::tui::worker::Request;

    #[test]
    fn target_is_clamped_to_the_board() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('m'));
        press(&mut app, KeyCode::Left);
        assert!(matches!(app.mode, Mode::Move { target: TaskState::ToDo, .. }));
        for _ in 0..5 {
            press(&mut app, KeyCode::Right);
        }
        assert!(matches!(app.mode, Mode::Move { target: TaskState::Done, .. }));
    }

    #[test]
    fn enter_moves_the_card_and_follows_it() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('m'));
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.board().task("task0").unwrap().task_state, "await-feedback");
        assert_eq!(app.column, 2);
        assert_eq!(app.selected_key().as_deref(), Some("task0"));
        let requests = app.take_requests();
        assert!(matches!(
            requests.as_slice(),
            [Request::Commit { rollback: Some(_), .. }]
        ));
    }

    #[test]
    fn escape_or_same_column_changes_nothing() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('m'));
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.board().task("task0").unwrap().task_state, "to-do");

        press(&mut app, KeyCode::Char('m'));
        press(&mut app, KeyCode::Enter);
        assert!(app.take_requests().is_empty());
    }
}
