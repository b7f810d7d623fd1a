use crossterm::event::{KeyCode, KeyEvent};

use crate::ops::subtask_editor::EditOutcome;
use crate::ops::task_ops;
use crate::tui::app::App;

/// Keys while the task popup is open. The popup has three sub-states:
/// confirming a delete, typing a new subtask, and editing a subtask in place.
pub(super) fn handle_detail(app: &mut App, key: KeyEvent) {
    let Some(detail) = &app.detail else {
        app.close_detail();
        return;
    };
    if detail.confirm_delete {
        handle_confirm_delete(app, key);
    } else if detail.adding.is_some() {
        handle_adding(app, key);
    } else if detail.editor.editing().is_some() {
        handle_editing(app, key);
    } else {
        handle_browse(app, key);
    }
}

fn handle_browse(app: &mut App, key: KeyEvent) {
    app.status = None;
    let Some(detail) = &mut app.detail else {
        return;
    };
    let task_key = detail.key.clone();
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_detail(),
        KeyCode::Up | KeyCode::Char('k') => detail.cursor = detail.cursor.saturating_sub(1),
        KeyCode::Down | KeyCode::Char('j') => {
            detail.cursor = (detail.cursor + 1).min(detail.editor.len().saturating_sub(1));
        }
        KeyCode::Char(' ') | KeyCode::Char('x') => {
            if let Some((subtask, checked)) = detail.editor.toggle(detail.cursor) {
                let planned = task_ops::set_subtask_checked(app.board(), &task_key, &subtask, checked);
                app.submit(planned);
            }
        }
        KeyCode::Enter | KeyCode::Char('e') => {
            detail.editor.begin_edit(detail.cursor);
        }
        KeyCode::Char('a') => detail.adding = Some(String::new()),
        KeyCode::Char('d') => {
            if let Some(subtask) = detail.editor.delete(detail.cursor) {
                let planned = task_ops::delete_subtask(app.board(), &task_key, &subtask);
                app.submit(planned);
            }
        }
        KeyCode::Char('D') => detail.confirm_delete = true,
        _ => {}
    }
}

fn handle_editing(app: &mut App, key: KeyEvent) {
    let Some(detail) = &mut app.detail else {
        return;
    };
    let task_key = detail.key.clone();
    let outcome = match key.code {
        KeyCode::Enter => detail.editor.confirm(),
        KeyCode::Esc => {
            detail.editor.cancel();
            EditOutcome::Unchanged
        }
        // Moving to another row leaves the edited one
        KeyCode::Up => {
            detail.cursor = detail.cursor.saturating_sub(1);
            detail.editor.blur()
        }
        KeyCode::Down => {
            detail.cursor = (detail.cursor + 1).min(detail.editor.len().saturating_sub(1));
            detail.editor.blur()
        }
        KeyCode::Backspace => {
            detail.editor.backspace();
            EditOutcome::Unchanged
        }
        KeyCode::Char(c) => {
            detail.editor.push_str(c.encode_utf8(&mut [0; 4]));
            EditOutcome::Unchanged
        }
        _ => EditOutcome::Unchanged,
    };
    match outcome {
        EditOutcome::Unchanged => {}
        EditOutcome::Renamed { key, text } => {
            let planned = task_ops::rename_subtask(app.board(), &task_key, &key, &text);
            app.submit(planned);
        }
        EditOutcome::Rejected => app.flash("a subtask needs some text"),
    }
}

fn handle_adding(app: &mut App, key: KeyEvent) {
    let Some(detail) = &mut app.detail else {
        return;
    };
    let Some(buffer) = &mut detail.adding else {
        return;
    };
    match key.code {
        KeyCode::Esc => detail.adding = None,
        KeyCode::Backspace => {
            buffer.pop();
        }
        KeyCode::Char(c) => buffer.push(c),
        KeyCode::Enter => {
            let text = buffer.clone();
            let task_key = detail.key.clone();
            detail.adding = None;
            let planned = task_ops::add_subtask(app.board(), &task_key, &text);
            app.submit(planned);
        }
        _ => {}
    }
}

fn handle_confirm_delete(app: &mut App, key: KeyEvent) {
    let Some(detail) = &mut app.detail else {
        return;
    };
    detail.confirm_delete = false;
    if key.code == KeyCode::Char('y') {
        let task_key = detail.key.clone();
        let planned = task_ops::delete_task(app.board(), &task_key);
        app.submit(planned);
        app.close_detail();
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use crate::model::task::Subtask;
    use crate::ops::store::Mutation;
    use crate::ops::subtask_editor::ItemState;
    use crate::tui::app::{App, Mode};
    use crate::tui::input::{press, type_text};
    use crate::tui::render::test_helpers::loaded_app;
    use crate::tui::worker::Request;

    fn popup() -> App {
        let mut app = loaded_app();
        app.open_detail("task0");
        app
    }

    fn committed(app: &mut App) -> Vec<Mutation> {
        app.take_requests()
            .into_iter()
            .filter_map(|r| match r {
                Request::Commit { mutation, .. } => Some(mutation),
                Request::Reload(_) => None,
            })
            .collect()
    }

    #[test]
    fn space_toggles_only_that_subtask() {
        let mut app = popup();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.detail.as_ref().unwrap().editor.items()[1].checked);
        assert_eq!(
            committed(&mut app),
            vec![Mutation::PutSubtask {
                task_key: "task0".into(),
                subtask_key: "subtask1".into(),
                subtask: Subtask {
                    task: "Password field".into(),
                    task_checked: true,
                },
            }]
        );
    }

    #[test]
    fn enter_saves_a_renamed_subtask() {
        let mut app = popup();
        press(&mut app, KeyCode::Char('e'));
        type_text(&mut app, "s");
        press(&mut app, KeyCode::Enter);
        let mutations = committed(&mut app);
        assert_eq!(mutations.len(), 1);
        let Mutation::PutSubtask {
            subtask_key,
            subtask,
            ..
        } = &mutations[0]
        else {
            panic!("expected a subtask write");
        };
        assert_eq!(subtask_key, "subtask0");
        assert_eq!(subtask.task, "Email fields");
        assert!(subtask.task_checked);
    }

    #[test]
    fn escape_restores_and_empty_enter_is_rejected() {
        let mut app = popup();
        press(&mut app, KeyCode::Enter);
        for _ in 0.."Email field".len() {
            press(&mut app, KeyCode::Backspace);
        }
        press(&mut app, KeyCode::Enter);
        assert!(app.detail.as_ref().unwrap().editor.editing().is_some());
        assert_eq!(app.status.as_deref(), Some("a subtask needs some text"));

        press(&mut app, KeyCode::Esc);
        let detail = app.detail.as_ref().unwrap();
        assert!(detail.editor.editing().is_none());
        assert_eq!(detail.editor.items()[0].text, "Email field");
        assert!(committed(&mut app).is_empty());
    }

    #[test]
    fn moving_away_commits_the_edit() {
        let mut app = popup();
        press(&mut app, KeyCode::Char('e'));
        type_text(&mut app, "!");
        press(&mut app, KeyCode::Down);
        assert_eq!(app.detail.as_ref().unwrap().cursor, 1);
        assert_eq!(committed(&mut app).len(), 1);
    }

    #[test]
    fn a_adds_a_subtask_with_the_next_key() {
        let mut app = popup();
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Submit button");
        press(&mut app, KeyCode::Enter);
        let mutations = committed(&mut app);
        assert!(matches!(
            mutations.as_slice(),
            [Mutation::PutSubtask { subtask_key, .. }] if subtask_key == "subtask2"
        ));
    }

    #[test]
    fn d_deletes_the_selected_subtask() {
        let mut app = popup();
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(
            app.detail.as_ref().unwrap().editor.state(0),
            ItemState::PendingDelete
        );
        let mutations = committed(&mut app);
        assert_eq!(
            mutations,
            vec![Mutation::DeleteSubtask {
                task_key: "task0".into(),
                subtask_key: "subtask0".into(),
            }]
        );
        for mutation in mutations {
            app.handle_reply(crate::tui::worker::Reply::Committed {
                mutation,
                rollback: None,
                error: None,
            });
        }
        let editor = &app.detail.as_ref().unwrap().editor;
        assert_eq!(editor.len(), 1);
        assert_eq!(editor.items()[0].key, "subtask1");
    }

    #[test]
    fn deleting_the_task_needs_confirmation() {
        let mut app = popup();
        press(&mut app, KeyCode::Char('D'));
        press(&mut app, KeyCode::Char('n'));
        assert!(committed(&mut app).is_empty());
        assert_eq!(app.mode, Mode::Detail);

        press(&mut app, KeyCode::Char('D'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(
            committed(&mut app),
            vec![Mutation::DeleteTask {
                key: "task0".into()
            }]
        );
        assert_eq!(app.mode, Mode::Navigate);
    }

    #[test]
    fn failed_toggle_is_undone_from_the_cache() {
        let mut app = popup();
        press(&mut app, KeyCode::Char(' '));
        let Some(Request::Commit { mutation, rollback }) = app.take_requests().pop() else {
            panic!("expected a commit");
        };
        app.handle_reply(crate::tui::worker::Reply::Committed {
            mutation,
            rollback,
            error: Some("offline".into()),
        });
        assert!(app.detail.as_ref().unwrap().editor.items()[0].checked);
    }
}
