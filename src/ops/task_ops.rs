use chrono::NaiveDate;
use indexmap::IndexMap;
use serde_json::{Map, Value, json};

use crate::model::board::Board;
use crate::model::task::{Priority, Subtask, Task, TaskState};
use crate::ops::keys::{next_subtask_key, next_task_key};
use crate::ops::store::{Mutation, OpError};
use crate::ops::validate::{self, ValidationError};

/// Input of the add-task form
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub category: String,
    pub priority: Option<Priority>,
    /// Column to create the task in (defaults to to-do)
    pub state: Option<TaskState>,
    /// Storage keys of assigned users
    pub assigned: Vec<String>,
    /// Subtask texts, in order
    pub subtasks: Vec<String>,
}

/// Fields changed in the edit dialog; `None` leaves a field alone
#[derive(Debug, Clone, Default)]
pub struct TaskEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub category: Option<String>,
    pub priority: Option<Priority>,
    pub assigned: Option<Vec<String>>,
}

impl TaskEdit {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.category.is_none()
            && self.priority.is_none()
            && self.assigned.is_none()
    }
}

fn find_task<'a>(board: &'a Board, key: &str) -> Result<&'a Task, OpError> {
    board
        .task(key)
        .ok_or_else(|| OpError::TaskNotFound(key.to_string()))
}

fn check_assignees(board: &Board, keys: &[String]) -> Result<(), OpError> {
    let unknown: Vec<&str> = keys
        .iter()
        .filter(|k| board.user(k).is_none())
        .map(|k| k.as_str())
        .collect();
    if unknown.is_empty() {
        Ok(())
    } else {
        Err(OpError::UnknownContacts(unknown.join(", ")))
    }
}

/// Validate the add-task form and allocate the next `task<N>` key.
pub fn create_task(board: &Board, draft: &TaskDraft, today: NaiveDate) -> Result<Mutation, OpError> {
    validate::require("title", &draft.title)?;
    validate::validate_date(&draft.due_date, today)?;
    validate::require("category", &draft.category)?;
    check_assignees(board, &draft.assigned)?;

    let mut task = Task::new(&draft.title, draft.state.unwrap_or(TaskState::ToDo));
    task.id = next_task_key(board.tasks.iter().map(|t| t.id.as_str()));
    task.description = draft.description.trim().to_string();
    task.due_date = draft.due_date.trim().to_string();
    task.category = draft.category.trim().to_string();
    task.priority = draft.priority;
    task.assigned_contacts = draft.assigned.clone();

    let mut subtasks: IndexMap<String, Subtask> = IndexMap::new();
    for text in draft.subtasks.iter().filter(|s| !s.trim().is_empty()) {
        let key = next_subtask_key(subtasks.keys().map(|k| k.as_str()));
        subtasks.insert(key, Subtask::new(text));
    }
    task.subtasks = subtasks;

    Ok(Mutation::PutTask(task))
}

/// Patch only the fields the edit dialog changed.
pub fn edit_task(
    board: &Board,
    key: &str,
    edit: &TaskEdit,
    today: NaiveDate,
) -> Result<Mutation, OpError> {
    let mut updated = find_task(board, key)?.clone();
    let mut fields = Map::new();

    if let Some(title) = &edit.title {
        validate::require("title", title)?;
        updated.title = title.trim().to_string();
        fields.insert("title".into(), json!(updated.title));
    }
    if let Some(description) = &edit.description {
        updated.description = description.trim().to_string();
        fields.insert("description".into(), json!(updated.description));
    }
    if let Some(due) = &edit.due_date {
        validate::validate_date(due, today)?;
        updated.due_date = due.trim().to_string();
        fields.insert("dueDate".into(), json!(updated.due_date));
    }
    if let Some(category) = &edit.category {
        validate::require("category", category)?;
        updated.category = category.trim().to_string();
        fields.insert("category".into(), json!(updated.category));
    }
    if let Some(priority) = edit.priority {
        updated.priority = Some(priority);
        fields.insert("priority".into(), json!(priority.as_str()));
    }
    if let Some(assigned) = &edit.assigned {
        check_assignees(board, assigned)?;
        updated.assigned_contacts = assigned.clone();
        fields.insert("assignedContacts".into(), json!(assigned));
    }

    Ok(Mutation::PatchTask {
        key: key.to_string(),
        fields: Value::Object(fields),
        updated,
    })
}

/// Move a task to another column. Any column can follow any other.
pub fn move_task(board: &Board, key: &str, state: TaskState) -> Result<Mutation, OpError> {
    find_task(board, key)?;
    Ok(Mutation::MoveTask {
        key: key.to_string(),
        state,
    })
}

/// The column left or right of the task's current one, for keyboard moves.
/// Tasks outside every column land in to-do.
pub fn neighbor_state(current: Option<TaskState>, step: isize) -> TaskState {
    let index = current.map_or(0, |s| s.index() as isize);
    let next = (index + step).clamp(0, TaskState::ALL.len() as isize - 1);
    TaskState::ALL[next as usize]
}

pub fn delete_task(board: &Board, key: &str) -> Result<Mutation, OpError> {
    find_task(board, key)?;
    Ok(Mutation::DeleteTask {
        key: key.to_string(),
    })
}

pub fn assign(board: &Board, key: &str, user_key: &str) -> Result<Mutation, OpError> {
    let task = find_task(board, key)?;
    if board.user(user_key).is_none() {
        return Err(OpError::ContactNotFound(user_key.to_string()));
    }
    let mut assigned = task.assigned_contacts.clone();
    if !assigned.iter().any(|k| k == user_key) {
        assigned.push(user_key.to_string());
    }
    set_assigned(task, assigned)
}

pub fn unassign(board: &Board, key: &str, user_key: &str) -> Result<Mutation, OpError> {
    let task = find_task(board, key)?;
    let assigned: Vec<String> = task
        .assigned_contacts
        .iter()
        .filter(|k| *k != user_key)
        .cloned()
        .collect();
    set_assigned(task, assigned)
}

fn set_assigned(task: &Task, assigned: Vec<String>) -> Result<Mutation, OpError> {
    let mut updated = task.clone();
    updated.assigned_contacts = assigned;
    Ok(Mutation::PatchTask {
        key: task.id.clone(),
        fields: json!({ "assignedContacts": updated.assigned_contacts }),
        updated,
    })
}

// ---------------------------------------------------------------------------
// Subtasks
// ---------------------------------------------------------------------------

fn find_subtask<'a>(board: &'a Board, key: &str, subtask_key: &str) -> Result<&'a Subtask, OpError> {
    find_task(board, key)?
        .subtasks
        .get(subtask_key)
        .ok_or_else(|| OpError::SubtaskNotFound {
            task: key.to_string(),
            subtask: subtask_key.to_string(),
        })
}

pub fn add_subtask(board: &Board, key: &str, text: &str) -> Result<Mutation, OpError> {
    validate::require("subtask", text)?;
    let task = find_task(board, key)?;
    let subtask_key = next_subtask_key(task.subtasks.keys().map(|k| k.as_str()));
    Ok(Mutation::PutSubtask {
        task_key: key.to_string(),
        subtask_key,
        subtask: Subtask::new(text),
    })
}

/// Change a subtask's text, keeping its checked state
pub fn rename_subtask(
    board: &Board,
    key: &str,
    subtask_key: &str,
    text: &str,
) -> Result<Mutation, OpError> {
    if text.trim().is_empty() {
        return Err(ValidationError::Required("subtask").into());
    }
    let current = find_subtask(board, key, subtask_key)?;
    Ok(Mutation::PutSubtask {
        task_key: key.to_string(),
        subtask_key: subtask_key.to_string(),
        subtask: Subtask {
            task: text.trim().to_string(),
            task_checked: current.task_checked,
        },
    })
}

/// Set a subtask's checked state. Writes `{task, taskChecked}` at the
/// subtask's own path so sibling subtasks are never overwritten.
pub fn set_subtask_checked(
    board: &Board,
    key: &str,
    subtask_key: &str,
    checked: bool,
) -> Result<Mutation, OpError> {
    let current = find_subtask(board, key, subtask_key)?;
    Ok(Mutation::PutSubtask {
        task_key: key.to_string(),
        subtask_key: subtask_key.to_string(),
        subtask: Subtask {
            task: current.task.clone(),
            task_checked: checked,
        },
    })
}

pub fn toggle_subtask(board: &Board, key: &str, subtask_key: &str) -> Result<Mutation, OpError> {
    let checked = find_subtask(board, key, subtask_key)?.task_checked;
    set_subtask_checked(board, key, subtask_key, !checked)
}

pub fn delete_subtask(board: &Board, key: &str, subtask_key: &str) -> Result<Mutation, OpError> {
    find_subtask(board, key, subtask_key)?;
    Ok(Mutation::DeleteSubtask {
        task_key: key.to_string(),
        subtask_key: subtask_key.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::board_client::BoardClient;
    use crate::io::remote::{MemoryStore, Method};
    use crate::ops::store::Store;
    use std::sync::Arc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
    }

    fn seeded() -> (Arc<MemoryStore>, Store) {
        let memory = Arc::new(MemoryStore::with_root(json!({
            "b": {
                "users": {
                    "AB100": {"name": "Anja Berg", "email": "anja@example.com"},
                    "CD100": {"name": "Carl Dorn", "email": "carl@example.com"}
                },
                "tasks": {
                    "task0": {
                        "title": "Design login", "description": "Form and flow",
                        "dueDate": "2026-04-01", "category": "User Story",
                        "priority": "urgent", "taskState": "to-do",
                        "assignedContacts": ["AB100"],
                        "subtasks": {
                            "subtask0": {"task": "Wireframe", "taskChecked": false},
                            "subtask1": {"task": "Review", "taskChecked": true}
                        }
                    },
                    "task2": {"title": "Deploy", "taskState": "done", "category": "Technical Task"}
                }
            }
        })));
        let mut store = Store::new(BoardClient::new(memory.clone(), "b"));
        store.reload().unwrap();
        (memory, store)
    }

    fn draft() -> TaskDraft {
        TaskDraft {
            title: "Write docs".into(),
            description: "User guide".into(),
            due_date: "2026-03-20".into(),
            category: "Technical Task".into(),
            priority: Some(Priority::Medium),
            state: None,
            assigned: vec!["CD100".into()],
            subtasks: vec!["Outline".into(), "  ".into(), "Draft".into()],
        }
    }

    #[test]
    fn create_allocates_next_key_and_subtask_keys() {
        let (_memory, mut store) = seeded();
        let mutation = create_task(store.board(), &draft(), today()).unwrap();
        let task = match &mutation {
            Mutation::PutTask(t) => t.clone(),
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(task.id, "task3");
        assert_eq!(task.state(), Some(TaskState::ToDo));
        let keys: Vec<&str> = task.subtasks.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["subtask0", "subtask1"]);

        store.commit(&mutation).unwrap();
        store.reload().unwrap();
        let stored = store.board().task("task3").unwrap();
        assert_eq!(stored.title, "Write docs");
        assert_eq!(stored.assigned_contacts, vec!["CD100"]);
    }

    #[test]
    fn create_rejects_past_due_date() {
        let (_memory, store) = seeded();
        let mut d = draft();
        d.due_date = "2026-03-14".into();
        assert!(matches!(
            create_task(store.board(), &d, today()),
            Err(OpError::Validation(ValidationError::DateInPast(_)))
        ));
        d.due_date = "2026-03-15".into();
        assert!(create_task(store.board(), &d, today()).is_ok());
    }

    #[test]
    fn create_requires_title_and_category() {
        let (_memory, store) = seeded();
        let mut d = draft();
        d.title = " ".into();
        assert!(matches!(
            create_task(store.board(), &d, today()),
            Err(OpError::Validation(ValidationError::Required("title")))
        ));
        let mut d = draft();
        d.category.clear();
        assert!(matches!(
            create_task(store.board(), &d, today()),
            Err(OpError::Validation(ValidationError::Required("category")))
        ));
    }

    #[test]
    fn create_rejects_unknown_assignee() {
        let (_memory, store) = seeded();
        let mut d = draft();
        d.assigned = vec!["ZZ999".into()];
        assert!(matches!(
            create_task(store.board(), &d, today()),
            Err(OpError::UnknownContacts(_))
        ));
    }

    #[test]
    fn edit_patches_only_changed_fields() {
        let (memory, mut store) = seeded();
        let edit = TaskEdit {
            title: Some("Design signup".into()),
            priority: Some(Priority::Low),
            ..Default::default()
        };
        let mutation = edit_task(store.board(), "task0", &edit, today()).unwrap();
        match &mutation {
            Mutation::PatchTask { fields, .. } => {
                assert_eq!(fields, &json!({"title": "Design signup", "priority": "low"}));
            }
            other => panic!("unexpected {:?}", other),
        }
        store.commit(&mutation).unwrap();
        store.reload().unwrap();
        let task = store.board().task("task0").unwrap();
        assert_eq!(task.title, "Design signup");
        assert_eq!(task.description, "Form and flow");
        assert_eq!(task.subtasks.len(), 2);
        assert_eq!(
            memory.requests().iter().filter(|(m, _)| *m == Method::Patch).count(),
            1
        );
    }

    #[test]
    fn move_patches_state_only() {
        let (memory, mut store) = seeded();
        memory.clear_requests();
        let mutation = move_task(store.board(), "task0", TaskState::AwaitFeedback).unwrap();
        store.commit(&mutation).unwrap();
        assert_eq!(
            memory.requests(),
            vec![(Method::Patch, "b/tasks/task0".to_string())]
        );
        store.reload().unwrap();
        assert_eq!(
            store.board().task("task0").unwrap().state(),
            Some(TaskState::AwaitFeedback)
        );
    }

    #[test]
    fn move_unknown_task() {
        let (_memory, store) = seeded();
        assert!(matches!(
            move_task(store.board(), "task9", TaskState::Done),
            Err(OpError::TaskNotFound(_))
        ));
    }

    #[test]
    fn neighbor_states_clamp() {
        assert_eq!(neighbor_state(Some(TaskState::ToDo), -1), TaskState::ToDo);
        assert_eq!(neighbor_state(Some(TaskState::ToDo), 1), TaskState::InProgress);
        assert_eq!(neighbor_state(Some(TaskState::Done), 1), TaskState::Done);
        assert_eq!(neighbor_state(None, 0), TaskState::ToDo);
    }

    #[test]
    fn subtask_toggle_round_trip() {
        let (memory, mut store) = seeded();
        memory.clear_requests();

        let m = toggle_subtask(store.board(), "task0", "subtask1").unwrap();
        store.commit(&m).unwrap();
        store.reload().unwrap();
        assert!(!store.board().task("task0").unwrap().subtasks["subtask1"].task_checked);

        let m = toggle_subtask(store.board(), "task0", "subtask1").unwrap();
        store.commit(&m).unwrap();
        store.reload().unwrap();
        assert!(store.board().task("task0").unwrap().subtasks["subtask1"].task_checked);

        let puts: Vec<String> = memory
            .requests()
            .into_iter()
            .filter(|(m, _)| *m == Method::Put)
            .map(|(_, p)| p)
            .collect();
        assert_eq!(
            puts,
            vec![
                "b/tasks/task0/subtasks/subtask1".to_string(),
                "b/tasks/task0/subtasks/subtask1".to_string()
            ]
        );
        // The sibling was not touched
        assert!(!store.board().task("task0").unwrap().subtasks["subtask0"].task_checked);
    }

    #[test]
    fn failed_toggle_keeps_committed_state() {
        let (memory, mut store) = seeded();
        memory.set_offline(true);
        let m = toggle_subtask(store.board(), "task0", "subtask0").unwrap();
        assert!(store.commit(&m).is_err());
        memory.set_offline(false);
        store.reload().unwrap();
        assert!(!store.board().task("task0").unwrap().subtasks["subtask0"].task_checked);
    }

    #[test]
    fn add_rename_delete_subtask() {
        let (_memory, mut store) = seeded();
        let m = add_subtask(store.board(), "task0", "Ship it").unwrap();
        store.commit(&m).unwrap();
        let m = rename_subtask(store.board(), "task0", "subtask2", "Ship it today").unwrap();
        store.commit(&m).unwrap();
        let m = delete_subtask(store.board(), "task0", "subtask0").unwrap();
        store.commit(&m).unwrap();

        store.reload().unwrap();
        let task = store.board().task("task0").unwrap();
        let items: Vec<(&str, &str)> = task
            .subtasks
            .iter()
            .map(|(k, s)| (k.as_str(), s.task.as_str()))
            .collect();
        assert_eq!(items, vec![("subtask1", "Review"), ("subtask2", "Ship it today")]);
    }

    #[test]
    fn rename_to_empty_is_rejected() {
        let (_memory, store) = seeded();
        assert!(matches!(
            rename_subtask(store.board(), "task0", "subtask0", "   "),
            Err(OpError::Validation(ValidationError::Required("subtask")))
        ));
        assert!(matches!(
            rename_subtask(store.board(), "task0", "subtask9", "x"),
            Err(OpError::SubtaskNotFound { .. })
        ));
    }

    #[test]
    fn assign_and_unassign() {
        let (_memory, mut store) = seeded();
        let m = assign(store.board(), "task0", "CD100").unwrap();
        store.commit(&m).unwrap();
        assert_eq!(
            store.board().task("task0").unwrap().assigned_contacts,
            vec!["AB100", "CD100"]
        );
        // Assigning twice is a no-op on the list
        let m = assign(store.board(), "task0", "CD100").unwrap();
        store.commit(&m).unwrap();
        assert_eq!(store.board().task("task0").unwrap().assigned_contacts.len(), 2);

        let m = unassign(store.board(), "task0", "AB100").unwrap();
        store.commit(&m).unwrap();
        store.reload().unwrap();
        assert_eq!(
            store.board().task("task0").unwrap().assigned_contacts,
            vec!["CD100"]
        );
        assert!(matches!(
            assign(store.board(), "task0", "ZZ1"),
            Err(OpError::ContactNotFound(_))
        ));
    }

    #[test]
    fn delete_removes_task() {
        let (_memory, mut store) = seeded();
        let m = delete_task(store.board(), "task2").unwrap();
        store.commit(&m).unwrap();
        store.reload().unwrap();
        assert!(store.board().task("task2").is_none());
        assert_eq!(store.board().tasks.len(), 1);
    }
}
