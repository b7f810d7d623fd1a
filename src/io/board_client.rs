use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::io::remote::{RemoteStore, StoreError};
use crate::model::board::{Board, BoardDocument};
use crate::model::task::{Subtask, Task};
use crate::model::user::User;

/// Typed access to one board's subtree of the remote store.
///
/// Cheap to clone; clones share the underlying store.
#[derive(Clone)]
pub struct BoardClient {
    store: Arc<dyn RemoteStore>,
    board_id: String,
}

impl BoardClient {
    pub fn new(store: Arc<dyn RemoteStore>, board_id: &str) -> Self {
        BoardClient {
            store,
            board_id: board_id.to_string(),
        }
    }

    pub fn board_id(&self) -> &str {
        &self.board_id
    }

    pub fn user_path(&self, key: &str) -> String {
        format!("{}/users/{}", self.board_id, key)
    }

    pub fn task_path(&self, key: &str) -> String {
        format!("{}/tasks/{}", self.board_id, key)
    }

    pub fn subtask_path(&self, task_key: &str, subtask_key: &str) -> String {
        format!("{}/tasks/{}/subtasks/{}", self.board_id, task_key, subtask_key)
    }

    /// Read the whole board and flatten it
    pub fn fetch_all(&self) -> Result<Board, StoreError> {
        let doc = match self.store.get(&self.board_id)? {
            Some(value) => {
                serde_json::from_value::<BoardDocument>(value).map_err(|source| {
                    StoreError::Decode {
                        path: self.board_id.clone(),
                        source,
                    }
                })?
            }
            None => BoardDocument::default(),
        };
        let board = Board::from_document(doc);
        tracing::debug!(
            board = %self.board_id,
            users = board.users.len(),
            tasks = board.tasks.len(),
            "fetched board"
        );
        Ok(board)
    }

    pub fn put_user(&self, user: &User) -> Result<(), StoreError> {
        self.store.put(&self.user_path(&user.id), &to_value(user)?)
    }

    pub fn patch_user(&self, key: &str, fields: &Value) -> Result<(), StoreError> {
        self.store.patch(&self.user_path(key), fields)
    }

    pub fn delete_user(&self, key: &str) -> Result<(), StoreError> {
        self.store.delete(&self.user_path(key))
    }

    pub fn put_task(&self, task: &Task) -> Result<(), StoreError> {
        self.store.put(&self.task_path(&task.id), &to_value(task)?)
    }

    pub fn patch_task(&self, key: &str, fields: &Value) -> Result<(), StoreError> {
        self.store.patch(&self.task_path(key), fields)
    }

    pub fn delete_task(&self, key: &str) -> Result<(), StoreError> {
        self.store.delete(&self.task_path(key))
    }

    /// Overwrite one subtask at its own path, leaving its siblings alone
    pub fn put_subtask(
        &self,
        task_key: &str,
        subtask_key: &str,
        subtask: &Subtask,
    ) -> Result<(), StoreError> {
        self.store
            .put(&self.subtask_path(task_key, subtask_key), &to_value(subtask)?)
    }

    pub fn delete_subtask(&self, task_key: &str, subtask_key: &str) -> Result<(), StoreError> {
        self.store.delete(&self.subtask_path(task_key, subtask_key))
    }
}

fn to_value<T: Serialize>(record: &T) -> Result<Value, StoreError> {
    serde_json::to_value(record).map_err(|source| StoreError::Decode {
        path: String::new(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::remote::{MemoryStore, Method};
    use crate::model::task::TaskState;
    use serde_json::json;

    fn client() -> (Arc<MemoryStore>, BoardClient) {
        let store = Arc::new(MemoryStore::new());
        let client = BoardClient::new(store.clone(), "board-1");
        (store, client)
    }

    #[test]
    fn fetch_empty_board() {
        let (_store, client) = client();
        let board = client.fetch_all().unwrap();
        assert!(board.users.is_empty());
        assert!(board.tasks.is_empty());
    }

    #[test]
    fn one_bad_record_does_not_hide_the_board() {
        let store = Arc::new(MemoryStore::with_root(json!({
            "b": {
                "users": {"AB100": {"name": "Anja Berg"}},
                "tasks": {
                    "task0": {"title": "Fine", "taskState": "to-do"},
                    "task1": {"title": "Sparse", "taskState": "done", "assignedContacts": {"1": "AB100"}},
                    "task2": {"title": ["broken"], "taskState": "done"}
                }
            }
        })));
        let board = BoardClient::new(store, "b").fetch_all().unwrap();
        let keys: Vec<&str> = board.tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(keys, vec!["task0", "task1"]);
        assert_eq!(board.task("task1").unwrap().assigned_contacts, vec!["AB100"]);
    }

    #[test]
    fn put_task_then_fetch() {
        let (store, client) = client();
        let mut task = Task::new("Plan sprint", TaskState::ToDo);
        task.id = "task0".into();
        task.subtasks.insert("subtask0".into(), Subtask::new("Collect stories"));
        client.put_task(&task).unwrap();

        assert_eq!(
            store.get("board-1/tasks/task0/subtasks/subtask0").unwrap(),
            Some(json!({"task": "Collect stories", "taskChecked": false}))
        );
        let board = client.fetch_all().unwrap();
        assert_eq!(board.tasks, vec![task]);
    }

    #[test]
    fn subtask_write_targets_its_own_path() {
        let (store, client) = client();
        let mut sub = Subtask::new("Write tests");
        sub.task_checked = true;
        client.put_subtask("task3", "subtask1", &sub).unwrap();
        assert_eq!(
            store.requests(),
            vec![(Method::Put, "board-1/tasks/task3/subtasks/subtask1".to_string())]
        );
    }

    #[test]
    fn malformed_board_is_decode_error() {
        let store = Arc::new(MemoryStore::with_root(json!({"board-1": {"tasks": 5}})));
        let client = BoardClient::new(store, "board-1");
        assert!(matches!(client.fetch_all(), Err(StoreError::Decode { .. })));
    }
}
