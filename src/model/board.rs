use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::model::task::{Task, TaskState};
use crate::model::user::User;

/// The board as stored remotely: keyed sub-documents under `users` and `tasks`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardDocument {
    #[serde(default, deserialize_with = "keyed_or_empty")]
    pub users: IndexMap<String, User>,
    #[serde(default, deserialize_with = "keyed_or_empty")]
    pub tasks: IndexMap<String, Task>,
}

/// The in-memory collections every view reads from.
///
/// Built wholesale from a [`BoardDocument`]; each record carries its storage
/// key in `id`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    pub users: Vec<User>,
    pub tasks: Vec<Task>,
}

impl Board {
    /// Flatten the keyed document into ordered collections
    pub fn from_document(doc: BoardDocument) -> Self {
        let users = doc
            .users
            .into_iter()
            .map(|(key, mut user)| {
                user.id = key;
                user
            })
            .collect();
        let tasks = doc
            .tasks
            .into_iter()
            .map(|(key, mut task)| {
                task.id = key;
                task
            })
            .collect();
        Board { users, tasks }
    }

    /// Rebuild the keyed document (used by the in-memory store in tests)
    pub fn to_document(&self) -> BoardDocument {
        BoardDocument {
            users: self
                .users
                .iter()
                .map(|u| (u.id.clone(), u.clone()))
                .collect(),
            tasks: self
                .tasks
                .iter()
                .map(|t| (t.id.clone(), t.clone()))
                .collect(),
        }
    }

    pub fn user(&self, key: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == key)
    }

    pub fn user_mut(&mut self, key: &str) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == key)
    }

    pub fn task(&self, key: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == key)
    }

    pub fn task_mut(&mut self, key: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == key)
    }

    /// Tasks in a column, in storage order. Tasks whose stored state is not a
    /// known column never appear here.
    pub fn tasks_in(&self, state: TaskState) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(move |t| t.state() == Some(state))
    }

    /// Users currently flagged as logged in
    pub fn logged_in_users(&self) -> impl Iterator<Item = &User> {
        self.users.iter().filter(|u| u.logged_in)
    }
}

/// Accept a missing, `null` or keyed-object subtree. The document store
/// returns `null` for an empty board.
///
/// Records are decoded one at a time; a record that does not decode is
/// skipped with a warning and the rest of the board still loads.
fn keyed_or_empty<'de, D, T>(deserializer: D) -> Result<IndexMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<IndexMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    let mut records = IndexMap::with_capacity(raw.len());
    for (key, value) in raw {
        match serde_json::from_value::<T>(value) {
            Ok(record) => {
                records.insert(key, record);
            }
            Err(e) => tracing::warn!(key = %key, error = %e, "skipping malformed record"),
        }
    }
    Ok(records)
}
