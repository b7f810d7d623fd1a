use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};

use crate::io::board_client::BoardClient;
use crate::io::remote::{HttpStore, StoreError};
use crate::io::session::SessionError;
use crate::model::board::Board;
use crate::model::config::RemoteConfig;
use crate::model::task::{Subtask, Task, TaskState};
use crate::model::user::User;
use crate::ops::cache::BoardCache;
use crate::ops::validate::ValidationError;

/// Error type for board operations
#[derive(Debug, thiserror::Error)]
pub enum OpError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("task '{0}' not found")]
    TaskNotFound(String),
    #[error("subtask '{subtask}' not found in task '{task}'")]
    SubtaskNotFound { task: String, subtask: String },
    #[error("contact '{0}' not found")]
    ContactNotFound(String),
    #[error("a contact named '{0}' already exists")]
    NameTaken(String),
    #[error("an account with email '{0}' already exists")]
    EmailTaken(String),
    #[error("login failed: wrong email or password")]
    LoginFailed,
    #[error("unknown contact(s): {0}")]
    UnknownContacts(String),
}

/// One change to the board, planned against the cached state.
///
/// [`Mutation::send`] performs the remote write, [`Mutation::apply`] brings
/// the cache in line with it afterwards. Writes are partial: a state change
/// only patches `taskState`, a subtask toggle only touches that subtask.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    PutUser(User),
    PatchUser {
        key: String,
        fields: Value,
        updated: User,
    },
    /// Delete a user and drop it from every task it was assigned to
    DeleteUser {
        key: String,
        unassign: Vec<(String, Vec<String>)>,
    },
    PutTask(Task),
    PatchTask {
        key: String,
        fields: Value,
        updated: Task,
    },
    MoveTask {
        key: String,
        state: TaskState,
    },
    DeleteTask {
        key: String,
    },
    PutSubtask {
        task_key: String,
        subtask_key: String,
        subtask: Subtask,
    },
    DeleteSubtask {
        task_key: String,
        subtask_key: String,
    },
}

impl Mutation {
    /// Perform the remote write
    pub fn send(&self, client: &BoardClient) -> Result<(), StoreError> {
        match self {
            Mutation::PutUser(user) => client.put_user(user),
            Mutation::PatchUser { key, fields, .. } => client.patch_user(key, fields),
            Mutation::DeleteUser { key, unassign } => {
                client.delete_user(key)?;
                for (task_key, remaining) in unassign {
                    client.patch_task(task_key, &json!({ "assignedContacts": remaining }))?;
                }
                Ok(())
            }
            Mutation::PutTask(task) => client.put_task(task),
            Mutation::PatchTask { key, fields, .. } => client.patch_task(key, fields),
            Mutation::MoveTask { key, state } => {
                client.patch_task(key, &json!({ "taskState": state.as_str() }))
            }
            Mutation::DeleteTask { key } => client.delete_task(key),
            Mutation::PutSubtask {
                task_key,
                subtask_key,
                subtask,
            } => client.put_subtask(task_key, subtask_key, subtask),
            Mutation::DeleteSubtask {
                task_key,
                subtask_key,
            } => client.delete_subtask(task_key, subtask_key),
        }
    }

    /// Mirror a successful write in the cache
    pub fn apply(&self, cache: &mut BoardCache) {
        match self {
            Mutation::PutUser(user) => cache.apply_put_user(user.clone()),
            Mutation::PatchUser { updated, .. } => cache.apply_put_user(updated.clone()),
            Mutation::DeleteUser { key, unassign } => {
                cache.apply_delete_user(key);
                for (task_key, remaining) in unassign {
                    if let Some(task) = cache.board().task(task_key) {
                        let mut task = task.clone();
                        task.assigned_contacts = remaining.clone();
                        cache.apply_put_task(task);
                    }
                }
            }
            Mutation::PutTask(task) => cache.apply_put_task(task.clone()),
            Mutation::PatchTask { updated, .. } => cache.apply_put_task(updated.clone()),
            Mutation::MoveTask { key, state } => {
                cache.apply_task_state(key, *state);
            }
            Mutation::DeleteTask { key } => cache.apply_delete_task(key),
            Mutation::PutSubtask {
                task_key,
                subtask_key,
                subtask,
            } => cache.apply_put_subtask(task_key, subtask_key, subtask.clone()),
            Mutation::DeleteSubtask {
                task_key,
                subtask_key,
            } => cache.apply_delete_subtask(task_key, subtask_key),
        }
    }

    /// Short human-readable summary for logs and status lines
    pub fn describe(&self) -> String {
        match self {
            Mutation::PutUser(user) => format!("saved contact {}", user.name),
            Mutation::PatchUser { updated, .. } => format!("updated {}", updated.name),
            Mutation::DeleteUser { key, .. } => format!("deleted contact {}", key),
            Mutation::PutTask(task) => format!("saved {} \"{}\"", task.id, task.title),
            Mutation::PatchTask { key, .. } => format!("updated {}", key),
            Mutation::MoveTask { key, state } => format!("moved {} to {}", key, state.label()),
            Mutation::DeleteTask { key } => format!("deleted {}", key),
            Mutation::PutSubtask {
                task_key, subtask, ..
            } => format!("saved subtask \"{}\" of {}", subtask.task, task_key),
            Mutation::DeleteSubtask {
                task_key,
                subtask_key,
            } => format!("deleted {} of {}", subtask_key, task_key),
        }
    }
}

/// A board client plus the cache it feeds. Controllers and views take this
/// explicitly rather than reaching for shared globals.
pub struct Store {
    client: BoardClient,
    cache: BoardCache,
}

impl Store {
    pub fn new(client: BoardClient) -> Self {
        Store {
            client,
            cache: BoardCache::new(),
        }
    }

    /// Talk to the configured document store over HTTP
    pub fn connect(remote: &RemoteConfig, board_id: &str) -> Result<Self, StoreError> {
        let url = remote.url.as_deref().ok_or(StoreError::NotConfigured)?;
        let http = HttpStore::new(url, remote.timeout_secs.map(Duration::from_secs))?;
        tracing::debug!(url, board = board_id, "connecting");
        Ok(Store::new(BoardClient::new(Arc::new(http), board_id)))
    }

    pub fn client(&self) -> &BoardClient {
        &self.client
    }

    pub fn cache(&self) -> &BoardCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut BoardCache {
        &mut self.cache
    }

    pub fn board(&self) -> &Board {
        self.cache.board()
    }

    /// Fetch the whole board and replace the cache
    pub fn reload(&mut self) -> Result<(), OpError> {
        let ticket = self.cache.begin_reload();
        let board = self.client.fetch_all()?;
        self.cache.finish_reload(ticket, board);
        Ok(())
    }

    /// Send a planned mutation and, if the write succeeded, apply it locally.
    /// On failure the cache is left untouched.
    pub fn commit(&mut self, mutation: &Mutation) -> Result<(), OpError> {
        if let Err(e) = mutation.send(&self.client) {
            tracing::warn!(change = %mutation.describe(), error = %e, "remote write failed");
            return Err(e.into());
        }
        tracing::info!(change = %mutation.describe(), "committed");
        mutation.apply(&mut self.cache);
        Ok(())
    }

    pub fn commit_all(&mut self, mutations: &[Mutation]) -> Result<(), OpError> {
        for m in mutations {
            self.commit(m)?;
        }
        Ok(())
    }
}
