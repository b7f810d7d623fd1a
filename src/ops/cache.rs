use crate::model::board::Board;
use crate::model::task::{Subtask, Task, TaskState};
use crate::model::user::User;

/// Identifies one reload request. Tickets are issued in increasing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReloadTicket(u64);

/// The board every view renders from, plus bookkeeping for overlapping
/// reloads.
///
/// A reload result is applied only if it was requested after the last one
/// applied, so a slow response cannot overwrite a newer one. Mutations that
/// succeeded remotely are applied locally with the `apply_*` methods.
#[derive(Debug, Default)]
pub struct BoardCache {
    board: Board,
    issued: u64,
    applied: u64,
    loaded: bool,
}

impl BoardCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty until the first reload completes
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Whether any reload has been applied yet
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Number of the last applied reload (0 before the first)
    pub fn version(&self) -> u64 {
        self.applied
    }

    pub fn begin_reload(&mut self) -> ReloadTicket {
        self.issued += 1;
        ReloadTicket(self.issued)
    }

    /// Replace the board with a fetched one. Returns `false` (and drops the
    /// result) when a newer reload has already been applied.
    pub fn finish_reload(&mut self, ticket: ReloadTicket, board: Board) -> bool {
        if ticket.0 <= self.applied {
            tracing::debug!(
                ticket = ticket.0,
                applied = self.applied,
                "dropping stale reload"
            );
            return false;
        }
        self.applied = ticket.0;
        self.board = board;
        self.loaded = true;
        true
    }

    /// Convenience for callers that fetch synchronously
    pub fn replace(&mut self, board: Board) {
        let ticket = self.begin_reload();
        self.finish_reload(ticket, board);
    }

    // -----------------------------------------------------------------------
    // Local patches
    // -----------------------------------------------------------------------

    pub fn apply_put_user(&mut self, user: User) {
        match self.board.user_mut(&user.id) {
            Some(existing) => *existing = user,
            None => self.board.users.push(user),
        }
    }

    pub fn apply_delete_user(&mut self, key: &str) {
        self.board.users.retain(|u| u.id != key);
    }

    pub fn apply_put_task(&mut self, task: Task) {
        match self.board.task_mut(&task.id) {
            Some(existing) => *existing = task,
            None => self.board.tasks.push(task),
        }
    }

    pub fn apply_delete_task(&mut self, key: &str) {
        self.board.tasks.retain(|t| t.id != key);
    }

    /// Returns the previous state so a failed remote write can be undone
    pub fn apply_task_state(&mut self, key: &str, state: TaskState) -> Option<String> {
        let task = self.board.task_mut(key)?;
        let previous = std::mem::replace(&mut task.task_state, state.as_str().to_string());
        Some(previous)
    }

    /// Put back a raw state value returned by [`BoardCache::apply_task_state`]
    pub fn restore_task_state(&mut self, key: &str, previous: String) {
        if let Some(task) = self.board.task_mut(key) {
            task.task_state = previous;
        }
    }

    pub fn apply_put_subtask(&mut self, task_key: &str, subtask_key: &str, subtask: Subtask) {
        if let Some(task) = self.board.task_mut(task_key) {
            task.subtasks.insert(subtask_key.to_string(), subtask);
        }
    }

    pub fn apply_delete_subtask(&mut self, task_key: &str, subtask_key: &str) {
        if let Some(task) = self.board.task_mut(task_key) {
            task.subtasks.shift_remove(subtask_key);
        }
    }
}
