//! Declarative view-models built from the cached board.
//!
//! Every frontend (terminal, html fragments, `--json`) renders from these,
//! never from what it drew last time, so rendering the same board twice
//! gives the same result.

use serde::Serialize;

use crate::model::board::Board;
use crate::model::task::{Priority, Task, TaskState};
use crate::model::user::User;

/// A user's avatar bubble
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvatarView {
    pub key: String,
    pub name: String,
    pub initials: String,
    pub color: String,
}

impl AvatarView {
    pub fn of(user: &User) -> Self {
        AvatarView {
            key: user.id.clone(),
            name: user.name.clone(),
            initials: user.initials(),
            color: user.profil_img_color.clone(),
        }
    }
}

/// Avatars for a task's assignees. Keys that no longer resolve to a user
/// are skipped.
fn assignee_avatars(board: &Board, task: &Task) -> Vec<AvatarView> {
    task.assigned_contacts
        .iter()
        .filter_map(|key| board.user(key))
        .map(AvatarView::of)
        .collect()
}

/// A card on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub key: String,
    pub category: String,
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub priority: Option<Priority>,
    pub subtasks_done: usize,
    pub subtasks_total: usize,
    pub assignees: Vec<AvatarView>,
}

impl CardView {
    pub fn build(board: &Board, task: &Task) -> Self {
        let (done, total) = task.subtask_progress();
        CardView {
            key: task.id.clone(),
            category: task.category.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task.due_date.clone(),
            priority: task.priority,
            subtasks_done: done,
            subtasks_total: total,
            assignees: assignee_avatars(board, task),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnView {
    pub state: TaskState,
    pub label: &'static str,
    pub cards: Vec<CardView>,
}

/// The four columns in fixed order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardView {
    pub columns: Vec<ColumnView>,
}

impl BoardView {
    /// Tasks whose state is not one of the four columns are left out.
    pub fn build(board: &Board) -> Self {
        let columns = TaskState::ALL
            .iter()
            .map(|&state| ColumnView {
                state,
                label: state.label(),
                cards: board
                    .tasks_in(state)
                    .map(|t| CardView::build(board, t))
                    .collect(),
            })
            .collect();
        BoardView { columns }
    }

    pub fn column(&self, state: TaskState) -> &ColumnView {
        &self.columns[state.index()]
    }

    /// Column index and card index of a task
    pub fn locate(&self, key: &str) -> Option<(usize, usize)> {
        self.columns.iter().enumerate().find_map(|(ci, col)| {
            col.cards
                .iter()
                .position(|c| c.key == key)
                .map(|cardi| (ci, cardi))
        })
    }

    pub fn card_count(&self) -> usize {
        self.columns.iter().map(|c| c.cards.len()).sum()
    }
}

// ---------------------------------------------------------------------------
// Contacts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactRow {
    pub avatar: AvatarView,
    pub email: String,
    pub phone: String,
    /// The row belongs to the logged-in user
    pub is_you: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactGroup {
    pub letter: char,
    pub contacts: Vec<ContactRow>,
}

/// Contacts sorted by name and grouped under their first letter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactListView {
    pub groups: Vec<ContactGroup>,
}

impl ContactListView {
    pub fn build(board: &Board, current_user: Option<&str>) -> Self {
        let mut users: Vec<&User> = board.users.iter().collect();
        users.sort_by_cached_key(|u| u.name.to_lowercase());

        let mut groups: Vec<ContactGroup> = Vec::new();
        for user in users {
            let letter = user
                .name
                .chars()
                .next()
                .map_or('#', |c| c.to_uppercase().next().unwrap_or(c));
            let row = ContactRow {
                avatar: AvatarView::of(user),
                email: user.email.clone(),
                phone: user.phone.clone(),
                is_you: current_user == Some(user.id.as_str()),
            };
            match groups.last_mut() {
                Some(group) if group.letter == letter => group.contacts.push(row),
                _ => groups.push(ContactGroup {
                    letter,
                    contacts: vec![row],
                }),
            }
        }
        ContactListView { groups }
    }

    /// Rows in display order, across groups
    pub fn rows(&self) -> impl Iterator<Item = &ContactRow> {
        self.groups.iter().flat_map(|g| g.contacts.iter())
    }
}

// ---------------------------------------------------------------------------
// Task dialog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubtaskRow {
    pub key: String,
    pub text: String,
    pub checked: bool,
}

/// Everything the task dialog shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDetailView {
    pub key: String,
    pub category: String,
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub priority: Option<Priority>,
    /// Column label, or the raw stored value when it is not a column
    pub state: String,
    pub assignees: Vec<AvatarView>,
    pub subtasks: Vec<SubtaskRow>,
}

impl TaskDetailView {
    pub fn build(board: &Board, key: &str) -> Option<Self> {
        let task = board.task(key)?;
        Some(TaskDetailView {
            key: task.id.clone(),
            category: task.category.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task.due_date.clone(),
            priority: task.priority,
            state: task
                .state()
                .map_or_else(|| task.task_state.clone(), |s| s.label().to_string()),
            assignees: assignee_avatars(board, task),
            subtasks: task
                .subtasks
                .iter()
                .map(|(k, s)| SubtaskRow {
                    key: k.clone(),
                    text: s.task.clone(),
                    checked: s.task_checked,
                })
                .collect(),
        })
    }
}
