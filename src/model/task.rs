use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// The kanban column a task sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    ToDo,
    InProgress,
    AwaitFeedback,
    Done,
}

impl TaskState {
    /// All columns, in board order
    pub const ALL: [TaskState; 4] = [
        TaskState::ToDo,
        TaskState::InProgress,
        TaskState::AwaitFeedback,
        TaskState::Done,
    ];

    /// The value stored in the `taskState` field
    pub fn as_str(self) -> &'static str {
        match self {
            TaskState::ToDo => "to-do",
            TaskState::InProgress => "in-progress",
            TaskState::AwaitFeedback => "await-feedback",
            TaskState::Done => "done",
        }
    }

    /// Parse a stored `taskState` value. Anything else is not a column.
    pub fn parse(s: &str) -> Option<TaskState> {
        match s {
            "to-do" => Some(TaskState::ToDo),
            "in-progress" => Some(TaskState::InProgress),
            "await-feedback" => Some(TaskState::AwaitFeedback),
            "done" => Some(TaskState::Done),
            _ => None,
        }
    }

    /// Column heading
    pub fn label(self) -> &'static str {
        match self {
            TaskState::ToDo => "To do",
            TaskState::InProgress => "In progress",
            TaskState::AwaitFeedback => "Await feedback",
            TaskState::Done => "Done",
        }
    }

    /// Position in board order
    pub fn index(self) -> usize {
        match self {
            TaskState::ToDo => 0,
            TaskState::InProgress => 1,
            TaskState::AwaitFeedback => 2,
            TaskState::Done => 3,
        }
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskState::parse(s).ok_or_else(|| {
            format!(
                "unknown task state '{}' (expected to-do, in-progress, await-feedback, done)",
                s
            )
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Urgent,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Urgent => "urgent",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    pub fn parse(s: &str) -> Option<Priority> {
        match s {
            "urgent" => Some(Priority::Urgent),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::parse(s)
            .ok_or_else(|| format!("unknown priority '{}' (expected urgent, medium, low)", s))
    }
}

/// One checklist item of a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    #[serde(default)]
    pub task: String,
    #[serde(default)]
    pub task_checked: bool,
}

impl Subtask {
    pub fn new(text: &str) -> Self {
        Subtask {
            task: text.trim().to_string(),
            task_checked: false,
        }
    }
}

/// A task card. `id` is the storage key (`task<N>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(skip)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// ISO date, `YYYY-MM-DD`
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub category: String,
    #[serde(
        default,
        deserialize_with = "lenient_priority",
        skip_serializing_if = "Option::is_none"
    )]
    pub priority: Option<Priority>,
    /// Raw stored column value; see [`Task::state`]
    #[serde(default)]
    pub task_state: String,
    /// Storage keys of assigned users
    #[serde(default, deserialize_with = "key_list")]
    pub assigned_contacts: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subtasks: IndexMap<String, Subtask>,
}

impl Task {
    pub fn new(title: &str, state: TaskState) -> Self {
        Task {
            id: String::new(),
            title: title.trim().to_string(),
            description: String::new(),
            due_date: String::new(),
            category: String::new(),
            priority: None,
            task_state: state.as_str().to_string(),
            assigned_contacts: Vec::new(),
            subtasks: IndexMap::new(),
        }
    }

    /// The column this task renders in. `None` means it renders nowhere.
    pub fn state(&self) -> Option<TaskState> {
        TaskState::parse(&self.task_state)
    }

    pub fn set_state(&mut self, state: TaskState) {
        self.task_state = state.as_str().to_string();
    }

    /// (checked, total) subtask counts
    pub fn subtask_progress(&self) -> (usize, usize) {
        let done = self.subtasks.values().filter(|s| s.task_checked).count();
        (done, self.subtasks.len())
    }

    pub fn is_assigned(&self, user_key: &str) -> bool {
        self.assigned_contacts.iter().any(|k| k == user_key)
    }
}

/// Unknown or malformed priorities decode as `None` instead of failing the
/// whole board document.
fn lenient_priority<'de, D>(deserializer: D) -> Result<Option<Priority>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(|v| v.as_str()).and_then(Priority::parse))
}

/// The document store drops empty collections and may send `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Assigned keys as a list. The document store turns a sparse array into
/// an index-keyed object, and holes into `null`; both are accepted.
fn key_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::Array(items)) => items,
        Some(serde_json::Value::Object(map)) => map.into_iter().map(|(_, v)| v).collect(),
        Some(serde_json::Value::String(key)) => vec![serde_json::Value::String(key)],
        _ => Vec::new(),
    };
    Ok(items
        .into_iter()
        .filter_map(|v| match v {
            serde_json::Value::String(key) => Some(key),
            _ => None,
        })
        .collect())
}
