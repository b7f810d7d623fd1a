use clap::{Args, Parser, Subcommand};

use crate::model::task::{Priority, TaskState};

#[derive(Parser)]
#[command(name = "kb", about = concat!("kb v", env!("CARGO_PKG_VERSION"), " - a kanban board with contacts"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<String>,

    /// Work on a different board than this machine's
    #[arg(long, global = true, value_name = "ID")]
    pub board: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account
    Signup(SignupArgs),
    /// Log in by email and password, or as guest
    Login(LoginArgs),
    /// Log out
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Show the board columns
    Board(BoardArgs),
    /// Show task counts and the next urgent deadline
    Summary(SummaryArgs),
    /// Create, change and delete tasks
    Task(TaskCmd),
    /// Add, check off, rename and delete subtasks
    Subtask(SubtaskCmd),
    /// Manage contacts
    Contact(ContactCmd),
    /// Show or change configuration
    Config(ConfigCmd),
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct SignupArgs {
    /// Full name (letters, spaces, hyphens and apostrophes)
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
    /// Repeat the password
    #[arg(long)]
    pub confirm: String,
}

#[derive(Args)]
pub struct LoginArgs {
    #[arg(long, required_unless_present = "guest")]
    pub email: Option<String>,
    #[arg(long, required_unless_present = "guest")]
    pub password: Option<String>,
    /// Log in as the shared guest user
    #[arg(long, conflicts_with_all = ["email", "password"])]
    pub guest: bool,
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct BoardArgs {
    /// Only show cards whose title or description contains this (2+ chars)
    #[arg(long, short = 's')]
    pub search: Option<String>,
    /// Print the board as markup
    #[arg(long)]
    pub html: bool,
}

#[derive(Args)]
pub struct SummaryArgs {
    /// Print the summary as markup
    #[arg(long)]
    pub html: bool,
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct TaskCmd {
    #[command(subcommand)]
    pub action: TaskAction,
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a task
    Add(TaskAddArgs),
    /// Show a task
    Show(TaskShowArgs),
    /// Change fields of a task
    Edit(TaskEditArgs),
    /// Move a task to another column
    Mv(TaskMvArgs),
    /// Delete a task
    Rm(TaskKeyArgs),
    /// Assign a contact to a task
    Assign(TaskContactArgs),
    /// Remove a contact from a task
    Unassign(TaskContactArgs),
}

#[derive(Args)]
pub struct TaskAddArgs {
    pub title: String,
    #[arg(long, short = 'd', default_value = "")]
    pub description: String,
    /// Due date, YYYY-MM-DD (today or later)
    #[arg(long)]
    pub due: String,
    #[arg(long, short = 'c')]
    pub category: String,
    /// urgent, medium or low
    #[arg(long, short = 'p')]
    pub priority: Option<Priority>,
    /// Column to create the task in (default: to-do)
    #[arg(long)]
    pub state: Option<TaskState>,
    /// Contact name, email or key (repeatable)
    #[arg(long = "assign", short = 'a')]
    pub assign: Vec<String>,
    /// Subtask text (repeatable)
    #[arg(long = "subtask")]
    pub subtasks: Vec<String>,
}

#[derive(Args)]
pub struct TaskShowArgs {
    /// Task key, e.g. task3
    pub key: String,
    /// Print the task dialog as markup
    #[arg(long)]
    pub html: bool,
}

#[derive(Args)]
pub struct TaskEditArgs {
    pub key: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long, short = 'd')]
    pub description: Option<String>,
    #[arg(long)]
    pub due: Option<String>,
    #[arg(long, short = 'c')]
    pub category: Option<String>,
    #[arg(long, short = 'p')]
    pub priority: Option<Priority>,
    /// Replace the assignees (repeatable)
    #[arg(long = "assign", short = 'a')]
    pub assign: Option<Vec<String>>,
}

#[derive(Args)]
pub struct TaskMvArgs {
    pub key: String,
    /// to-do, in-progress, await-feedback or done
    pub state: TaskState,
}

#[derive(Args)]
pub struct TaskKeyArgs {
    pub key: String,
}

#[derive(Args)]
pub struct TaskContactArgs {
    pub key: String,
    /// Contact name, email or key
    pub contact: String,
}

// ---------------------------------------------------------------------------
// Subtasks
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct SubtaskCmd {
    #[command(subcommand)]
    pub action: SubtaskAction,
}

#[derive(Subcommand)]
pub enum SubtaskAction {
    /// Add a subtask to a task
    Add { task: String, text: String },
    /// Check or uncheck a subtask
    Toggle { task: String, subtask: String },
    /// Change a subtask's text
    Edit {
        task: String,
        subtask: String,
        text: String,
    },
    /// Delete a subtask
    Rm { task: String, subtask: String },
}

// ---------------------------------------------------------------------------
// Contacts
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ContactCmd {
    #[command(subcommand)]
    pub action: ContactAction,
}

#[derive(Subcommand)]
pub enum ContactAction {
    /// List contacts by letter
    List {
        /// Print the list as markup
        #[arg(long)]
        html: bool,
    },
    /// Show one contact
    Show { contact: String },
    /// Add a contact
    Add(ContactAddArgs),
    /// Change a contact
    Edit(ContactEditArgs),
    /// Delete a contact and unassign it from every task
    Rm { contact: String },
}

#[derive(Args)]
pub struct ContactAddArgs {
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long, default_value = "")]
    pub phone: String,
}

#[derive(Args)]
pub struct ContactEditArgs {
    /// Contact name, email or key
    pub contact: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Set a key, e.g. `remote.url https://...`
    Set { key: String, value: String },
}
