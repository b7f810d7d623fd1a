use serde::Serialize;

use crate::model::task::TaskState;
use crate::model::user::User;
use crate::ops::search::{NO_RESULTS, SearchedBoard};
use crate::ops::summary::{Summary, format_deadline};
use crate::render::view::{CardView, ContactListView, TaskDetailView};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

/// A user as printed by the CLI. The password never leaves the store.
#[derive(Serialize)]
pub struct UserJson {
    pub key: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub phone: String,
    pub color: String,
    pub logged_in: bool,
}

#[derive(Serialize)]
pub struct ColumnJson<'a> {
    pub state: TaskState,
    pub label: &'static str,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub no_results: bool,
    pub cards: Vec<&'a CardView>,
}

#[derive(Serialize)]
pub struct BoardJson<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<&'a str>,
    pub columns: Vec<ColumnJson<'a>>,
}

#[derive(Serialize)]
pub struct SummaryJson<'a> {
    pub greeting: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<&'a str>,
    #[serde(flatten)]
    pub summary: &'a Summary,
}

#[derive(Serialize)]
pub struct CreatedJson<'a> {
    pub key: &'a str,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn user_to_json(user: &User) -> UserJson {
    UserJson {
        key: user.id.clone(),
        name: user.name.clone(),
        email: user.email.clone(),
        phone: user.phone.clone(),
        color: user.profil_img_color.clone(),
        logged_in: user.logged_in,
    }
}

/// Only visible cards are included
pub fn board_to_json<'a>(board: &SearchedBoard<'a>, search: Option<&'a str>) -> BoardJson<'a> {
    BoardJson {
        search: search.filter(|_| board.active),
        columns: board
            .columns
            .iter()
            .map(|col| ColumnJson {
                state: col.state,
                label: col.label,
                no_results: col.no_results,
                cards: col.visible_cards().map(|c| c.card).collect(),
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

fn card_line(card: &CardView) -> String {
    let mut line = format!("  {:<8} {}", card.key, card.title);
    if !card.category.is_empty() {
        line.push_str(&format!(" [{}]", card.category));
    }
    if let Some(p) = card.priority {
        line.push_str(&format!(" !{}", p.as_str()));
    }
    if card.subtasks_total > 0 {
        line.push_str(&format!(" ({}/{})", card.subtasks_done, card.subtasks_total));
    }
    if !card.assignees.is_empty() {
        let initials: Vec<&str> = card.assignees.iter().map(|a| a.initials.as_str()).collect();
        line.push_str(&format!(" @{}", initials.join(",")));
    }
    line
}

pub fn format_board(board: &SearchedBoard<'_>) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, col) in board.columns.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        let visible: Vec<_> = col.visible_cards().collect();
        lines.push(format!("{} ({})", col.label, visible.len()));
        if col.no_results {
            lines.push(format!("  {}", NO_RESULTS));
        } else if visible.is_empty() {
            lines.push(format!("  No tasks {}", col.label));
        }
        for c in visible {
            lines.push(card_line(c.card));
        }
    }
    lines
}

pub fn format_task_detail(d: &TaskDetailView) -> Vec<String> {
    let mut lines = vec![format!("{}  {}", d.key, d.title)];
    if !d.category.is_empty() {
        lines.push(format!("category: {}", d.category));
    }
    lines.push(format!("state:    {}", d.state));
    if !d.due_date.is_empty() {
        lines.push(format!("due:      {}", d.due_date));
    }
    if let Some(p) = d.priority {
        lines.push(format!("priority: {}", p.as_str()));
    }
    if !d.assignees.is_empty() {
        let names: Vec<String> = d
            .assignees
            .iter()
            .map(|a| format!("{} ({})", a.name, a.key))
            .collect();
        lines.push(format!("assigned: {}", names.join(", ")));
    }
    if !d.description.is_empty() {
        lines.push(String::new());
        lines.extend(d.description.lines().map(|l| l.to_string()));
    }
    if !d.subtasks.is_empty() {
        lines.push(String::new());
        for s in &d.subtasks {
            let mark = if s.checked { "x" } else { " " };
            lines.push(format!("[{}] {:<10} {}", mark, s.key, s.text));
        }
    }
    lines
}

pub fn format_contacts(v: &ContactListView) -> Vec<String> {
    let mut lines = Vec::new();
    for group in &v.groups {
        lines.push(group.letter.to_string());
        for row in &group.contacts {
            let you = if row.is_you { " (You)" } else { "" };
            lines.push(format!(
                "  {:<6} {}{}  <{}>",
                row.avatar.key, row.avatar.name, you, row.email
            ));
        }
    }
    lines
}

pub fn format_contact(user: &User) -> Vec<String> {
    let mut lines = vec![
        format!("{}  {} ({})", user.initials(), user.name, user.id),
        format!("email: {}", user.email),
    ];
    if !user.phone.is_empty() {
        lines.push(format!("phone: {}", user.phone));
    }
    lines
}

pub fn format_summary(s: &Summary, greeting: &str, user_name: Option<&str>) -> Vec<String> {
    let mut lines = vec![match user_name {
        Some(name) => format!("{}, {}", greeting, name),
        None => format!("{}!", greeting),
    }];
    lines.push(String::new());
    for state in TaskState::ALL {
        lines.push(format!("{:<16}{}", state.label(), s.count(state)));
    }
    lines.push(format!("{:<16}{}", "Tasks in board", s.total));
    let deadline = s
        .next_urgent_deadline
        .map_or_else(|| "no upcoming deadline".to_string(), format_deadline);
    lines.push(format!("{:<16}{} ({})", "Urgent", s.urgent, deadline));
    lines
}
