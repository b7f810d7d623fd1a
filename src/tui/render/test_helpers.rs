use chrono::NaiveDate;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use serde_json::json;

use crate::model::board::{Board, BoardDocument};
use crate::model::config::Config;
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render the whole app into an in-memory buffer and return plain text
/// (no styles).
pub fn render_app(app: &App, w: u16, h: u16) -> String {
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|frame| super::render(frame, app)).unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Two contacts and four tasks, one of them in a state that is not a column.
pub fn sample_board() -> Board {
    let doc: BoardDocument = serde_json::from_value(json!({
        "users": {
            "AM100": { "name": "Anna Meier", "email": "anna@example.com", "phone": "+49 170 1234567", "profilImgColor": "#FF7A00" },
            "BK100": { "name": "ben klein", "email": "ben@example.com", "profilImgColor": "#6E52FF" }
        },
        "tasks": {
            "task0": {
                "title": "Login page",
                "description": "Form and validation",
                "category": "User Story",
                "dueDate": "2026-03-05",
                "priority": "urgent",
                "taskState": "to-do",
                "assignedContacts": ["AM100", "ZZ999"],
                "subtasks": {
                    "subtask0": { "task": "Email field", "taskChecked": true },
                    "subtask1": { "task": "Password field", "taskChecked": false }
                }
            },
            "task1": { "title": "Database schema", "category": "Technical Task", "taskState": "to-do" },
            "task2": { "title": "Deploy", "category": "Technical Task", "taskState": "done" },
            "task3": { "title": "Ghost", "category": "User Story", "taskState": "archived" }
        }
    }))
    .unwrap();
    Board::from_document(doc)
}

/// An app logged in as Anna with [`sample_board`] loaded.
pub fn loaded_app() -> App {
    let mut app = App::new(
        "AM100",
        &Config::default(),
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
    );
    app.cache.replace(sample_board());
    app
}
