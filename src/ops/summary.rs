use chrono::NaiveDate;
use serde::Serialize;

use crate::model::board::Board;
use crate::model::task::{Priority, TaskState};

/// Figures for the summary page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub to_do: usize,
    pub in_progress: usize,
    pub await_feedback: usize,
    pub done: usize,
    /// Tasks shown on the board (unknown states excluded)
    pub total: usize,
    /// Urgent tasks not yet done
    pub urgent: usize,
    /// Earliest due date among urgent tasks not yet done
    pub next_urgent_deadline: Option<NaiveDate>,
}

impl Summary {
    pub fn count(&self, state: TaskState) -> usize {
        match state {
            TaskState::ToDo => self.to_do,
            TaskState::InProgress => self.in_progress,
            TaskState::AwaitFeedback => self.await_feedback,
            TaskState::Done => self.done,
        }
    }
}

pub fn summarize(board: &Board) -> Summary {
    let count = |state| board.tasks_in(state).count();
    let open_urgent: Vec<_> = board
        .tasks
        .iter()
        .filter(|t| t.priority == Some(Priority::Urgent))
        .filter(|t| matches!(t.state(), Some(s) if s != TaskState::Done))
        .collect();
    let next_urgent_deadline = open_urgent
        .iter()
        .filter_map(|t| NaiveDate::parse_from_str(t.due_date.trim(), "%Y-%m-%d").ok())
        .min();

    let to_do = count(TaskState::ToDo);
    let in_progress = count(TaskState::InProgress);
    let await_feedback = count(TaskState::AwaitFeedback);
    let done = count(TaskState::Done);
    Summary {
        to_do,
        in_progress,
        await_feedback,
        done,
        total: to_do + in_progress + await_feedback + done,
        urgent: open_urgent.len(),
        next_urgent_deadline,
    }
}

/// Greeting for the given hour of the day (0-23)
pub fn greeting(hour: u32) -> &'static str {
    match hour {
        5..=11 => "Good morning",
        12..=17 => "Good afternoon",
        18..=22 => "Good evening",
        _ => "Good night",
    }
}

/// `March 5, 2026`
pub fn format_deadline(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::board::BoardDocument;

    fn board() -> Board {
        let doc: BoardDocument = serde_json::from_str(
            r#"{"tasks": {
                "task0": {"title": "a", "taskState": "to-do", "priority": "urgent", "dueDate": "2026-05-02"},
                "task1": {"title": "b", "taskState": "to-do", "priority": "low", "dueDate": "2026-01-01"},
                "task2": {"title": "c", "taskState": "in-progress", "priority": "urgent", "dueDate": "2026-04-20"},
                "task3": {"title": "d", "taskState": "done", "priority": "urgent", "dueDate": "2026-01-10"},
                "task4": {"title": "e", "taskState": "await-feedback", "priority": "urgent", "dueDate": "soon"},
                "task5": {"title": "f", "taskState": "archived", "priority": "urgent", "dueDate": "2026-01-02"}
            }}"#,
        )
        .unwrap();
        Board::from_document(doc)
    }

    #[test]
    fn counts_per_column() {
        let s = summarize(&board());
        assert_eq!(
            (s.to_do, s.in_progress, s.await_feedback, s.done, s.total),
            (2, 1, 1, 1, 5)
        );
        assert_eq!(s.count(TaskState::ToDo), 2);
    }

    #[test]
    fn urgent_ignores_done_and_unknown_states() {
        let s = summarize(&board());
        assert_eq!(s.urgent, 3);
        assert_eq!(s.next_urgent_deadline, NaiveDate::from_ymd_opt(2026, 4, 20));
    }

    #[test]
    fn empty_board() {
        let s = summarize(&Board::default());
        assert_eq!(s.total, 0);
        assert_eq!(s.next_urgent_deadline, None);
    }

    #[test]
    fn greetings_by_hour() {
        assert_eq!(greeting(8), "Good morning");
        assert_eq!(greeting(12), "Good afternoon");
        assert_eq!(greeting(20), "Good evening");
        assert_eq!(greeting(2), "Good night");
    }

    #[test]
    fn deadline_format() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        assert_eq!(format_deadline(date), "March 5, 2026");
    }
}
