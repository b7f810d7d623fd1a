use unicode_segmentation::UnicodeSegmentation;

use crate::model::task::Task;

/// One row of the subtask list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtaskItem {
    pub key: String,
    pub text: String,
    pub checked: bool,
}

/// How a row is currently shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    Display,
    Edit,
    /// Deleted here, waiting for the store to confirm
    PendingDelete,
}

/// Result of leaving edit mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Nothing to write (text unchanged, cancelled, or not editing)
    Unchanged,
    /// The row now shows `text`; write it to subtask `key`
    Renamed { key: String, text: String },
    /// Enter on an empty buffer: still editing
    Rejected,
}

/// In-place editing of a task's subtask list.
///
/// Each row is displayed, being edited or pending delete; at most one row is
/// edited at a time. Enter commits a non-empty edit, Escape restores the
/// original text and leaving the row (blur) commits a non-empty edit and
/// otherwise restores. A deleted row stays in the list, marked, until the
/// editor is rebuilt from the stored task.
#[derive(Debug, Clone, Default)]
pub struct SubtaskEditor {
    items: Vec<SubtaskItem>,
    editing: Option<(usize, String)>,
    deleting: Vec<String>,
}

impl SubtaskEditor {
    pub fn from_task(task: &Task) -> Self {
        let items = task
            .subtasks
            .iter()
            .map(|(key, s)| SubtaskItem {
                key: key.clone(),
                text: s.task.clone(),
                checked: s.task_checked,
            })
            .collect();
        SubtaskEditor {
            items,
            editing: None,
            deleting: Vec::new(),
        }
    }

    pub fn items(&self) -> &[SubtaskItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn state(&self, index: usize) -> ItemState {
        if self.is_deleting(index) {
            return ItemState::PendingDelete;
        }
        match &self.editing {
            Some((i, _)) if *i == index => ItemState::Edit,
            _ => ItemState::Display,
        }
    }

    fn is_deleting(&self, index: usize) -> bool {
        self.items
            .get(index)
            .is_some_and(|item| self.deleting.contains(&item.key))
    }

    /// Index and buffer of the row being edited
    pub fn editing(&self) -> Option<(usize, &str)> {
        self.editing.as_ref().map(|(i, buf)| (*i, buf.as_str()))
    }

    /// Start editing row `index`. A row already in edit mode is blurred
    /// first and its outcome returned.
    pub fn begin_edit(&mut self, index: usize) -> EditOutcome {
        if index >= self.items.len() || self.is_deleting(index) {
            return EditOutcome::Unchanged;
        }
        let outcome = match &self.editing {
            Some((i, _)) if *i == index => return EditOutcome::Unchanged,
            Some(_) => self.blur(),
            None => EditOutcome::Unchanged,
        };
        self.editing = Some((index, self.items[index].text.clone()));
        outcome
    }

    pub fn push_str(&mut self, text: &str) {
        if let Some((_, buf)) = &mut self.editing {
            buf.push_str(text);
        }
    }

    /// Remove the last grapheme from the edit buffer
    pub fn backspace(&mut self) {
        if let Some((_, buf)) = &mut self.editing
            && let Some((offset, _)) = buf.grapheme_indices(true).next_back()
        {
            buf.truncate(offset);
        }
    }

    /// Enter
    pub fn confirm(&mut self) -> EditOutcome {
        match &self.editing {
            None => EditOutcome::Unchanged,
            Some((_, buf)) if buf.trim().is_empty() => EditOutcome::Rejected,
            Some(_) => self.commit(),
        }
    }

    /// Escape: leave edit mode, showing the original text again
    pub fn cancel(&mut self) {
        self.editing = None;
    }

    /// Focus moved away from the row being edited
    pub fn blur(&mut self) -> EditOutcome {
        match &self.editing {
            None => EditOutcome::Unchanged,
            Some((_, buf)) if buf.trim().is_empty() => {
                self.editing = None;
                EditOutcome::Unchanged
            }
            Some(_) => self.commit(),
        }
    }

    fn commit(&mut self) -> EditOutcome {
        let Some((index, buf)) = self.editing.take() else {
            return EditOutcome::Unchanged;
        };
        let text = buf.trim().to_string();
        let item = &mut self.items[index];
        if item.text == text {
            return EditOutcome::Unchanged;
        }
        item.text = text.clone();
        EditOutcome::Renamed {
            key: item.key.clone(),
            text,
        }
    }

    /// Mark row `index` pending delete and return its key. Editing on that
    /// row is dropped. A row already pending returns `None`.
    pub fn delete(&mut self, index: usize) -> Option<String> {
        if index >= self.items.len() || self.is_deleting(index) {
            return None;
        }
        if matches!(&self.editing, Some((i, _)) if *i == index) {
            self.editing = None;
        }
        let key = self.items[index].key.clone();
        self.deleting.push(key.clone());
        Some(key)
    }

    /// Flip the checkbox of row `index` and return its key and new state
    pub fn toggle(&mut self, index: usize) -> Option<(String, bool)> {
        if self.is_deleting(index) {
            return None;
        }
        let item = self.items.get_mut(index)?;
        item.checked = !item.checked;
        Some((item.key.clone(), item.checked))
    }
}
