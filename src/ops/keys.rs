//! Storage key allocation.
//!
//! Keys are allocated from the cached board, so two clients allocating at the
//! same time can pick the same key and the later write wins.

use crate::model::user::name_initials;

/// Numeric suffix of `key` if it is `prefix` followed by digits only
fn numeric_suffix(key: &str, prefix: &str) -> Option<u64> {
    let digits = key.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// `prefix` + (highest existing numeric suffix + 1), or `prefix0` if none.
fn next_key<'a>(keys: impl IntoIterator<Item = &'a str>, prefix: &str) -> String {
    let next = keys
        .into_iter()
        .filter_map(|k| numeric_suffix(k, prefix))
        .max()
        .map_or(0, |max| max + 1);
    format!("{}{}", prefix, next)
}

/// Next `task<N>` key
pub fn next_task_key<'a>(existing: impl IntoIterator<Item = &'a str>) -> String {
    next_key(existing, "task")
}

/// Next `subtask<N>` key within one task
pub fn next_subtask_key<'a>(existing: impl IntoIterator<Item = &'a str>) -> String {
    next_key(existing, "subtask")
}

/// A user key: the name's initials followed by a three digit number, the
/// first one from 100 not already taken (`AB100`, `AB101`, ...).
pub fn next_user_key<'a>(existing: impl IntoIterator<Item = &'a str>, name: &str) -> String {
    let mut prefix = name_initials(name);
    prefix.retain(|c| c.is_ascii_alphanumeric());
    if prefix.is_empty() {
        prefix.push('U');
    }
    let taken: Vec<u64> = existing
        .into_iter()
        .filter_map(|k| numeric_suffix(k, &prefix))
        .collect();
    let mut n = 100;
    while taken.contains(&n) {
        n += 1;
    }
    format!("{}{}", prefix, n)
}
