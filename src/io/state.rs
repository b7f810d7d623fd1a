use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::io::paths::atomic_write;

/// Persisted TUI state (written to ui_state.json in the config dir)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiState {
    /// Which view is showing ("board", "contacts", "summary")
    pub view: String,
    /// Focused board column (0 = to do)
    #[serde(default)]
    pub column: usize,
    /// Last search query
    #[serde(default)]
    pub last_search: Option<String>,
}

/// Read ui_state.json from the config directory
pub fn read_ui_state(dir: &Path) -> Option<UiState> {
    let path = dir.join("ui_state.json");
    let content = fs::read_to_string(&path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write ui_state.json to the config directory
pub fn write_ui_state(dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let path = dir.join("ui_state.json");
    let content = serde_json::to_string_pretty(state)?;
    atomic_write(&path, content.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_and_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let state = UiState {
            view: "contacts".into(),
            column: 2,
            last_search: Some("login".into()),
        };
        write_ui_state(dir.path(), &state).unwrap();
        let loaded = read_ui_state(dir.path()).unwrap();
        assert_eq!(loaded.view, "contacts");
        assert_eq!(loaded.column, 2);
        assert_eq!(loaded.last_search, Some("login".into()));
    }

    #[test]
    fn read_missing_file_returns_none() {
        let dir = TempDir::new().unwrap();
        assert!(read_ui_state(dir.path()).is_none());
    }

    #[test]
    fn read_malformed_json_returns_none() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("ui_state.json"), "not json {{{").unwrap();
        assert!(read_ui_state(dir.path()).is_none());
    }

    #[test]
    fn serde_defaults_on_minimal_object() {
        let state: UiState = serde_json::from_str(r#"{"view":"board"}"#).unwrap();
        assert_eq!(state.view, "board");
        assert_eq!(state.column, 0);
        assert!(state.last_search.is_none());
    }
}
