use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::io::paths::atomic_write;

/// Error type for session files
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("not logged in (run `kb login` first)")]
    NotLoggedIn,
}

/// Durable per-installation state (session.json)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionFile {
    /// Selects which remote board this installation reads and writes
    pub board_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
}

/// Which board we talk to and who is logged in.
///
/// The board id lives in the config dir and survives reboots; the login
/// marker lives in the runtime dir and does not.
#[derive(Debug, Clone)]
pub struct Session {
    pub board_id: String,
    runtime_dir: PathBuf,
}

impl Session {
    /// Load session.json from `config_dir`, generating a board id on first use.
    pub fn open(config_dir: &Path, runtime_dir: &Path) -> Result<Self, SessionError> {
        let path = config_dir.join("session.json");
        let file = if path.exists() {
            let text = fs::read_to_string(&path).map_err(|source| SessionError::ReadError {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str::<SessionFile>(&text).map_err(|source| {
                SessionError::ParseError {
                    path: path.clone(),
                    source,
                }
            })?
        } else {
            let file = SessionFile {
                board_id: generate_board_id(),
                created: Some(Utc::now()),
            };
            let text = serde_json::to_string_pretty(&file).map_err(|source| {
                SessionError::ParseError {
                    path: path.clone(),
                    source,
                }
            })?;
            atomic_write(&path, text.as_bytes()).map_err(|source| SessionError::WriteError {
                path: path.clone(),
                source,
            })?;
            tracing::info!(board = %file.board_id, "generated board id");
            file
        };
        Ok(Session {
            board_id: file.board_id,
            runtime_dir: runtime_dir.to_path_buf(),
        })
    }

    /// Use a different board than the generated one (config or `--board`)
    pub fn with_board(mut self, board_id: &str) -> Self {
        self.board_id = board_id.to_string();
        self
    }

    fn login_marker(&self) -> PathBuf {
        self.runtime_dir
            .join(format!("kanban-{}.login", self.board_id))
    }

    /// Storage key of the user logged in on this machine, if any
    pub fn current_user(&self) -> Option<String> {
        let text = fs::read_to_string(self.login_marker()).ok()?;
        let key = text.trim();
        if key.is_empty() {
            None
        } else {
            Some(key.to_string())
        }
    }

    /// Like [`Session::current_user`] but an error when nobody is logged in
    pub fn require_user(&self) -> Result<String, SessionError> {
        self.current_user().ok_or(SessionError::NotLoggedIn)
    }

    pub fn set_current_user(&self, user_key: &str) -> Result<(), SessionError> {
        let path = self.login_marker();
        atomic_write(&path, user_key.as_bytes())
            .map_err(|source| SessionError::WriteError { path, source })
    }

    pub fn clear_current_user(&self) -> Result<(), SessionError> {
        let path = self.login_marker();
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionError::WriteError { path, source }),
        }
    }
}

fn generate_board_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
