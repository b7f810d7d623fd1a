use std::path::PathBuf;

use crate::cli::commands::Cli;
use crate::io::config_io::{self, ConfigError};
use crate::io::paths;
use crate::io::remote::StoreError;
use crate::io::session::{Session, SessionError};
use crate::model::config::Config;
use crate::ops::store::{OpError, Store};

/// Error type for loading config and session before any command runs
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Everything a command needs before it talks to the store: the effective
/// config, where it came from, and the session for the selected board.
pub struct Context {
    pub config: Config,
    pub config_path: PathBuf,
    pub config_dir: PathBuf,
    pub session: Session,
    pub json: bool,
}

impl Context {
    /// Board id precedence: `--board`, then `board.id` in config, then the id
    /// generated for this machine.
    pub fn load(cli: &Cli) -> Result<Self, ContextError> {
        let config_dir = paths::config_dir();
        let config_path = cli
            .config
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| config_dir.join("config.toml"));
        let (mut config, _doc) = config_io::read_config(&config_path)?;
        config_io::apply_env(&mut config);

        let mut session = Session::open(&config_dir, &paths::runtime_dir())?;
        if let Some(id) = cli.board.as_deref().or(config.board.id.as_deref()) {
            session = session.with_board(id);
        }
        tracing::debug!(board = %session.board_id, config = %config_path.display(), "context loaded");

        Ok(Context {
            config,
            config_path,
            config_dir,
            session,
            json: cli.json,
        })
    }

    /// A store for the selected board, not loaded yet
    pub fn store(&self) -> Result<Store, StoreError> {
        Store::connect(&self.config.remote, &self.session.board_id)
    }

    /// For commands that need a logged-in user: the loaded store and the
    /// user's key.
    pub fn logged_in(&self) -> Result<(Store, String), OpError> {
        let user = self.session.require_user()?;
        let mut store = self.store()?;
        store.reload()?;
        Ok((store, user))
    }

    pub fn today(&self) -> chrono::NaiveDate {
        chrono::Local::now().date_naive()
    }
}
