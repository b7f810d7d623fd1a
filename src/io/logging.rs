use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Filter from `KB_LOG` (e.g. `KB_LOG=kanban=debug`), default `warn`.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env("KB_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Log to stderr. Used by CLI commands.
pub fn init_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Log to a file so the TUI's alternate screen stays clean. Falls back to no
/// logging when the file cannot be opened.
pub fn init_file(path: &Path) {
    if let Some(dir) = path.parent() {
        let _ = std::fs::create_dir_all(dir);
    }
    let file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(f) => f,
        Err(_) => return,
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}
