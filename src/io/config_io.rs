use std::fs;
use std::path::{Path, PathBuf};

use crate::io::paths::atomic_write;
use crate::model::config::Config;

/// Error type for config.toml access
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
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
    #[error("could not parse config.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not parse config.toml: {0}")]
    EditError(#[from] toml_edit::TomlError),
    #[error("unknown config key '{0}'")]
    UnknownKey(String),
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Read the config, returning both the parsed config and the raw toml_edit
/// document for round-trip-safe editing. A missing file is an empty config.
pub fn read_config(path: &Path) -> Result<(Config, toml_edit::DocumentMut), ConfigError> {
    if !path.exists() {
        return Ok((Config::default(), toml_edit::DocumentMut::new()));
    }
    let text = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    let config: Config = toml::from_str(&text)?;
    let doc: toml_edit::DocumentMut = text.parse()?;
    Ok((config, doc))
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config(path: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    atomic_write(path, doc.to_string().as_bytes()).map_err(|source| ConfigError::WriteError {
        path: path.to_path_buf(),
        source,
    })
}

/// Set a dotted key such as `remote.url` or `ui.colors.background`.
pub fn set_value(doc: &mut toml_edit::DocumentMut, key: &str, raw: &str) -> Result<(), ConfigError> {
    let parts: Vec<&str> = key.split('.').collect();
    let value = match parts.as_slice() {
        ["remote", "url"] => {
            if !(raw.starts_with("http://") || raw.starts_with("https://")) {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    reason: "expected an http:// or https:// url".to_string(),
                });
            }
            toml_edit::value(raw.trim_end_matches('/'))
        }
        ["remote", "timeout_secs"] => {
            let secs: i64 = raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                reason: "expected a whole number of seconds".to_string(),
            })?;
            toml_edit::value(secs)
        }
        ["board", "id"] => toml_edit::value(raw),
        ["ui", "show_key_hints"] => {
            let flag: bool = raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                reason: "expected true or false".to_string(),
            })?;
            toml_edit::value(flag)
        }
        ["ui", "colors" | "category_colors", _] => toml_edit::value(raw),
        _ => return Err(ConfigError::UnknownKey(key.to_string())),
    };

    let (last, tables) = parts
        .split_last()
        .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
    let mut table = doc.as_table_mut();
    for name in tables {
        if !table.contains_key(name) {
            table.insert(name, toml_edit::Item::Table(toml_edit::Table::new()));
        }
        table = table[*name]
            .as_table_mut()
            .ok_or_else(|| ConfigError::InvalidValue {
                key: key.to_string(),
                reason: format!("'{}' is not a table", name),
            })?;
    }
    table[*last] = value;
    Ok(())
}

/// Apply environment overrides (`KB_REMOTE_URL`)
pub fn apply_env(config: &mut Config) {
    if let Ok(url) = std::env::var("KB_REMOTE_URL")
        && !url.trim().is_empty()
    {
        config.remote.url = Some(url.trim().to_string());
    }
}
